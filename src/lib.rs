// src/lib.rs
// Public library surface: scoring engine, collaborators and the HTTP service.

pub mod config;
pub mod error;
pub mod instance;
pub mod lemma;
pub mod lexicon;
pub mod negation;
pub mod result;
pub mod scoring;
pub mod sentence;
pub mod stopwords;
pub mod tagger;
pub mod token;
pub mod vote;

// Service surface (axum router + Prometheus)
pub mod api;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::{ConfigOverrides, ScoreConfig, ScoreMode};
pub use crate::error::ScoreError;
pub use crate::instance::{InstanceSelector, Selection};
pub use crate::lexicon::{CompositeLexicon, Lexicon, MemoryLexicon, PartOfSpeech, Polarity};
pub use crate::negation::{NegationMask, NegationScanner};
pub use crate::result::RunResult;
pub use crate::scoring::{ScoreOutcome, ScoringPipeline, Strategy, WeightFunction};
pub use crate::sentence::SentenceAggregator;
pub use crate::vote::{Verdict, Vote};
