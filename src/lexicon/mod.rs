//! Sentiment lexicon interface and the in-memory implementations shipped with
//! the crate.
//!
//! The scoring engine only talks to the [`Lexicon`] trait; loading formats live
//! in [`memory`], chaining in [`composite`].

pub mod composite;
pub mod memory;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use composite::CompositeLexicon;
pub use memory::{Comparison, MemoryLexicon, PartitionInfo};

/// Lexicon partition a term is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Adjective,
    Verb,
    Adverb,
    Noun,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 4] = [
        PartOfSpeech::Adjective,
        PartOfSpeech::Verb,
        PartOfSpeech::Adverb,
        PartOfSpeech::Noun,
    ];

    /// Single-letter code used in lexicon files and configuration (`a/v/r/n`).
    pub fn code(self) -> char {
        match self {
            PartOfSpeech::Adjective => 'a',
            PartOfSpeech::Verb => 'v',
            PartOfSpeech::Adverb => 'r',
            PartOfSpeech::Noun => 'n',
        }
    }

    /// Parse a single-letter code, case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "a" => Some(PartOfSpeech::Adjective),
            "v" => Some(PartOfSpeech::Verb),
            "r" => Some(PartOfSpeech::Adverb),
            "n" => Some(PartOfSpeech::Noun),
            _ => None,
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// (positive, negative) polarity pair. `(0, 0)` means neutral or not found.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Polarity {
    pub positive: f64,
    pub negative: f64,
}

impl Polarity {
    pub const NEUTRAL: Polarity = Polarity {
        positive: 0.0,
        negative: 0.0,
    };

    pub fn new(positive: f64, negative: f64) -> Self {
        Self { positive, negative }
    }

    pub fn is_neutral(&self) -> bool {
        self.positive == 0.0 && self.negative == 0.0
    }

    /// Both components multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.positive * factor, self.negative * factor)
    }

    /// Value at index 0 (positive) or 1 (negative).
    pub fn get(&self, index: usize) -> f64 {
        if index == 0 {
            self.positive
        } else {
            self.negative
        }
    }
}

/// Read-only term → polarity source, partitioned by part of speech.
pub trait Lexicon: Send + Sync {
    /// Polarity of `term` in the `pos` partition; neutral if unknown.
    fn score(&self, pos: PartOfSpeech, term: &str) -> Polarity;

    fn has_term(&self, pos: PartOfSpeech, term: &str) -> bool;

    /// Corpus probability of `term` in `[0, 1]`; `0.0` if unknown.
    fn frequency(&self, _term: &str) -> f64 {
        0.0
    }

    fn is_loaded(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}
