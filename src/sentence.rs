//! Sentence-level aggregation.
//!
//! The document is cut at tagged sentence terminators (`./.`, `!_.` ...),
//! each sentence is scored by an inner pipeline and casts one vote: `(1, 0)`,
//! `(0, 1)` or `(0, 0)`. Document totals are the vote sums.

use std::sync::Arc;
use tracing::debug;

use crate::config::{presets, ScoreConfig};
use crate::error::ScoreError;
use crate::lexicon::Lexicon;
use crate::result::RunResult;
use crate::scoring::{ScoreOutcome, ScoringPipeline, Strategy};
use crate::token::surface;
use crate::vote::Verdict;

pub const DEFAULT_MIN_QUESTION_SIZE: usize = 3;

#[derive(Debug, Clone)]
pub struct SentenceAggregator {
    pipeline: ScoringPipeline,
    /// Added to the negative score of long questions before voting.
    pub question_neg_weight: f64,
    /// Questions need more tokens than this to be reweighted.
    pub min_question_size: usize,
}

impl SentenceAggregator {
    /// Aggregate over an arbitrary inner pipeline.
    pub fn new(pipeline: ScoringPipeline) -> Self {
        Self {
            pipeline,
            question_neg_weight: 0.0,
            min_question_size: DEFAULT_MIN_QUESTION_SIZE,
        }
    }

    /// Aggregate over the default sentence scorer: aggressive Potts
    /// (adjustment 0.5) on adjectives and verbs. Pair with [`Self::default_config`].
    pub fn with_lexicon(lexicon: Arc<dyn Lexicon>) -> Self {
        Self::new(
            ScoringPipeline::new()
                .with_lexicon(lexicon)
                .with_strategy(Strategy::Potts {
                    negation_adjustment: 0.5,
                }),
        )
    }

    /// Configuration of the default sentence scorer.
    pub fn default_config() -> ScoreConfig {
        presets::preset("av_aggressive_potts")
            .map(|p| p.config)
            .unwrap_or_default()
    }

    pub fn with_question_rule(mut self, neg_weight: f64, min_size: usize) -> Self {
        self.question_neg_weight = neg_weight;
        self.min_question_size = min_size;
        self
    }

    pub fn pipeline(&self) -> &ScoringPipeline {
        &self.pipeline
    }

    /// Score `doc` sentence by sentence; `cfg` drives the inner pipeline.
    pub fn classify(
        &self,
        doc: &str,
        tagged: bool,
        cfg: &ScoreConfig,
    ) -> Result<ScoreOutcome, ScoreError> {
        let prepared = self.pipeline.prepare(doc, tagged)?;
        let sep = prepared.sep;

        let mut run = RunResult {
            doc: doc.to_string(),
            ..Default::default()
        };
        let (mut pos_votes, mut neg_votes) = (0.0, 0.0);

        for sentence in split_sentences(&prepared.text, sep) {
            let text = sentence.join(" ");
            let outcome = self
                .pipeline
                .scan(prepared.lexicon, &text, &text, sep, cfg);

            let mut neg = outcome.negative;
            if self.is_long_question(&sentence, sep) {
                neg += self.question_neg_weight;
            }
            let (p, n) = Verdict::from_scores(outcome.positive, neg).flags();
            debug!(
                tokens = sentence.len(),
                positive = outcome.positive,
                negative = neg,
                vote = ?(p, n),
                "sentence scored"
            );
            pos_votes += p as f64;
            neg_votes += n as f64;
            run.merge(outcome.run);
        }

        run.result_pos = pos_votes;
        run.result_neg = neg_votes;
        Ok(ScoreOutcome {
            positive: pos_votes,
            negative: neg_votes,
            run,
        })
    }

    fn is_long_question(&self, sentence: &[&str], sep: char) -> bool {
        sentence.len() > self.min_question_size
            && sentence
                .last()
                .is_some_and(|last| surface(last, sep) == "?")
    }
}

/// Whitespace tokens grouped into sentences. A sentence ends with a `.`, `!`
/// or `?` token tagged `.`; trailing tokens form a final sentence.
pub fn split_sentences(text: &str, sep: char) -> Vec<Vec<&str>> {
    let terminators: Vec<String> = ['.', '!', '?']
        .iter()
        .map(|p| format!("{p}{sep}."))
        .collect();

    let mut sentences = Vec::new();
    let mut current = Vec::new();
    for token in text.split_whitespace() {
        current.push(token);
        if terminators.iter().any(|t| t == token) {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}
