//! Ordered chain of lexicons: the first lexicon that knows a term answers.
//!
//! Confidence starts at `1.0` and is multiplied by `factor` for every lexicon
//! skipped, so lower-ranked sources contribute less. `pos_bias`/`neg_bias`
//! scale every answer. Add lexicons from most to least accurate.

use std::sync::Arc;

use super::{Lexicon, PartOfSpeech, Polarity};

pub struct CompositeLexicon {
    name: String,
    members: Vec<Arc<dyn Lexicon>>,
    factor: f64,
    pos_bias: f64,
    neg_bias: f64,
}

impl Default for CompositeLexicon {
    fn default() -> Self {
        Self {
            name: "Composite".to_string(),
            members: Vec::new(),
            factor: 1.0,
            pos_bias: 1.0,
            neg_bias: 1.0,
        }
    }
}

impl CompositeLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_lexicon(&mut self, lexicon: Arc<dyn Lexicon>) {
        self.name.push(' ');
        self.name.push_str(lexicon.name());
        self.members.push(lexicon);
    }

    /// Confidence decay applied per skipped lexicon.
    pub fn set_factor(&mut self, factor: f64) {
        self.factor = factor;
    }

    pub fn set_bias(&mut self, pos_bias: f64, neg_bias: f64) {
        self.pos_bias = pos_bias;
        self.neg_bias = neg_bias;
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Lexicon for CompositeLexicon {
    fn score(&self, pos: PartOfSpeech, term: &str) -> Polarity {
        let mut confidence = 1.0;
        for lex in &self.members {
            if lex.has_term(pos, term) {
                let p = lex.score(pos, term);
                return Polarity::new(
                    p.positive * confidence * self.pos_bias,
                    p.negative * confidence * self.neg_bias,
                );
            }
            confidence *= self.factor;
        }
        Polarity::NEUTRAL
    }

    fn has_term(&self, pos: PartOfSpeech, term: &str) -> bool {
        self.members.iter().any(|l| l.has_term(pos, term))
    }

    /// Frequencies do not depend on lexicon content; the first member answers.
    fn frequency(&self, term: &str) -> f64 {
        self.members
            .first()
            .map(|l| l.frequency(term))
            .unwrap_or(0.0)
    }

    fn is_loaded(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(|l| l.is_loaded())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
