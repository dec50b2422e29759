//! Per-call result bundle.

use serde::Serialize;
use std::collections::BTreeMap;

/// Contribution recorded for one scanned token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    /// Negation mask value, `None` when negation is disabled.
    pub negated: Option<u8>,
    pub positive: f64,
    pub negative: f64,
}

/// One document token in scan order; `contribution` is set for tokens whose
/// category was scanned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenTrace {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution: Option<Contribution>,
}

impl TokenTrace {
    pub fn plain(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            contribution: None,
        }
    }

    pub fn scored(token: impl Into<String>, contribution: Contribution) -> Self {
        Self {
            token: token.into(),
            contribution: Some(contribution),
        }
    }

    /// `token##NEGAT:<0|1|NONEG>##POS:<p>##NEG:<n>` for scanned tokens, the
    /// bare token otherwise.
    pub fn annotated(&self) -> String {
        match &self.contribution {
            None => self.token.clone(),
            Some(c) => {
                let negat = c
                    .negated
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "NONEG".to_string());
                format!(
                    "{}##NEGAT:{}##POS:{:?}##NEG:{:?}",
                    self.token, negat, c.positive, c.negative
                )
            }
        }
    }
}

/// Everything a classification call produced. Built fresh for every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunResult {
    pub doc: String,
    pub result_pos: f64,
    pub result_neg: f64,
    pub trace: Vec<TokenTrace>,
    /// Tokens whose category was scanned.
    pub tokens_found: usize,
    /// Sum of the negation mask.
    pub tokens_negated: usize,
    /// Found tokens inside a negated span (negation enabled only).
    pub found_negated: usize,
    /// Occurrences per exact tagged-token string.
    pub found_list: BTreeMap<String, usize>,
    /// Found tokens the lexicon had no polarity for.
    pub unscored_list: Vec<String>,
}

impl RunResult {
    /// The trace rendered as a single space-separated string.
    pub fn annotated_doc(&self) -> String {
        self.trace
            .iter()
            .map(TokenTrace::annotated)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Fold `other` into `self`: traces and unscored lists concatenated,
    /// counts summed, counters merged. Totals are left to the caller.
    pub fn merge(&mut self, other: RunResult) {
        self.trace.extend(other.trace);
        self.tokens_found += other.tokens_found;
        self.tokens_negated += other.tokens_negated;
        self.found_negated += other.found_negated;
        for (k, v) in other.found_list {
            *self.found_list.entry(k).or_insert(0) += v;
        }
        self.unscored_list.extend(other.unscored_list);
    }
}
