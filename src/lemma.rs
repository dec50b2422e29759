//! Verb lemmatization before lexicon lookup.
//!
//! [`LexiconLemmatizer`] follows the WordNet "morphy" approach: check an
//! exceptions table, then detach inflectional suffixes and keep the first
//! candidate the lexicon knows as a verb.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

use crate::lexicon::{Lexicon, PartOfSpeech};

pub trait Lemmatizer: Send + Sync {
    /// Base form of a (lower-cased) verb.
    fn lemmatize(&self, term: &str) -> String;
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, term: &str) -> String {
        term.to_string()
    }
}

/// Suffix detachment rules for verbs, tried in order.
const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("am", "be"),
        ("are", "be"),
        ("is", "be"),
        ("was", "be"),
        ("were", "be"),
        ("been", "be"),
        ("has", "have"),
        ("had", "have"),
        ("did", "do"),
        ("does", "do"),
        ("done", "do"),
        ("went", "go"),
        ("gone", "go"),
        ("made", "make"),
        ("got", "get"),
        ("gotten", "get"),
        ("took", "take"),
        ("taken", "take"),
        ("gave", "give"),
        ("given", "give"),
        ("saw", "see"),
        ("seen", "see"),
        ("felt", "feel"),
        ("thought", "think"),
        ("brought", "bring"),
        ("bought", "buy"),
        ("fought", "fight"),
        ("left", "leave"),
        ("lost", "lose"),
        ("won", "win"),
        ("broke", "break"),
        ("broken", "break"),
        ("fell", "fall"),
        ("fallen", "fall"),
        ("hurt", "hurt"),
        ("paid", "pay"),
        ("said", "say"),
        ("told", "tell"),
        ("wrote", "write"),
        ("written", "write"),
    ]
    .into_iter()
    .collect()
});

/// Lexicon-backed morphy-style lemmatizer.
pub struct LexiconLemmatizer {
    lexicon: Arc<dyn Lexicon>,
}

impl LexiconLemmatizer {
    pub fn new(lexicon: Arc<dyn Lexicon>) -> Self {
        Self { lexicon }
    }

    fn known(&self, term: &str) -> bool {
        self.lexicon.has_term(PartOfSpeech::Verb, term)
    }
}

impl Lemmatizer for LexiconLemmatizer {
    fn lemmatize(&self, term: &str) -> String {
        if let Some(base) = IRREGULAR.get(term) {
            return (*base).to_string();
        }
        if self.known(term) {
            return term.to_string();
        }
        for (suffix, replacement) in VERB_RULES {
            if let Some(stem) = term.strip_suffix(suffix) {
                if stem.is_empty() {
                    continue;
                }
                let candidate = format!("{stem}{replacement}");
                if self.known(&candidate) {
                    return candidate;
                }
            }
        }
        term.to_string()
    }
}
