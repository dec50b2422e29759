//! # Negation scope detection
//!
//! NegEx-style scanner over a token stream. Explicit negation markers
//! (unigrams and bigrams) open a forward window of at most `window` tokens;
//! the window closes early at punctuation or contrastive conjunctions.
//! Pseudo negations ("no wonder", "not only") never open a window.
//!
//! Output is a mask with one entry per token: `1` inside a negated scope.
//!
//! Tie-break order per position:
//! 1. pseudo check (current position only)
//! 2. pre-negation trigger
//! 3. mark / exhaust window
//! 4. end-of-window reset
//!
//! so a single token can be both the last negated token and the closer.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::token::{guess_separator, surface};

/// Per-token negation flags, `0` or `1`.
pub type NegationMask = Vec<u8>;

/// Look-alikes that must not trigger negation.
static NEG_PSEUDO: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "no increase",
        "no wonder",
        "no change",
        "not only",
        "not just",
        "not necessarily",
        "cannot describe",
    ]
    .into_iter()
    .collect()
});

/// Markers that negate what follows.
static NEG_PRENEGATION: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "n't", "cannot", "cant", "can't", "declined", "denied", "denies", "deny",
        "free of", "lack of", "lacks", "lacking", "fails to", "failed to", "fail to",
        "no evidence", "no sign", "no suspicious", "no suggestion", "rather than", "with no",
        "unremarkable", "without", "rules out", "ruled out", "rule out", "isn", "isnt", "isn't",
        "aint", "ain't", "hadnt", "hadn't", "wasnt", "wasn't", "werent", "weren't", "havent",
        "haven't", "wouldnt", "wouldn't", "havnt", "shant", "neither", "nor", "dont", "don't",
        "didnt", "didn't", "wont", "won't", "darent", "daren't", "shouldnt", "shouldn't",
        "reject", "rejects", "rejected", "refuse to", "refused to", "refuses to", "dismiss",
        "dismissed", "dismisses", "couldn", "couldnt", "couldn't", "doesn", "doesnt", "doesn't",
        "non", "nothing", "nobody", "nowhere", "aren", "arent", "aren't", "none",
        "anything but", "negligible", "unlikely to",
    ]
    .into_iter()
    .collect()
});

/// Markers that negate what came before. Backward negation is disabled in
/// the scanner; see [`is_postnegation`].
static NEG_POSNEGATION: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "unlikely", "ruled out", "refused", "rejected", "dismissed", "not true", "false",
        "untrue", "unremarkable", "shot down",
    ]
    .into_iter()
    .collect()
});

/// Tokens that close any open negation window.
static NEG_ENDOFWINDOW: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        ".", ":", ";", ",", ")", "!", "?", "]", "but", "however", "nevertheless", "yet",
        "though", "although", "still", "aside from", "except", "apart from", "because",
        "unless", "therefore",
    ]
    .into_iter()
    .collect()
});

/// True if `term` (unigram or space-joined bigram) is a forward negation marker.
pub fn is_prenegation(term: &str) -> bool {
    NEG_PRENEGATION.contains(term)
}

/// True if `term` is a pseudo negation phrase.
pub fn is_pseudo(term: &str) -> bool {
    NEG_PSEUDO.contains(term)
}

/// True if `term` is a backward negation marker. Not consulted by
/// [`NegationScanner`].
pub fn is_postnegation(term: &str) -> bool {
    NEG_POSNEGATION.contains(term)
}

/// True if `term` closes a negation window.
pub fn is_end_of_window(term: &str) -> bool {
    NEG_ENDOFWINDOW.contains(term)
}

/// Stateless entry point; see [`NegationScanner::scan`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NegationScanner;

impl NegationScanner {
    /// Negation mask for `tokens`, guessing the tag separator from the first
    /// two tokens (`_` if none is found).
    pub fn detect<S: AsRef<str>>(tokens: &[S], window: usize) -> NegationMask {
        let sep = guess_separator(tokens);
        Self::detect_with_separator(tokens, window, sep)
    }

    /// Negation mask for `tokens` with a known tag separator.
    pub fn detect_with_separator<S: AsRef<str>>(
        tokens: &[S],
        window: usize,
        sep: char,
    ) -> NegationMask {
        let words: Vec<String> = tokens.iter().map(|t| surface(t.as_ref(), sep)).collect();
        Self::scan(&words, window)
    }

    /// Core pass over already-untagged, lower-cased surface forms.
    pub fn scan(words: &[String], window: usize) -> NegationMask {
        let n = words.len();
        let mut mask = vec![0u8; n];
        let mut forward = false;
        let mut in_window = 0usize;

        for i in 0..n {
            let unigram = words[i].as_str();
            let bigram = if i + 1 < n {
                format!("{} {}", unigram, words[i + 1])
            } else {
                unigram.to_string()
            };

            let pseudo = is_pseudo(&bigram);

            if !pseudo && (is_prenegation(unigram) || is_prenegation(&bigram)) {
                forward = true;
            }

            if forward {
                if in_window < window {
                    mask[i] = 1;
                    in_window += 1;
                } else {
                    forward = false;
                    in_window = 0;
                }
            }

            if is_end_of_window(unigram) || is_end_of_window(&bigram) {
                forward = false;
                in_window = 0;
            }
        }

        mask
    }
}

/// Number of 0→1 transitions, i.e. onsets of negated spans after the first
/// token.
pub fn count_onsets(mask: &[u8]) -> usize {
    mask.windows(2).filter(|w| w[0] == 0 && w[1] == 1).count()
}
