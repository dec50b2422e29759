//! Tagged-token primitives: separator detection, `word/TAG` splitting and
//! POS-tag suffix patterns.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::PartOfSpeech;

/// Separators recognised in tagged text, in detection order.
pub const SEPARATORS: [char; 2] = ['/', '_'];

/// Fallback used by the negation scanner when nothing can be guessed.
pub const DEFAULT_SEPARATOR: char = '_';

/// A single tagged token. `word` is lower-cased, `tag` upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    pub tag: String,
}

impl Token {
    /// Split `raw` at the LAST separator occurrence. Returns `None` for
    /// corrupt tokens (no separator, empty word or empty tag).
    pub fn parse(raw: &str, sep: char) -> Option<Self> {
        let loc = raw.rfind(sep)?;
        let word = &raw[..loc];
        let tag = &raw[loc + sep.len_utf8()..];
        if word.is_empty() || tag.is_empty() {
            return None;
        }
        Some(Self {
            word: word.to_lowercase(),
            tag: tag.to_uppercase(),
        })
    }

    /// Lexicon partition this token's tag points at, among the `enabled`
    /// ones. When several match, the last in [`PartOfSpeech::ALL`] order wins.
    pub fn category(&self, enabled: impl Fn(PartOfSpeech) -> bool) -> Option<PartOfSpeech> {
        PartOfSpeech::ALL
            .into_iter()
            .filter(|pos| enabled(*pos) && tag_matches(&self.tag, *pos))
            .last()
    }
}

/// Pipeline-side separator detection: sample the first `min(3, n)` tokens and
/// accept `/` then `_` when every sampled token contains it.
///
/// An empty document trivially accepts the first candidate.
pub fn detect_separator(doc: &str) -> Option<char> {
    let sample: Vec<&str> = doc.split_whitespace().take(3).collect();
    SEPARATORS
        .into_iter()
        .find(|sep| sample.iter().all(|t| t.contains(*sep)))
}

/// Scanner-side separator guess from the first two tokens, defaulting to `_`.
pub fn guess_separator<S: AsRef<str>>(tokens: &[S]) -> char {
    for t in tokens.iter().take(2) {
        let t = t.as_ref();
        if t.contains('_') {
            return '_';
        } else if t.contains('/') {
            return '/';
        }
    }
    DEFAULT_SEPARATOR
}

/// Surface form of a possibly tagged token: text before the first separator,
/// lower-cased. Untagged tokens are returned whole.
pub fn surface(raw: &str, sep: char) -> String {
    raw.split(sep).next().unwrap_or_default().to_lowercase()
}

static RE_ADJ: Lazy<Regex> = Lazy::new(|| Regex::new(r"(JJ|JJ.)$").expect("adjective regex"));
static RE_VERB: Lazy<Regex> = Lazy::new(|| Regex::new(r"(VB|VB.)$").expect("verb regex"));
static RE_ADV: Lazy<Regex> = Lazy::new(|| Regex::new(r"RB$").expect("adverb regex"));
static RE_NOUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"NN$").expect("noun regex"));

/// Penn-style suffix test for a POS category.
pub fn tag_matches(tag: &str, pos: PartOfSpeech) -> bool {
    match pos {
        PartOfSpeech::Adjective => RE_ADJ.is_match(tag),
        PartOfSpeech::Verb => RE_VERB.is_match(tag),
        PartOfSpeech::Adverb => RE_ADV.is_match(tag),
        PartOfSpeech::Noun => RE_NOUN.is_match(tag),
    }
}
