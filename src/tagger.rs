//! Part-of-speech tagging for untagged input.
//!
//! [`DictionaryTagger`] is a lookup tagger: words and punctuation are split
//! with a regex, known words get their table tag, everything else the default
//! tag. Good enough to feed the scanner; swap in a statistical tagger through
//! the [`Tagger`] trait when accuracy matters.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

use crate::lexicon::{MemoryLexicon, PartOfSpeech};

pub trait Tagger: Send + Sync {
    /// Tagged rendition of `raw`: `word/TAG` tokens separated by single spaces.
    fn tag(&self, raw: &str) -> String;
}

/// Words (with inner apostrophes/hyphens) or single punctuation marks.
static RE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\w+(?:[-']\w+)*|[^\w\s]").expect("tagger token regex"));

/// Closed-class words and a handful of sentiment-bearing ones.
const BUILTIN_TAGS: &[(&str, &str)] = &[
    ("a", "DT"),
    ("an", "DT"),
    ("the", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("those", "DT"),
    ("no", "DT"),
    ("not", "RB"),
    ("n't", "RB"),
    ("never", "RB"),
    ("very", "RB"),
    ("really", "RB"),
    ("too", "RB"),
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("nor", "CC"),
    ("yet", "CC"),
    ("i", "PRP"),
    ("you", "PRP"),
    ("he", "PRP"),
    ("she", "PRP"),
    ("it", "PRP"),
    ("we", "PRP"),
    ("they", "PRP"),
    ("is", "VBZ"),
    ("are", "VBP"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("be", "VB"),
    ("been", "VBN"),
    ("do", "VBP"),
    ("does", "VBZ"),
    ("did", "VBD"),
    ("have", "VBP"),
    ("has", "VBZ"),
    ("had", "VBD"),
    ("in", "IN"),
    ("of", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("with", "IN"),
    ("without", "IN"),
    ("for", "IN"),
    ("to", "TO"),
    ("can", "MD"),
    ("ca", "MD"),
    ("will", "MD"),
    ("wo", "MD"),
    ("would", "MD"),
    ("should", "MD"),
    ("could", "MD"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryTagger {
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default = "default_tag")]
    default_tag: String,
}

fn default_tag() -> String {
    "NN".to_string()
}

impl Default for DictionaryTagger {
    fn default() -> Self {
        Self {
            tags: BUILTIN_TAGS
                .iter()
                .map(|(w, t)| (w.to_string(), t.to_string()))
                .collect(),
            default_tag: default_tag(),
        }
    }
}

impl DictionaryTagger {
    /// Add or replace an entry (word stored lower-cased).
    pub fn insert(&mut self, word: &str, tag: &str) {
        self.tags.insert(word.to_lowercase(), tag.to_uppercase());
    }

    pub fn with(mut self, word: &str, tag: &str) -> Self {
        self.insert(word, tag);
        self
    }

    /// Tag every lexicon verb `VB` and adjective `JJ` (adjective wins when a
    /// word is both). Existing entries are kept.
    pub fn extend_from_lexicon(&mut self, lexicon: &MemoryLexicon) {
        let mut learned: HashMap<String, &str> = HashMap::new();
        for (pos, tag) in [(PartOfSpeech::Verb, "VB"), (PartOfSpeech::Adjective, "JJ")] {
            for term in lexicon.terms(pos) {
                learned.insert(term.to_string(), tag);
            }
        }
        for (word, tag) in learned {
            self.tags.entry(word).or_insert_with(|| tag.to_string());
        }
    }

    fn tag_for(&self, word: &str) -> String {
        match word {
            "." | "!" | "?" => ".".to_string(),
            ":" | ";" => ":".to_string(),
            "," => ",".to_string(),
            _ if word.chars().all(|c| !c.is_alphanumeric()) => "SYM".to_string(),
            _ if word.chars().all(|c| c.is_ascii_digit()) => "CD".to_string(),
            _ => self
                .tags
                .get(&word.to_lowercase())
                .cloned()
                .unwrap_or_else(|| self.default_tag.clone()),
        }
    }
}

impl Tagger for DictionaryTagger {
    fn tag(&self, raw: &str) -> String {
        let mut out = Vec::new();
        for m in RE_TOKEN.find_iter(raw) {
            let word = m.as_str();
            // Penn convention: "don't" -> "do" + "n't"
            match word.strip_suffix("n't") {
                Some(stem) if !stem.is_empty() => {
                    out.push(format!("{}/{}", stem, self.tag_for(stem)));
                    out.push(format!("n't/{}", self.tag_for("n't")));
                }
                _ => out.push(format!("{}/{}", word, self.tag_for(word))),
            }
        }
        out.join(" ")
    }
}
