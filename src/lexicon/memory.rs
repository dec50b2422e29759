//! # In-memory lexicon
//!
//! Terms map to one or more senses, each a `(positive, negative)` pair. A
//! term's polarity is the multi-sense average weighted by how many senses lean
//! each way (`fp` positive-leaning, `fn` negative-leaning senses):
//!
//! `(fp/(fp+fn) * mean(pos), fn/(fp+fn) * mean(neg))`
//!
//! Terms whose senses are all balanced score neutral.
//!
//! Loaders:
//! - JSON: `{"a": {"good": [[0.75, 0.0]]}, "v": {...}}`
//! - CSV lines: `term,POS,pos,neg` with POS in `A/V/R/N`
//! - frequency listings: `word<TAB>count`, normalised by a corpus size

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};
use tracing::debug;

use super::{Lexicon, PartOfSpeech, Polarity};

/// Token count of the reference corpus used to turn raw counts into
/// probabilities.
pub const DEFAULT_CORPUS_SIZE: f64 = 51_000_000.0;

/// Size and sense leanings of one partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionInfo {
    pub terms: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// How far two lexicons agree on the terms they share in one partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub intersect: usize,
    /// Share of shared terms whose polarities lean the same way; 0 when
    /// nothing is shared.
    pub agreement: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLexicon {
    name: String,
    terms: HashMap<PartOfSpeech, HashMap<String, Vec<Polarity>>>,
    frequencies: HashMap<String, f64>,
}

/// JSON file shape; each partition is optional.
#[derive(Debug, Default, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    a: HashMap<String, Vec<(f64, f64)>>,
    #[serde(default)]
    v: HashMap<String, Vec<(f64, f64)>>,
    #[serde(default)]
    r: HashMap<String, Vec<(f64, f64)>>,
    #[serde(default)]
    n: HashMap<String, Vec<(f64, f64)>>,
    #[serde(default)]
    frequencies: HashMap<String, f64>,
}

impl MemoryLexicon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add one sense for `term` (stored lower-cased).
    pub fn insert(&mut self, pos: PartOfSpeech, term: &str, positive: f64, negative: f64) {
        self.terms
            .entry(pos)
            .or_default()
            .entry(term.to_lowercase())
            .or_default()
            .push(Polarity::new(positive, negative));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, pos: PartOfSpeech, term: &str, positive: f64, negative: f64) -> Self {
        self.insert(pos, term, positive, negative);
        self
    }

    /// Set the corpus probability for `term`.
    pub fn set_frequency(&mut self, term: &str, p: f64) {
        self.frequencies.insert(term.to_lowercase(), p.clamp(0.0, 1.0));
    }

    /// Number of distinct terms across all partitions.
    pub fn len(&self) -> usize {
        self.terms.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct terms in one partition.
    pub fn partition_len(&self, pos: PartOfSpeech) -> usize {
        self.terms.get(&pos).map(HashMap::len).unwrap_or(0)
    }

    /// Terms of one partition, unordered.
    pub fn terms(&self, pos: PartOfSpeech) -> impl Iterator<Item = &str> {
        self.terms
            .get(&pos)
            .into_iter()
            .flat_map(|t| t.keys().map(String::as_str))
    }

    /// Per-partition term count and how many senses lean positive, negative
    /// or neither. Partitions with no terms are omitted.
    pub fn info(&self) -> BTreeMap<PartOfSpeech, PartitionInfo> {
        let mut out = BTreeMap::new();
        for (pos, table) in &self.terms {
            if table.is_empty() {
                continue;
            }
            let mut info = PartitionInfo {
                terms: table.len(),
                ..Default::default()
            };
            for sense in table.values().flatten() {
                if sense.positive > sense.negative {
                    info.positive += 1;
                } else if sense.negative > sense.positive {
                    info.negative += 1;
                } else {
                    info.neutral += 1;
                }
            }
            out.insert(*pos, info);
        }
        out
    }

    /// Compare this lexicon's `pos` partition against `other`. Two scores
    /// agree when the sign of `positive - negative` is the same.
    pub fn compare(&self, other: &dyn Lexicon, pos: PartOfSpeech) -> Comparison {
        let mut intersect = 0usize;
        let mut agree = 0usize;
        for term in self.terms(pos) {
            if !other.has_term(pos, term) {
                continue;
            }
            intersect += 1;
            if lean(self.score(pos, term)) == lean(other.score(pos, term)) {
                agree += 1;
            }
        }
        let agreement = if intersect == 0 {
            0.0
        } else {
            agree as f64 / intersect as f64
        };
        Comparison {
            intersect,
            agreement,
        }
    }

    /// Parse the JSON lexicon format.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let file: LexiconFile = serde_json::from_str(s)?;
        let mut lex = Self::new(file.name.unwrap_or_else(|| "json".to_string()));
        for (pos, table) in [
            (PartOfSpeech::Adjective, file.a),
            (PartOfSpeech::Verb, file.v),
            (PartOfSpeech::Adverb, file.r),
            (PartOfSpeech::Noun, file.n),
        ] {
            for (term, senses) in table {
                for (p, n) in senses {
                    lex.insert(pos, &term, p, n);
                }
            }
        }
        for (term, p) in file.frequencies {
            lex.set_frequency(&term, p);
        }
        Ok(lex)
    }

    /// Parse `term,POS,pos,neg` lines. Blank lines and `#` comments are
    /// skipped; malformed lines are an error naming the line number.
    pub fn from_csv_str(name: &str, s: &str) -> Result<Self> {
        let mut lex = Self::new(name);
        for (lineno, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < 4 {
                return Err(anyhow!("line {}: expected term,POS,pos,neg", lineno + 1));
            }
            let pos = PartOfSpeech::from_code(fields[1])
                .ok_or_else(|| anyhow!("line {}: unknown POS '{}'", lineno + 1, fields[1]))?;
            let p: f64 = fields[2]
                .parse()
                .with_context(|| format!("line {}: positive value", lineno + 1))?;
            let n: f64 = fields[3]
                .parse()
                .with_context(|| format!("line {}: negative value", lineno + 1))?;
            lex.insert(pos, fields[0], p, n);
        }
        Ok(lex)
    }

    /// Load from a `.json` or `.csv`/`.lex` file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading lexicon from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("lexicon");
        let lex = match ext.as_str() {
            "json" => Self::from_json_str(&content),
            _ => Self::from_csv_str(stem, &content),
        }
        .with_context(|| format!("parsing lexicon {}", path.display()))?;
        debug!(name = lex.name(), terms = lex.len(), "lexicon loaded");
        Ok(lex)
    }

    /// Replace the frequency table with `word<TAB>count` rows divided by
    /// `corpus_size`. Rows with a non-numeric count are ignored; repeated
    /// words (any case) accumulate.
    pub fn load_frequency_counts(&mut self, listing: &str, corpus_size: f64) {
        let mut counts: HashMap<String, f64> = HashMap::new();
        for line in listing.lines() {
            let mut fields = line.split('\t');
            let (Some(word), Some(count)) = (fields.next(), fields.next()) else {
                continue;
            };
            let count = count.trim();
            if word.is_empty() || count.is_empty() || !count.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if let Ok(c) = count.parse::<f64>() {
                *counts.entry(word.to_lowercase()).or_default() += c;
            }
        }
        self.frequencies = counts
            .into_iter()
            .map(|(w, c)| (w, c / corpus_size))
            .collect();
    }

    /// Sense-weighted average; see module docs.
    fn best_values(senses: &[Polarity]) -> Polarity {
        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut found_pos = 0.0;
        let mut found_neg = 0.0;
        for s in senses {
            pos_sum += s.positive;
            neg_sum += s.negative;
            if s.positive > s.negative {
                found_pos += 1.0;
            }
            if s.negative > s.positive {
                found_neg += 1.0;
            }
        }
        if found_pos == 0.0 && found_neg == 0.0 {
            return Polarity::NEUTRAL;
        }
        let items = senses.len().max(1) as f64;
        let polar = found_pos + found_neg;
        Polarity::new(
            (found_pos / polar) * (pos_sum / items),
            (found_neg / polar) * (neg_sum / items),
        )
    }
}

/// Sign of `positive - negative`, with exact balance as its own class.
fn lean(p: Polarity) -> std::cmp::Ordering {
    p.positive.total_cmp(&p.negative)
}

impl Lexicon for MemoryLexicon {
    fn score(&self, pos: PartOfSpeech, term: &str) -> Polarity {
        self.terms
            .get(&pos)
            .and_then(|t| t.get(term))
            .map(|senses| Self::best_values(senses))
            .unwrap_or(Polarity::NEUTRAL)
    }

    fn has_term(&self, pos: PartOfSpeech, term: &str) -> bool {
        self.terms
            .get(&pos)
            .is_some_and(|t| t.contains_key(term))
    }

    fn frequency(&self, term: &str) -> f64 {
        self.frequencies.get(term).copied().unwrap_or(0.0)
    }

    fn is_loaded(&self) -> bool {
        !self.is_empty()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn lists_partition_terms() {
        let lex = MemoryLexicon::new("t")
            .with(PartOfSpeech::Verb, "hate", 0.0, 1.0)
            .with(PartOfSpeech::Verb, "love", 1.0, 0.0);
        let mut verbs: Vec<&str> = lex.terms(PartOfSpeech::Verb).collect();
        verbs.sort();
        assert_eq!(verbs, vec!["hate", "love"]);
        assert_eq!(lex.terms(PartOfSpeech::Noun).count(), 0);
    }

    #[test]
    fn single_sense_is_returned_as_is() {
        let lex = MemoryLexicon::new("t").with(PartOfSpeech::Adjective, "Good", 0.75, 0.0);
        assert_eq!(
            lex.score(PartOfSpeech::Adjective, "good"),
            Polarity::new(0.75, 0.0)
        );
        assert!(lex.has_term(PartOfSpeech::Adjective, "good"));
        assert!(!lex.has_term(PartOfSpeech::Verb, "good"));
        assert_eq!(lex.score(PartOfSpeech::Verb, "good"), Polarity::NEUTRAL);
    }

    #[test]
    fn multi_sense_average() {
        let lex = MemoryLexicon::new("t")
            .with(PartOfSpeech::Adjective, "cool", 0.5, 0.0)
            .with(PartOfSpeech::Adjective, "cool", 0.0, 0.5)
            .with(PartOfSpeech::Adjective, "cool", 0.25, 0.25)
            .with(PartOfSpeech::Adjective, "cool", 0.75, 0.25);
        // 2 positive-leaning, 1 negative-leaning of 4 senses.
        let p = lex.score(PartOfSpeech::Adjective, "cool");
        assert!((p.positive - (2.0 / 3.0) * (1.5 / 4.0)).abs() < 1e-12);
        assert!((p.negative - (1.0 / 3.0) * (1.0 / 4.0)).abs() < 1e-12);
    }

    #[test]
    fn balanced_senses_are_neutral() {
        let lex = MemoryLexicon::new("t").with(PartOfSpeech::Noun, "blue", 0.25, 0.25);
        assert!(lex.score(PartOfSpeech::Noun, "blue").is_neutral());
    }

    #[test]
    fn empty_lexicon_is_not_loaded() {
        assert!(!MemoryLexicon::new("empty").is_loaded());
        assert!(MemoryLexicon::new("x")
            .with(PartOfSpeech::Verb, "hate", 0.0, 1.0)
            .is_loaded());
    }

    #[test]
    fn json_format() {
        let lex = MemoryLexicon::from_json_str(
            r#"{"name":"demo","a":{"good":[[1.0,0.0]]},"v":{"hate":[[0.0,1.0]]},"frequencies":{"good":0.001}}"#,
        )
        .unwrap();
        assert_eq!(lex.name(), "demo");
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.score(PartOfSpeech::Verb, "hate"), Polarity::new(0.0, 1.0));
        assert!((lex.frequency("good") - 0.001).abs() < 1e-12);
        assert_eq!(lex.frequency("unknown"), 0.0);
    }

    #[test]
    fn csv_format_and_errors() {
        let lex = MemoryLexicon::from_csv_str(
            "moby",
            "# comment\ngood,A,1.0,0.0\n\nhate,V,0.0,0.75\n",
        )
        .unwrap();
        assert_eq!(lex.partition_len(PartOfSpeech::Adjective), 1);
        assert_eq!(lex.score(PartOfSpeech::Verb, "hate"), Polarity::new(0.0, 0.75));

        let err = MemoryLexicon::from_csv_str("bad", "good,Q,1,0").unwrap_err();
        assert!(err.to_string().contains("line 1"));
        assert!(MemoryLexicon::from_csv_str("bad", "good,A,x,0").is_err());
    }

    #[test]
    fn frequency_counts_accumulate_case_insensitively() {
        let mut lex = MemoryLexicon::new("f");
        lex.load_frequency_counts("The\t30\nthe\t70\nodd\tn/a\ngood\t50\n", 1000.0);
        assert!((lex.frequency("the") - 0.1).abs() < 1e-12);
        assert!((lex.frequency("good") - 0.05).abs() < 1e-12);
        assert_eq!(lex.frequency("odd"), 0.0);
    }

    #[test]
    fn info_counts_senses_per_partition() {
        let lex = MemoryLexicon::new("i")
            .with(PartOfSpeech::Adjective, "good", 0.75, 0.0)
            .with(PartOfSpeech::Adjective, "good", 0.5, 0.25)
            .with(PartOfSpeech::Adjective, "blue", 0.25, 0.25)
            .with(PartOfSpeech::Verb, "hate", 0.0, 1.0);
        let info = lex.info();
        assert_eq!(
            info[&PartOfSpeech::Adjective],
            PartitionInfo { terms: 2, positive: 2, negative: 0, neutral: 1 }
        );
        assert_eq!(info[&PartOfSpeech::Verb].negative, 1);
        assert!(!info.contains_key(&PartOfSpeech::Noun));
    }

    #[test]
    fn compare_counts_shared_terms_and_sign_agreement() {
        let ours = MemoryLexicon::new("ours")
            .with(PartOfSpeech::Adjective, "good", 0.75, 0.0)
            .with(PartOfSpeech::Adjective, "sick", 0.0, 0.5)
            .with(PartOfSpeech::Adjective, "blue", 0.25, 0.25)
            .with(PartOfSpeech::Adjective, "only", 0.5, 0.0);
        let theirs = MemoryLexicon::new("theirs")
            .with(PartOfSpeech::Adjective, "good", 0.25, 0.0)
            .with(PartOfSpeech::Adjective, "sick", 0.5, 0.0)
            .with(PartOfSpeech::Adjective, "blue", 0.0, 0.0)
            .with(PartOfSpeech::Verb, "only", 0.5, 0.0);

        let cmp = ours.compare(&theirs, PartOfSpeech::Adjective);
        assert_eq!(cmp.intersect, 3);
        // good and blue agree, sick flips
        assert!((cmp.agreement - 2.0 / 3.0).abs() < 1e-12);

        let none = ours.compare(&theirs, PartOfSpeech::Noun);
        assert_eq!(none, Comparison { intersect: 0, agreement: 0.0 });
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.json");
        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, r#"{{"a":{{"nice":[[0.5,0.0]]}}}}"#).unwrap();
        }
        let lex = MemoryLexicon::load(&path).unwrap();
        assert!(lex.has_term(PartOfSpeech::Adjective, "nice"));

        let csv = dir.path().join("tiny.lex");
        fs::write(&csv, "awful,A,0.0,1.0\n").unwrap();
        let lex = MemoryLexicon::load(&csv).unwrap();
        assert_eq!(lex.name(), "tiny");
        assert!(lex.has_term(PartOfSpeech::Adjective, "awful"));

        assert!(MemoryLexicon::load(&dir.path().join("missing.json")).is_err());
    }
}
