//! Document scoring engine.
//!
//! A [`ScoringPipeline`] holds the read-only collaborators (lexicon, stop
//! words, tagger, lemmatizer) and a [`Strategy`]. Every `classify` call
//! receives its own [`ScoreConfig`] and keeps all mutable state in a local
//! scan context, so one pipeline can serve concurrent callers.
//!
//! Per token the contribution goes through, in order: category check, lexicon
//! lookup and per-category scaling, occurrence counting and eligibility,
//! negation flip, position weighting, frequency scaling, backoff and
//! attenuation. The strategy may then adjust the document totals.

pub mod strategy;
pub mod weighting;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::{ScoreConfig, ScoreMode};
use crate::error::ScoreError;
use crate::lemma::{Lemmatizer, LexiconLemmatizer};
use crate::lexicon::{Lexicon, PartOfSpeech, Polarity};
use crate::negation::{NegationMask, NegationScanner};
use crate::result::{Contribution, RunResult, TokenTrace};
use crate::stopwords::{StopWords, StopwordList};
use crate::tagger::Tagger;
use crate::token::{detect_separator, Token};
use crate::vote::Verdict;

pub use strategy::Strategy;
pub use weighting::WeightFunction;

use strategy::{taboada_frequency, taboada_shifted};
use weighting::{freq_adjust, repeated_backoff};

/// Totals plus the full run record of one classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub positive: f64,
    pub negative: f64,
    pub run: RunResult,
}

impl ScoreOutcome {
    pub fn scores(&self) -> (f64, f64) {
        (self.positive, self.negative)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_scores(self.positive, self.negative)
    }
}

#[derive(Clone)]
pub struct ScoringPipeline {
    lexicon: Option<Arc<dyn Lexicon>>,
    stopwords: Arc<dyn StopWords>,
    tagger: Option<Arc<dyn Tagger>>,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
    strategy: Strategy,
}

impl Default for ScoringPipeline {
    fn default() -> Self {
        Self {
            lexicon: None,
            stopwords: Arc::new(StopwordList::builtin()),
            tagger: None,
            lemmatizer: None,
            strategy: Strategy::Identity,
        }
    }
}

impl std::fmt::Debug for ScoringPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringPipeline")
            .field("lexicon", &self.lexicon.as_ref().map(|l| l.name().to_string()))
            .field("tagger", &self.tagger.is_some())
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl ScoringPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon(mut self, lexicon: Arc<dyn Lexicon>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn with_stopwords(mut self, stopwords: Arc<dyn StopWords>) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn with_tagger(mut self, tagger: Arc<dyn Tagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    /// Override the verb lemmatizer. Without one, verbs are lemmatized
    /// against the attached lexicon.
    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = Some(lemmatizer);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn lexicon(&self) -> Option<&Arc<dyn Lexicon>> {
        self.lexicon.as_ref()
    }

    /// Score `doc`. With `tagged == false` the attached tagger produces the
    /// tagged form first.
    pub fn classify(
        &self,
        doc: &str,
        tagged: bool,
        cfg: &ScoreConfig,
    ) -> Result<ScoreOutcome, ScoreError> {
        let prepared = self.prepare(doc, tagged)?;
        Ok(self.scan(prepared.lexicon, doc, &prepared.text, prepared.sep, cfg))
    }

    /// Precondition checks, tagging and separator detection.
    pub(crate) fn prepare<'a>(
        &'a self,
        doc: &'a str,
        tagged: bool,
    ) -> Result<Prepared<'a>, ScoreError> {
        let lexicon = self.lexicon.as_ref().ok_or(ScoreError::LexiconMissing)?;
        if !lexicon.is_loaded() {
            return Err(ScoreError::LexiconNotLoaded(lexicon.name().to_string()));
        }

        let text: Cow<'a, str> = if tagged {
            Cow::Borrowed(doc)
        } else {
            let tagger = self.tagger.as_ref().ok_or(ScoreError::TaggerMissing)?;
            Cow::Owned(tagger.tag(doc))
        };

        let sep = detect_separator(&text).ok_or_else(|| ScoreError::tag_separator(doc))?;
        Ok(Prepared { lexicon, text, sep })
    }

    /// One scan over already tagged `text`. `doc` is what the run record
    /// reports as the input.
    pub(crate) fn scan(
        &self,
        lexicon: &Arc<dyn Lexicon>,
        doc: &str,
        text: &str,
        sep: char,
        cfg: &ScoreConfig,
    ) -> ScoreOutcome {
        debug!(separator = %sep, strategy = self.strategy.name(), "classify");

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mask = NegationScanner::detect_with_separator(&tokens, cfg.negation_window, sep);

        let fallback;
        let lemmatizer: &dyn Lemmatizer = match &self.lemmatizer {
            Some(l) => &**l,
            None => {
                fallback = LexiconLemmatizer::new(Arc::clone(lexicon));
                &fallback
            }
        };

        let mut ctx = ScanContext {
            pipeline: self,
            lexicon: &**lexicon,
            lemmatizer,
            cfg,
            mask: &mask,
            doclen: tokens.len(),
            totals: Polarity::NEUTRAL,
            counter: BTreeMap::new(),
            trace: Vec::with_capacity(tokens.len()),
            found: 0,
            found_negated: 0,
            unscored: Vec::new(),
        };
        for (idx, raw) in tokens.iter().enumerate() {
            ctx.scan_token(idx + 1, raw, sep);
        }

        let totals = self.strategy.adjust_totals(ctx.totals, &mask, cfg);
        debug!(
            positive = totals.positive,
            negative = totals.negative,
            found = ctx.found,
            "classify done"
        );

        let run = RunResult {
            doc: doc.to_string(),
            result_pos: totals.positive,
            result_neg: totals.negative,
            trace: ctx.trace,
            tokens_found: ctx.found,
            tokens_negated: mask.iter().map(|&m| m as usize).sum(),
            found_negated: ctx.found_negated,
            found_list: ctx.counter,
            unscored_list: ctx.unscored,
        };
        ScoreOutcome {
            positive: totals.positive,
            negative: totals.negative,
            run,
        }
    }
}

/// Input that passed the precondition checks.
pub(crate) struct Prepared<'a> {
    pub lexicon: &'a Arc<dyn Lexicon>,
    pub text: Cow<'a, str>,
    pub sep: char,
}

/// Mutable state of one scan.
struct ScanContext<'a> {
    pipeline: &'a ScoringPipeline,
    lexicon: &'a dyn Lexicon,
    lemmatizer: &'a dyn Lemmatizer,
    cfg: &'a ScoreConfig,
    mask: &'a NegationMask,
    doclen: usize,
    totals: Polarity,
    counter: BTreeMap<String, usize>,
    trace: Vec<TokenTrace>,
    found: usize,
    found_negated: usize,
    unscored: Vec<String>,
}

impl ScanContext<'_> {
    /// `position` is 1-indexed.
    fn scan_token(&mut self, position: usize, raw: &str, sep: char) {
        let Some(token) = Token::parse(raw, sep) else {
            // corrupt token: skipped, position still counts
            return;
        };
        let cfg = self.cfg;
        let Some(pos) = token.category(|p| cfg.scans(p)) else {
            self.trace.push(TokenTrace::plain(raw));
            return;
        };

        let term = match pos {
            PartOfSpeech::Verb => self.lemmatizer.lemmatize(&token.word),
            _ => token.word.clone(),
        };
        let lookup = self.lexicon.score(pos, &term);
        let value = lookup.scaled(cfg.adjust_for(pos));

        let count = {
            let c = self.counter.entry(raw.to_string()).or_insert(0);
            *c += 1;
            *c
        };
        let negated = self.mask.get(position - 1).copied().unwrap_or(0);

        let contribution = match self.pipeline.strategy {
            Strategy::Taboada { negation_shift } => {
                self.taboada_contribution(&token.word, value, count, position, negated, negation_shift)
            }
            _ => self.contribution(&token.word, value, count, position, negated),
        };

        self.totals.positive += contribution.positive;
        self.totals.negative += contribution.negative;
        self.found += 1;
        if lookup.is_neutral() {
            self.unscored.push(raw.to_string());
        }
        if cfg.negation && negated == 1 {
            self.found_negated += 1;
        }
        debug!(
            token = raw,
            position,
            negated,
            positive = contribution.positive,
            negative = contribution.negative,
            "token scored"
        );
        self.trace.push(TokenTrace::scored(
            raw,
            Contribution {
                negated: cfg.negation.then_some(negated),
                positive: contribution.positive,
                negative: contribution.negative,
            },
        ));
    }

    fn eligible(&self, word: &str, count: usize) -> bool {
        let by_mode = match self.cfg.score_mode {
            ScoreMode::All | ScoreMode::Backoff => true,
            ScoreMode::Once => count == 1,
        };
        by_mode && !self.is_filtered_stop(word)
    }

    fn is_filtered_stop(&self, word: &str) -> bool {
        self.cfg.score_stop && self.pipeline.stopwords.is_stop(word)
    }

    fn contribution(
        &self,
        word: &str,
        value: Polarity,
        count: usize,
        position: usize,
        negated: u8,
    ) -> Polarity {
        let cfg = self.cfg;
        if !self.eligible(word, count) {
            return Polarity::NEUTRAL;
        }

        // Inside a negated span positive and negative swap places.
        let (pi, ni) = if cfg.negation && !cfg.atenuation {
            let m = negated as usize;
            (m, 1 - m)
        } else {
            (0, 1)
        };
        let mut pos = cfg.score_function.apply(value.get(pi), position, self.doclen);
        let mut neg = cfg.score_function.apply(value.get(ni), position, self.doclen);

        if cfg.score_freq {
            let p = self.lexicon.frequency(word);
            pos = freq_adjust(pos, p, cfg.freq_weight);
            neg = freq_adjust(neg, p, cfg.freq_weight);
        }

        if cfg.score_mode == ScoreMode::Backoff {
            pos = repeated_backoff(pos, count, cfg.backoff_alpha);
            neg = repeated_backoff(neg, count, cfg.backoff_alpha);
        }

        if cfg.negation && cfg.atenuation && negated == 1 {
            pos *= cfg.at_pos;
            neg *= cfg.at_neg;
        }

        Polarity::new(pos, neg)
    }

    fn taboada_contribution(
        &self,
        word: &str,
        value: Polarity,
        count: usize,
        position: usize,
        negated: u8,
        shift: f64,
    ) -> Polarity {
        if self.is_filtered_stop(word) {
            return Polarity::NEUTRAL;
        }
        let cfg = self.cfg;
        let v = taboada_shifted(value, count, negated == 1, shift, cfg);
        let v = Polarity::new(
            cfg.score_function.apply(v.positive, position, self.doclen),
            cfg.score_function.apply(v.negative, position, self.doclen),
        );
        if cfg.score_freq {
            taboada_frequency(v, self.lexicon.frequency(word))
        } else {
            v
        }
    }
}
