//! Instance-based pipeline selection.
//!
//! Several named pipelines score the same document. Each one carries training
//! samples `(found_ratio, performance)`; the pipeline whose samples near the
//! document's found ratio perform best on average is trusted for the answer.

use std::sync::Arc;
use tracing::debug;

use crate::config::{presets, ConfigOverrides, ScoreConfig};
use crate::error::ScoreError;
use crate::lexicon::Lexicon;
use crate::scoring::{ScoreOutcome, ScoringPipeline};

pub const DEFAULT_K: u32 = 3;

struct Entry {
    name: String,
    pipeline: ScoringPipeline,
    config: ScoreConfig,
    samples: Vec<(f64, f64)>,
}

impl Entry {
    fn average(&self) -> Option<f64> {
        mean(self.samples.iter().map(|s| s.1))
    }

    /// Mean performance of samples within `[max(0, r - tol), r + tol]`.
    fn expected(&self, ratio: f64, tolerance: f64) -> Option<f64> {
        let lo = (ratio - tolerance).max(0.0);
        let hi = ratio + tolerance;
        mean(
            self.samples
                .iter()
                .filter(|(r, _)| *r >= lo && *r <= hi)
                .map(|s| s.1),
        )
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// What the selector picked and why.
#[derive(Debug, Clone)]
pub struct Selection {
    pub name: String,
    /// Neighbour average of the chosen pipeline; `None` on fallback.
    pub expected_performance: Option<f64>,
    pub found_ratio: f64,
    pub outcome: ScoreOutcome,
}

pub struct InstanceSelector {
    k: u32,
    entries: Vec<Entry>,
}

impl Default for InstanceSelector {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

impl InstanceSelector {
    /// `k` is the neighbourhood half-width in percent of found ratio.
    pub fn new(k: u32) -> Self {
        Self {
            k,
            entries: Vec::new(),
        }
    }

    /// A selector with every named preset registered over `lexicon`.
    pub fn from_presets(lexicon: Arc<dyn Lexicon>, k: u32) -> Self {
        let mut s = Self::new(k);
        for p in presets::all() {
            let pipeline = ScoringPipeline::new()
                .with_lexicon(Arc::clone(&lexicon))
                .with_strategy(p.strategy);
            s.add_pipeline(p.name, pipeline, p.config);
        }
        s
    }

    fn tolerance(&self) -> f64 {
        self.k as f64 / 100.0
    }

    /// Register (or replace) a pipeline with the configuration it scores with.
    /// Replacing keeps existing training data.
    pub fn add_pipeline(&mut self, name: &str, pipeline: ScoringPipeline, config: ScoreConfig) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.name == name) {
            e.pipeline = pipeline;
            e.config = config;
            return;
        }
        self.entries.push(Entry {
            name: name.to_string(),
            pipeline,
            config,
            samples: Vec::new(),
        });
    }

    /// Replace the training data of `name` with `(found_ratio, performance)`
    /// samples.
    pub fn add_training_data(
        &mut self,
        name: &str,
        samples: Vec<(f64, f64)>,
    ) -> Result<(), ScoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| ScoreError::UnknownPipeline(name.to_string()))?;
        entry.samples = samples;
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pipeline with the best strictly positive average performance.
    pub fn best_average(&self) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for e in &self.entries {
            if let Some(avg) = e.average() {
                if avg > best.map_or(0.0, |b| b.1) {
                    best = Some((&e.name, avg));
                }
            }
        }
        best.map(|b| b.0)
    }

    pub fn classify(&self, doc: &str, tagged: bool) -> Result<Selection, ScoreError> {
        self.classify_with(doc, tagged, &ConfigOverrides::default())
    }

    /// Score with every pipeline, each using its own configuration merged
    /// with `overrides`, and return the most promising result.
    pub fn classify_with(
        &self,
        doc: &str,
        tagged: bool,
        overrides: &ConfigOverrides,
    ) -> Result<Selection, ScoreError> {
        if self.entries.is_empty() {
            return Err(ScoreError::NoPipelines);
        }
        let mut candidates = Vec::with_capacity(self.entries.len());
        for e in &self.entries {
            // Denominator is the tagged token count.
            let prepared = e.pipeline.prepare(doc, tagged)?;
            let token_count = prepared.text.split_whitespace().count();
            let outcome = e.pipeline.scan(
                prepared.lexicon,
                doc,
                &prepared.text,
                prepared.sep,
                &e.config.merged(overrides),
            );
            let ratio = if token_count == 0 {
                0.0
            } else {
                outcome.run.tokens_found as f64 / token_count as f64
            };
            let expected = e.expected(ratio, self.tolerance());
            debug!(pipeline = %e.name, ratio, expected = ?expected, "instance candidate");
            candidates.push((e.name.as_str(), ratio, expected, outcome));
        }

        let mut chosen: Option<usize> = None;
        for (i, c) in candidates.iter().enumerate() {
            if let Some(perf) = c.2 {
                if chosen.and_then(|j| candidates[j].2).map_or(true, |best| perf > best) {
                    chosen = Some(i);
                }
            }
        }
        let idx = chosen
            .or_else(|| {
                let fallback = self.best_average()?;
                candidates.iter().position(|c| c.0 == fallback)
            })
            .unwrap_or(0);

        let (name, ratio, expected, outcome) = candidates.swap_remove(idx);
        debug!(pipeline = name, "instance selected");
        Ok(Selection {
            name: name.to_string(),
            expected_performance: expected,
            found_ratio: ratio,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{MemoryLexicon, PartOfSpeech};
    use crate::tagger::DictionaryTagger;

    fn lexicon() -> Arc<dyn Lexicon> {
        Arc::new(
            MemoryLexicon::new("test")
                .with(PartOfSpeech::Adjective, "good", 0.75, 0.0)
                .with(PartOfSpeech::Verb, "hate", 0.0, 1.0),
        )
    }

    fn selector() -> InstanceSelector {
        let mut s = InstanceSelector::new(10);
        let p = ScoringPipeline::new().with_lexicon(lexicon());
        let base = ScoreConfig {
            negation: false,
            ..Default::default()
        };
        s.add_pipeline("adjectives", p.clone(), base.clone().with_pos(true, false, false, false));
        s.add_pipeline("adj_verbs", p, base);
        s
    }

    const DOC: &str = "good/JJ people/NNS hate/VB things/NNS";

    #[test]
    fn no_pipelines_is_an_error() {
        let s = InstanceSelector::default();
        assert!(matches!(s.classify(DOC, true), Err(ScoreError::NoPipelines)));
    }

    #[test]
    fn unknown_training_target_is_rejected() {
        let mut s = selector();
        assert_eq!(
            s.add_training_data("nope", vec![(0.1, 0.5)]).unwrap_err(),
            ScoreError::UnknownPipeline("nope".into())
        );
    }

    #[test]
    fn without_data_first_pipeline_answers() {
        let sel = selector().classify(DOC, true).unwrap();
        assert_eq!(sel.name, "adjectives");
        assert_eq!(sel.expected_performance, None);
        assert_eq!(sel.outcome.scores(), (0.75, 0.0));
        assert_eq!(sel.found_ratio, 0.25);
    }

    #[test]
    fn picks_best_neighbourhood() {
        let mut s = selector();
        // found ratios on DOC: adjectives 0.25, adj_verbs 0.5
        s.add_training_data("adjectives", vec![(0.25, 0.6), (0.3, 0.7), (0.9, 1.0)])
            .unwrap();
        s.add_training_data("adj_verbs", vec![(0.45, 0.8), (0.55, 0.9)])
            .unwrap();
        let sel = s.classify(DOC, true).unwrap();
        assert_eq!(sel.name, "adj_verbs");
        assert!((sel.expected_performance.unwrap() - 0.85).abs() < 1e-12);
        assert_eq!(sel.outcome.scores(), (0.75, 1.0));
    }

    #[test]
    fn falls_back_to_best_average() {
        let mut s = selector();
        s.add_training_data("adjectives", vec![(0.9, 0.5)]).unwrap();
        s.add_training_data("adj_verbs", vec![(0.95, 0.7)]).unwrap();
        let sel = s.classify(DOC, true).unwrap();
        assert_eq!(sel.name, "adj_verbs");
        assert_eq!(sel.expected_performance, None);
        assert_eq!(s.best_average(), Some("adj_verbs"));
    }

    #[test]
    fn raw_and_tagged_forms_share_found_ratio() {
        let tagger = DictionaryTagger::default().with("good", "JJ");
        let mut s = InstanceSelector::default();
        s.add_pipeline(
            "tagging",
            ScoringPipeline::new()
                .with_lexicon(lexicon())
                .with_tagger(Arc::new(tagger)),
            ScoreConfig::default(),
        );
        let raw = s.classify("good, good, good!", false).unwrap();
        let tagged = s
            .classify("good/JJ ,/, good/JJ ,/, good/JJ !/.", true)
            .unwrap();
        assert_eq!(raw.found_ratio, 0.5);
        assert_eq!(raw.found_ratio, tagged.found_ratio);
        assert_eq!(raw.outcome.scores(), tagged.outcome.scores());
    }

    #[test]
    fn overrides_reach_every_pipeline() {
        let s = selector();
        let o = ConfigOverrides {
            a_adjust: Some(0.0),
            ..Default::default()
        };
        let sel = s.classify_with(DOC, true, &o).unwrap();
        assert_eq!(sel.outcome.scores(), (0.0, 0.0));
    }

    #[test]
    fn presets_register_by_name() {
        let s = InstanceSelector::from_presets(lexicon(), DEFAULT_K);
        assert_eq!(s.len(), presets::PRESET_NAMES.len());
        assert!(s.names().any(|n| n == "av_light_taboada"));
    }
}
