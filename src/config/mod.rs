//! Scoring configuration.
//!
//! `ScoreConfig` is an immutable value: build it once per call from defaults
//! (or a preset) plus [`ConfigOverrides`], then pass it by reference through the
//! scan. Files are TOML or JSON with the same field names; missing fields keep
//! their defaults.
//!
//! ```toml
//! a = true
//! v = true
//! negation_window = 4
//! score_mode = "backoff"
//! backoff_alpha = 1.0
//! score_function = "linear"
//! ```

pub mod hot;
pub mod presets;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::lexicon::PartOfSpeech;
use crate::scoring::weighting::WeightFunction;

pub use hot::HotReloadConfig;

pub const ENV_CONFIG_PATH: &str = "LEXSENT_CONFIG_PATH";
pub const DEFAULT_CONFIG_TOML: &str = "config/scoring.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/scoring.json";

/// How repeated occurrences of the same tagged token are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// Every occurrence contributes.
    #[default]
    All,
    /// Only the first occurrence contributes.
    Once,
    /// Every occurrence contributes, decayed by `backoff_alpha`.
    Backoff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Scan adjectives.
    pub a: bool,
    /// Scan verbs.
    pub v: bool,
    /// Scan nouns.
    pub n: bool,
    /// Scan adverbs.
    pub r: bool,
    pub negation: bool,
    pub negation_window: usize,
    pub score_mode: ScoreMode,
    pub score_freq: bool,
    pub score_stop: bool,
    pub score_function: WeightFunction,
    pub a_adjust: f64,
    pub v_adjust: f64,
    /// Scale by `at_pos`/`at_neg` inside negated spans instead of flipping.
    pub atenuation: bool,
    pub at_pos: f64,
    pub at_neg: f64,
    pub backoff_alpha: f64,
    pub freq_weight: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            a: true,
            v: true,
            n: false,
            r: false,
            negation: true,
            negation_window: 5,
            score_mode: ScoreMode::All,
            score_freq: false,
            score_stop: false,
            score_function: WeightFunction::Noop,
            a_adjust: 1.0,
            v_adjust: 1.0,
            atenuation: false,
            at_pos: 1.0,
            at_neg: 1.0,
            backoff_alpha: 0.0,
            freq_weight: 1.0,
        }
    }
}

impl ScoreConfig {
    /// Whether tokens of this category are scanned.
    pub fn scans(&self, pos: PartOfSpeech) -> bool {
        match pos {
            PartOfSpeech::Adjective => self.a,
            PartOfSpeech::Verb => self.v,
            PartOfSpeech::Adverb => self.r,
            PartOfSpeech::Noun => self.n,
        }
    }

    /// Multiplier applied to raw lexicon values of this category.
    pub fn adjust_for(&self, pos: PartOfSpeech) -> f64 {
        match pos {
            PartOfSpeech::Adjective => self.a_adjust,
            PartOfSpeech::Verb => self.v_adjust,
            PartOfSpeech::Adverb | PartOfSpeech::Noun => 1.0,
        }
    }

    /// Enable exactly the given categories.
    pub fn with_pos(mut self, a: bool, v: bool, n: bool, r: bool) -> Self {
        self.a = a;
        self.v = v;
        self.n = n;
        self.r = r;
        self
    }

    /// A copy with every set override applied.
    ///
    /// Setting `negation_window` or `atenuation` without an explicit
    /// `negation` switches negation on.
    pub fn merged(&self, o: &ConfigOverrides) -> Self {
        let mut c = self.clone();
        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = o.$field { c.$field = v; })*
            };
        }
        apply!(
            a,
            v,
            n,
            r,
            negation,
            negation_window,
            score_mode,
            score_freq,
            score_stop,
            score_function,
            a_adjust,
            v_adjust,
            atenuation,
            at_pos,
            at_neg,
            backoff_alpha,
            freq_weight,
        );
        if o.negation.is_none() && (o.negation_window.is_some() || o.atenuation.is_some()) {
            c.negation = true;
        }
        c
    }
}

/// Partial configuration; `None` keeps the base value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub a: Option<bool>,
    pub v: Option<bool>,
    pub n: Option<bool>,
    pub r: Option<bool>,
    pub negation: Option<bool>,
    pub negation_window: Option<usize>,
    pub score_mode: Option<ScoreMode>,
    pub score_freq: Option<bool>,
    pub score_stop: Option<bool>,
    pub score_function: Option<WeightFunction>,
    pub a_adjust: Option<f64>,
    pub v_adjust: Option<f64>,
    pub atenuation: Option<bool>,
    pub at_pos: Option<f64>,
    pub at_neg: Option<f64>,
    pub backoff_alpha: Option<f64>,
    pub freq_weight: Option<f64>,
}

/// Load a configuration file. TOML or JSON, chosen by extension; unknown
/// extensions try TOML then JSON.
pub fn load_from(path: &Path) -> Result<ScoreConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading scoring config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing scoring config {}", path.display()))
}

/// Load configuration using env var + fallbacks:
/// 1) $LEXSENT_CONFIG_PATH
/// 2) config/scoring.toml
/// 3) config/scoring.json
/// 4) built-in defaults
pub fn load_default() -> Result<ScoreConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        } else {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
    }
    for candidate in [DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_JSON] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return load_from(&p);
        }
    }
    warn!("no scoring config found, using defaults");
    Ok(ScoreConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<ScoreConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => toml::from_str(s)
            .map_err(anyhow::Error::from)
            .or_else(|_| serde_json::from_str(s).map_err(anyhow::Error::from))
            .map_err(|_| anyhow!("unsupported scoring config format")),
    }
}
