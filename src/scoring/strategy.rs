//! Score adjustment strategies.
//!
//! A strategy hooks the pipeline at two points: the per-token contribution
//! (Taboada replaces it) and the document-level totals (Potts adjusts them).

use serde::{Deserialize, Serialize};

use crate::config::ScoreConfig;
use crate::lexicon::Polarity;
use crate::negation::count_onsets;
use crate::scoring::weighting::taboada_freq_adjust;

pub const DEFAULT_POTTS_ADJUSTMENT: f64 = 0.1;
pub const DEFAULT_TABOADA_SHIFT: f64 = 0.25;

fn default_potts() -> f64 {
    DEFAULT_POTTS_ADJUSTMENT
}

fn default_taboada() -> f64 {
    DEFAULT_TABOADA_SHIFT
}

/// JSON shape: `{"kind": "potts", "negation_adjustment": 0.5}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Strategy {
    /// Plain accumulation.
    #[default]
    Identity,
    /// Negated spans are evidence of negative sentiment: every span onset adds
    /// `negation_adjustment` to the negative total.
    Potts {
        #[serde(default = "default_potts")]
        negation_adjustment: f64,
    },
    /// Repeated terms are divided down and negated terms are shifted toward
    /// zero rather than flipped.
    Taboada {
        #[serde(default = "default_taboada")]
        negation_shift: f64,
    },
}

impl Strategy {
    pub fn potts() -> Self {
        Self::Potts {
            negation_adjustment: DEFAULT_POTTS_ADJUSTMENT,
        }
    }

    pub fn taboada() -> Self {
        Self::Taboada {
            negation_shift: DEFAULT_TABOADA_SHIFT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Potts { .. } => "potts",
            Self::Taboada { .. } => "taboada",
        }
    }

    /// Final document-level adjustment of the accumulated totals.
    pub fn adjust_totals(&self, totals: Polarity, mask: &[u8], cfg: &ScoreConfig) -> Polarity {
        match *self {
            Self::Potts {
                negation_adjustment,
            } if cfg.negation => {
                let onsets = if mask.len() >= 3 { count_onsets(mask) } else { 0 };
                Polarity::new(
                    totals.positive,
                    totals.negative + negation_adjustment * onsets as f64,
                )
            }
            _ => totals,
        }
    }
}

/// Taboada contribution for one occurrence, before position weighting.
///
/// `count` is the occurrence counter after this occurrence was recorded.
/// Inside a negated span the dominant value loses `shift`; positive is
/// checked first, then negative against the updated positive.
pub(crate) fn taboada_shifted(
    raw: Polarity,
    count: usize,
    negated: bool,
    shift: f64,
    cfg: &ScoreConfig,
) -> Polarity {
    let divisor = count as f64 + 1.0;
    let mut pos = raw.positive / divisor;
    let mut neg = raw.negative / divisor;
    if cfg.negation {
        let m = if negated { 1.0 } else { 0.0 };
        if pos > neg {
            pos -= m * shift;
        }
        if neg > pos {
            neg -= m * shift;
        }
    }
    Polarity::new(pos, neg)
}

/// Taboada frequency penalty applied to both components.
pub(crate) fn taboada_frequency(v: Polarity, p: f64) -> Polarity {
    Polarity::new(
        taboada_freq_adjust(v.positive, p),
        taboada_freq_adjust(v.negative, p),
    )
}
