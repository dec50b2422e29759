//! Per-token weighting: position functions, frequency scaling and repeated
//! occurrence backoff.

use serde::{Deserialize, Serialize};

/// Probability used for terms missing from the frequency table.
pub const MIN_FREQUENCY: f64 = 0.0005;

/// Floor of the square-root frequency penalty used by the Taboada strategy.
pub const TABOADA_FREQ_FLOOR: f64 = 0.25;

/// Custom position weighting: `(value, position, total) -> value`.
pub type WeightFn = fn(f64, usize, usize) -> f64;

/// Position weighting applied to every contribution. Positions are 1-indexed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightFunction {
    /// Value unchanged.
    #[default]
    Noop,
    /// `value * position / total`: later tokens weigh more.
    Linear,
    /// Full value in the second half of the document, half before it.
    Modular,
    #[serde(skip)]
    Custom(WeightFn),
}

impl WeightFunction {
    pub fn apply(&self, value: f64, position: usize, total: usize) -> f64 {
        match self {
            Self::Noop => value,
            Self::Linear => {
                if total == 0 {
                    value
                } else {
                    value * position as f64 / total as f64
                }
            }
            Self::Modular => {
                if position as f64 >= total as f64 / 2.0 {
                    value
                } else {
                    value / 2.0
                }
            }
            Self::Custom(f) => f(value, position, total),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Linear => "linear",
            Self::Modular => "modular",
            Self::Custom(_) => "custom",
        }
    }
}

/// Self-information scaling: `value * ((1 - w) + w * -log2(p))`.
/// Rare terms (small `p`) are boosted; `p == 0` is treated as [`MIN_FREQUENCY`].
pub fn freq_adjust(value: f64, p: f64, weight: f64) -> f64 {
    let p = if p <= 0.0 { MIN_FREQUENCY } else { p };
    value * ((1.0 - weight) + weight * -p.log2())
}

/// Taboada-style penalty: `value * (1 - max(sqrt(p), 0.25))`.
pub fn taboada_freq_adjust(value: f64, p: f64) -> f64 {
    value * (1.0 - p.max(0.0).sqrt().max(TABOADA_FREQ_FLOOR))
}

/// Decay for the n-th occurrence: `value / 2^(alpha * (n - 1))`, `0` when `n == 0`.
pub fn repeated_backoff(value: f64, n: usize, alpha: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    value / 2f64.powf(alpha * (n as f64 - 1.0))
}
