//! Named, pre-tuned scoring setups.
//!
//! Every preset scans with negation (window 5), skips stop words and scales
//! by term frequency; they differ in categories, counting mode and strategy.

use super::{ScoreConfig, ScoreMode};
use crate::scoring::Strategy;

#[derive(Debug, Clone)]
pub struct Preset {
    pub name: &'static str,
    pub config: ScoreConfig,
    pub strategy: Strategy,
}

pub const PRESET_NAMES: [&str; 10] = [
    "av_all_words",
    "a_all_words",
    "a_once_words",
    "av_once_words",
    "av_light_potts",
    "av_aggressive_potts",
    "avo_light_potts",
    "avo_aggressive_potts",
    "av_light_taboada",
    "av_aggressive_taboada",
];

fn base(adjectives_only: bool, mode: ScoreMode) -> ScoreConfig {
    ScoreConfig {
        a: true,
        v: !adjectives_only,
        n: false,
        r: false,
        negation: true,
        negation_window: 5,
        score_mode: mode,
        score_stop: true,
        score_freq: true,
        ..Default::default()
    }
}

/// Look up a preset by name.
pub fn preset(name: &str) -> Option<Preset> {
    let (config, strategy) = match name {
        "av_all_words" => (base(false, ScoreMode::All), Strategy::Identity),
        "a_all_words" => (base(true, ScoreMode::All), Strategy::Identity),
        "a_once_words" => (base(true, ScoreMode::Once), Strategy::Identity),
        "av_once_words" => (base(false, ScoreMode::Once), Strategy::Identity),
        "av_light_potts" => (
            base(false, ScoreMode::All),
            Strategy::Potts {
                negation_adjustment: 0.1,
            },
        ),
        "av_aggressive_potts" => (
            base(false, ScoreMode::All),
            Strategy::Potts {
                negation_adjustment: 0.5,
            },
        ),
        "avo_light_potts" => (
            base(false, ScoreMode::Once),
            Strategy::Potts {
                negation_adjustment: 0.1,
            },
        ),
        "avo_aggressive_potts" => (
            base(false, ScoreMode::Once),
            Strategy::Potts {
                negation_adjustment: 0.5,
            },
        ),
        "av_light_taboada" => (
            base(false, ScoreMode::All),
            Strategy::Taboada {
                negation_shift: 0.25,
            },
        ),
        "av_aggressive_taboada" => (
            base(false, ScoreMode::All),
            Strategy::Taboada {
                negation_shift: 0.5,
            },
        ),
        _ => return None,
    };
    let name = PRESET_NAMES.iter().copied().find(|n| *n == name)?;
    Some(Preset {
        name,
        config,
        strategy,
    })
}

/// All presets in a stable order.
pub fn all() -> Vec<Preset> {
    PRESET_NAMES.iter().filter_map(|n| preset(n)).collect()
}
