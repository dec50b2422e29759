//! lexsent service binary.
//! Loads the lexicon, stop words and scoring config, then serves the Axum
//! router (classification, sentence aggregation, negation masks, metrics).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lexsent::api::{self, AppState};
use lexsent::config::{self, HotReloadConfig, ENV_CONFIG_PATH};
use lexsent::lexicon::MemoryLexicon;
use lexsent::metrics::Metrics;
use lexsent::stopwords::StopwordList;
use lexsent::tagger::DictionaryTagger;
use lexsent::ScoringPipeline;

const ENV_LEXICON_PATH: &str = "LEXSENT_LEXICON_PATH";
const ENV_STOPWORDS_PATH: &str = "LEXSENT_STOPWORDS_PATH";
const DEFAULT_LEXICON_PATH: &str = "data/demo_lexicon.json";

/// Compact tracing logs; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexsent=info,warn"));

    // The runtime may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

fn build_state() -> anyhow::Result<AppState> {
    let lexicon_path = std::env::var(ENV_LEXICON_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LEXICON_PATH));
    let lexicon = MemoryLexicon::load(&lexicon_path)
        .with_context(|| format!("loading lexicon (set {ENV_LEXICON_PATH})"))?;
    info!(
        path = %lexicon_path.display(),
        terms = lexicon.len(),
        partitions = ?lexicon.info(),
        "lexicon ready"
    );

    let stopwords = match std::env::var(ENV_STOPWORDS_PATH) {
        Ok(p) => StopwordList::load(&PathBuf::from(p))?,
        Err(_) => StopwordList::builtin(),
    };

    let mut tagger = DictionaryTagger::default();
    tagger.extend_from_lexicon(&lexicon);

    let initial = config::load_default().unwrap_or_else(|e| {
        warn!(error = %e, "scoring config unreadable, using defaults");
        Default::default()
    });
    let config_path = std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from);
    let hot = HotReloadConfig::new(config_path.as_deref(), initial);

    let pipeline = ScoringPipeline::new()
        .with_lexicon(Arc::new(lexicon))
        .with_stopwords(Arc::new(stopwords))
        .with_tagger(Arc::new(tagger));

    let state = AppState::new(pipeline, hot);
    Ok(match Metrics::init() {
        Ok(m) => state.with_metrics(m.handle),
        Err(e) => {
            warn!(error = %e, "metrics disabled");
            state
        }
    })
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let state = build_state()?;
    let router = api::router(state);

    Ok(router.into())
}
