//! HTTP surface: classification, sentence aggregation and negation masks.
//!
//! Request bodies are JSON. `text` is raw unless `tagged` is set, in which
//! case it must already be `word/TAG` (or `word_TAG`) tokens.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::{presets, ConfigOverrides, HotReloadConfig, ScoreConfig};
use crate::error::ScoreError;
use crate::metrics::{self, Metrics};
use crate::negation::{NegationMask, NegationScanner};
use crate::result::RunResult;
use crate::scoring::{ScoreOutcome, ScoringPipeline, Strategy};
use crate::sentence::{SentenceAggregator, DEFAULT_MIN_QUESTION_SIZE};
use crate::vote::Verdict;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ScoringPipeline>,
    pub config: Arc<HotReloadConfig>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(pipeline: ScoringPipeline, config: HotReloadConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// Expose `/metrics` from this handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn router(state: AppState) -> Router {
    let metrics_handle = state.metrics.clone();
    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/classify", post(classify))
        .route("/classify/sentences", post(classify_sentences))
        .route("/negation", post(negation))
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    match metrics_handle {
        Some(handle) => app.merge(Metrics { handle }.router()),
        None => app,
    }
}

#[derive(Debug, Deserialize)]
pub struct ClassifyReq {
    pub text: String,
    #[serde(default)]
    pub tagged: bool,
    /// Named preset supplying base config and strategy.
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub strategy: Option<Strategy>,
    #[serde(default)]
    pub options: ConfigOverrides,
    /// Sentence mode only.
    #[serde(default)]
    pub question_neg_weight: Option<f64>,
    /// Sentence mode only.
    #[serde(default)]
    pub min_question_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResp {
    pub positive: f64,
    pub negative: f64,
    pub verdict: Verdict,
    pub strategy: &'static str,
    pub annotated: String,
    pub run: RunResult,
}

#[derive(Debug, Serialize)]
pub struct ErrorResp {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResp>);

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(ErrorResp { error: msg.into() }))
}

fn score_error(e: ScoreError) -> ApiError {
    metrics::record_error();
    let status = if e.is_configuration() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    warn!(target: "lexsent::api", error = %e, "classification rejected");
    api_error(status, e.to_string())
}

/// Short anonymised document id for logs (first 6 bytes of SHA-256, hex).
pub(crate) fn anon_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Base config and strategy: preset if named, else the given fallbacks;
/// an explicit strategy wins over both. Options are merged last.
fn resolve(
    req: &ClassifyReq,
    base: ScoreConfig,
    default_strategy: Strategy,
) -> Result<(ScoreConfig, Strategy), ApiError> {
    let (base, preset_strategy) = match &req.preset {
        Some(name) => {
            let p = presets::preset(name).ok_or_else(|| {
                metrics::record_error();
                api_error(StatusCode::BAD_REQUEST, format!("unknown preset '{name}'"))
            })?;
            (p.config, p.strategy)
        }
        None => (base, default_strategy),
    };
    let strategy = req.strategy.unwrap_or(preset_strategy);
    Ok((base.merged(&req.options), strategy))
}

fn respond(
    req: &ClassifyReq,
    strategy: Strategy,
    outcome: ScoreOutcome,
    started: Instant,
    mode: &'static str,
) -> Json<ClassifyResp> {
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    metrics::record_classification(
        strategy.name(),
        outcome.run.tokens_found,
        outcome.run.tokens_negated,
        elapsed_ms,
    );
    let verdict = outcome.verdict();
    // Never log raw text.
    info!(
        target: "lexsent::api",
        id = %anon_hash(&req.text),
        mode,
        strategy = strategy.name(),
        positive = outcome.positive,
        negative = outcome.negative,
        verdict = ?verdict,
        found = outcome.run.tokens_found
    );
    Json(ClassifyResp {
        positive: outcome.positive,
        negative: outcome.negative,
        verdict,
        strategy: strategy.name(),
        annotated: outcome.run.annotated_doc(),
        run: outcome.run,
    })
}

async fn classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifyReq>,
) -> Result<Json<ClassifyResp>, ApiError> {
    let started = Instant::now();
    let (cfg, strategy) = resolve(&req, state.config.current(), state.pipeline.strategy())?;
    let pipeline = state.pipeline.as_ref().clone().with_strategy(strategy);
    let outcome = pipeline
        .classify(&req.text, req.tagged, &cfg)
        .map_err(score_error)?;
    Ok(respond(&req, strategy, outcome, started, "document"))
}

async fn classify_sentences(
    State(state): State<AppState>,
    Json(req): Json<ClassifyReq>,
) -> Result<Json<ClassifyResp>, ApiError> {
    let started = Instant::now();
    let (cfg, strategy) = resolve(
        &req,
        SentenceAggregator::default_config(),
        Strategy::Potts {
            negation_adjustment: 0.5,
        },
    )?;
    let aggregator =
        SentenceAggregator::new(state.pipeline.as_ref().clone().with_strategy(strategy))
            .with_question_rule(
                req.question_neg_weight.unwrap_or(0.0),
                req.min_question_size.unwrap_or(DEFAULT_MIN_QUESTION_SIZE),
            );
    let outcome = aggregator
        .classify(&req.text, req.tagged, &cfg)
        .map_err(score_error)?;
    Ok(respond(&req, strategy, outcome, started, "sentences"))
}

#[derive(Debug, Deserialize)]
pub struct NegationReq {
    pub text: String,
    #[serde(default)]
    pub window: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NegationResp {
    pub tokens: Vec<String>,
    pub mask: NegationMask,
    pub negated: usize,
}

/// Mask over whitespace tokens; tagged and plain text both work.
async fn negation(
    State(state): State<AppState>,
    Json(req): Json<NegationReq>,
) -> Json<NegationResp> {
    let window = req
        .window
        .unwrap_or_else(|| state.config.current().negation_window);
    let tokens: Vec<String> = req.text.split_whitespace().map(str::to_string).collect();
    let mask = NegationScanner::detect(&tokens, window);
    let negated = mask.iter().map(|&m| m as usize).sum();
    Json(NegationResp {
        tokens,
        mask,
        negated,
    })
}
