// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /classify (tagged, raw, presets, options, errors)
// - POST /classify/sentences
// - POST /negation

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use lexsent::api::{self, AppState};
use lexsent::config::HotReloadConfig;
use lexsent::tagger::DictionaryTagger;
use lexsent::{MemoryLexicon, PartOfSpeech, ScoreConfig, ScoringPipeline};

const BODY_LIMIT: usize = 1024 * 1024;

fn lexicon() -> MemoryLexicon {
    MemoryLexicon::new("api")
        .with(PartOfSpeech::Adjective, "good", 0.75, 0.0)
        .with(PartOfSpeech::Adjective, "bad", 0.0, 0.5)
        .with(PartOfSpeech::Verb, "hate", 0.0, 1.0)
}

fn test_router() -> Router {
    let lex = lexicon();
    let mut tagger = DictionaryTagger::default();
    tagger.extend_from_lexicon(&lex);
    let pipeline = ScoringPipeline::new()
        .with_lexicon(Arc::new(lex))
        .with_tagger(Arc::new(tagger));
    api::router(AppState::new(
        pipeline,
        HotReloadConfig::fixed(ScoreConfig::default()),
    ))
}

async fn post(app: Router, uri: &str, payload: Json) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse json");
    (status, v)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = test_router().oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "OK");
}

#[tokio::test]
async fn classify_tagged_document() {
    let (status, v) = post(
        test_router(),
        "/classify",
        json!({ "text": "not/RB bad/JJ ./. good/JJ", "tagged": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["positive"], 1.25);
    assert_eq!(v["negative"], 0.0);
    assert_eq!(v["verdict"], "positive");
    assert_eq!(v["strategy"], "identity");
    assert_eq!(v["run"]["tokens_found"], 2);
    assert_eq!(v["run"]["found_negated"], 1);
    assert!(v["annotated"]
        .as_str()
        .unwrap()
        .contains("bad/JJ##NEGAT:1"));
}

#[tokio::test]
async fn classify_raw_text_uses_tagger() {
    let (status, v) = post(
        test_router(),
        "/classify",
        json!({ "text": "People hate bad weather." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["verdict"], "negative");
    assert_eq!(v["negative"], 1.5);
}

#[tokio::test]
async fn classify_with_options_and_strategy() {
    let (_, v) = post(
        test_router(),
        "/classify",
        json!({
            "text": "good/JJ hate/VB",
            "tagged": true,
            "options": { "a_adjust": 0.0 }
        }),
    )
    .await;
    assert_eq!(v["positive"], 0.0);
    assert_eq!(v["negative"], 1.0);

    let (_, v) = post(
        test_router(),
        "/classify",
        json!({
            "text": "good/JJ good/JJ",
            "tagged": true,
            "strategy": { "kind": "taboada" }
        }),
    )
    .await;
    assert_eq!(v["strategy"], "taboada");
    assert_eq!(v["positive"], 0.75 / 2.0 + 0.75 / 3.0);
}

#[tokio::test]
async fn classify_with_named_preset() {
    let (status, v) = post(
        test_router(),
        "/classify",
        json!({ "text": "good/JJ hate/VB", "tagged": true, "preset": "a_once_words" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["negative"], 0.0);
    assert_eq!(v["run"]["tokens_found"], 1);

    let (status, v) = post(
        test_router(),
        "/classify",
        json!({ "text": "good/JJ", "tagged": true, "preset": "nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn classify_errors_map_to_status_codes() {
    // tagged flag but no separator
    let (status, v) = post(
        test_router(),
        "/classify",
        json!({ "text": "plain words only", "tagged": true }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(v["error"].as_str().unwrap().contains("separator"));

    // raw text without a tagger is a server-side configuration problem
    let app = api::router(AppState::new(
        ScoringPipeline::new().with_lexicon(Arc::new(lexicon())),
        HotReloadConfig::fixed(ScoreConfig::default()),
    ));
    let (status, _) = post(app, "/classify", json!({ "text": "good" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn sentences_vote_per_sentence() {
    let (status, v) = post(
        test_router(),
        "/classify/sentences",
        json!({
            "text": "good/JJ ./. bad/JJ ./. bad/JJ hate/VB ./.",
            "tagged": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["positive"], 1.0);
    assert_eq!(v["negative"], 2.0);
    assert_eq!(v["strategy"], "potts");
    assert_eq!(v["verdict"], "negative");
}

#[tokio::test]
async fn negation_mask_endpoint() {
    let (status, v) = post(
        test_router(),
        "/negation",
        json!({ "text": "this is not good , sadly", "window": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["mask"], json!([0, 0, 1, 1, 1, 0]));
    assert_eq!(v["negated"], 3);
    assert_eq!(v["tokens"].as_array().unwrap().len(), 6);
}
