// tests/errors.rs
//
// Precondition failures and local recovery from malformed input.

use std::sync::Arc;

use lexsent::{MemoryLexicon, PartOfSpeech, ScoreConfig, ScoreError, ScoringPipeline, SentenceAggregator};

fn loaded() -> Arc<MemoryLexicon> {
    Arc::new(MemoryLexicon::new("e").with(PartOfSpeech::Adjective, "good", 0.75, 0.0))
}

#[test]
fn preconditions_are_configuration_errors() {
    let cfg = ScoreConfig::default();

    let err = ScoringPipeline::new().classify("good/JJ", true, &cfg).unwrap_err();
    assert_eq!(err, ScoreError::LexiconMissing);
    assert!(err.is_configuration());

    let err = ScoringPipeline::new()
        .with_lexicon(Arc::new(MemoryLexicon::new("empty")))
        .classify("good/JJ", true, &cfg)
        .unwrap_err();
    assert_eq!(err, ScoreError::LexiconNotLoaded("empty".into()));

    let err = ScoringPipeline::new()
        .with_lexicon(loaded())
        .classify("good", false, &cfg)
        .unwrap_err();
    assert_eq!(err, ScoreError::TaggerMissing);
}

#[test]
fn separator_error_carries_an_excerpt() {
    let doc = "word ".repeat(60);
    let err = ScoringPipeline::new()
        .with_lexicon(loaded())
        .classify(&doc, true, &ScoreConfig::default())
        .unwrap_err();
    assert!(!err.is_configuration());
    match err {
        ScoreError::TagSeparator { excerpt } => assert_eq!(excerpt.chars().count(), 100),
        other => panic!("unexpected {other:?}"),
    }

    // the aggregator checks the same preconditions
    let agg = SentenceAggregator::new(ScoringPipeline::new().with_lexicon(loaded()));
    assert!(matches!(
        agg.classify(&doc, true, &ScoreConfig::default()),
        Err(ScoreError::TagSeparator { .. })
    ));
}

#[test]
fn corrupt_tokens_are_skipped_but_keep_positions() {
    let out = ScoringPipeline::new()
        .with_lexicon(loaded())
        .classify("a/DT /JJ good/ good/JJ", true, &ScoreConfig::default())
        .unwrap();
    assert_eq!(out.scores(), (0.75, 0.0));
    assert_eq!(out.run.tokens_found, 1);
}

#[test]
fn empty_document_is_neutral() {
    let out = ScoringPipeline::new()
        .with_lexicon(loaded())
        .classify("", true, &ScoreConfig::default())
        .unwrap();
    assert_eq!(out.scores(), (0.0, 0.0));
    assert!(out.run.trace.is_empty());
}
