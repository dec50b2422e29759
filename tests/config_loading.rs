// tests/config_loading.rs
//
// Shipped configuration and data files, file loaders and hot reload.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use lexsent::config::{self, presets, HotReloadConfig, ENV_CONFIG_PATH};
use lexsent::lexicon::{CompositeLexicon, MemoryLexicon};
use lexsent::stopwords::{StopWords, StopwordList};
use lexsent::{Lexicon, PartOfSpeech, ScoreMode, ScoringPipeline};

#[test]
fn shipped_scoring_toml_parses() {
    let cfg = config::load_from(Path::new("config/scoring.toml")).expect("config/scoring.toml");
    assert!(cfg.a && cfg.v);
    assert!(cfg.negation);
    assert_eq!(cfg.negation_window, 5);
    assert_eq!(cfg.score_mode, ScoreMode::All);
    assert!(cfg.score_stop);
}

#[test]
fn shipped_demo_lexicon_scores() {
    let lex = MemoryLexicon::load(Path::new("data/demo_lexicon.json")).expect("demo lexicon");
    assert!(lex.is_loaded());
    assert_eq!(lex.name(), "demo");
    // two positive senses averaged
    assert_eq!(lex.score(PartOfSpeech::Adjective, "good").positive, 0.6875);
    assert!(lex.frequency("good") > 0.0);

    let cfg = config::load_from(Path::new("config/scoring.toml")).unwrap();
    let out = ScoringPipeline::new()
        .with_lexicon(Arc::new(lex))
        .classify("i/PRP love/VBP it/PRP but/CC hate/VBZ the/DT pain/NN", true, &cfg)
        .unwrap();
    assert_eq!(out.scores(), (0.625, 0.75));
}

#[test]
fn csv_lexicon_and_composite_fallback() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("domain.csv");
    fs::write(&path, "# term,POS,pos,neg\nbullish,A,0.75,0\ngood,A,0,0.25\n").unwrap();
    let domain = MemoryLexicon::load(&path).unwrap();
    assert_eq!(domain.name(), "domain");

    let general = MemoryLexicon::new("general")
        .with(PartOfSpeech::Adjective, "good", 0.75, 0.0)
        .with(PartOfSpeech::Adjective, "bearish", 0.0, 0.5);

    let mut composite = CompositeLexicon::new();
    composite.add_lexicon(Arc::new(domain));
    composite.add_lexicon(Arc::new(general));
    assert!(composite.is_loaded());
    // the first lexicon holding the term answers
    assert_eq!(composite.score(PartOfSpeech::Adjective, "good").negative, 0.25);
    assert!(composite.has_term(PartOfSpeech::Adjective, "bearish"));
}

#[test]
fn stopword_file_replaces_builtin_list() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("stop.txt");
    fs::write(&path, "Market\n\nthe\n").unwrap();
    let list = StopwordList::load(&path).unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.is_stop("market"));
    assert!(!list.is_stop("of"));
    assert!(StopwordList::builtin().is_stop("of"));

    assert!(StopwordList::load(&tmp.path().join("missing.txt")).is_err());
}

#[test]
fn json_config_with_unknown_extension() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("scoring.conf");
    fs::write(&path, r#"{"score_mode": "once", "n": true}"#).unwrap();
    let cfg = config::load_from(&path).unwrap();
    assert_eq!(cfg.score_mode, ScoreMode::Once);
    assert!(cfg.n);

    fs::write(&path, "score_mode = [").unwrap();
    let err = config::load_from(&path).unwrap_err();
    assert!(format!("{err:#}").contains("scoring.conf"));
}

#[serial_test::serial]
#[test]
fn env_path_wins_and_must_exist() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("custom.toml");
    fs::write(&path, "negation_window = 2\n").unwrap();

    std::env::set_var(ENV_CONFIG_PATH, &path);
    assert_eq!(config::load_default().unwrap().negation_window, 2);

    std::env::set_var(ENV_CONFIG_PATH, tmp.path().join("nope.toml"));
    assert!(config::load_default().is_err());

    std::env::remove_var(ENV_CONFIG_PATH);
}

#[test]
fn hot_reload_serves_preset_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("scoring.json");
    let preset = presets::preset("av_light_taboada").unwrap();
    fs::write(&path, serde_json::to_string(&preset.config).unwrap()).unwrap();

    let hot = HotReloadConfig::new(Some(path.as_path()), Default::default());
    let cfg = hot.current();
    assert!(cfg.score_freq && cfg.score_stop);
    assert_eq!(hot.path(), Some(path.as_path()));
}
