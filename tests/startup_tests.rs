//! Carga de los datos iniciales del repositorio sobre la sesión en memoria.

use std::fs;
use std::path::PathBuf;

use glossary_api::config::FixturesConfig;
use glossary_api::startup::load_fixtures_into;
use glossary_core::{FixtureLoadStatus, InMemorySession};
use glossary_persistence::namespace;
use tempfile::TempDir;

fn seed_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

#[test]
fn bundled_fixtures_load_cleanly_and_reload_as_updates() {
    let cfg = FixturesConfig { dir: seed_dir(),
                               ignore_errors: false };
    let mut session = InMemorySession::new();

    let first = load_fixtures_into(&mut session, namespace(), &cfg);
    assert!(first.all_successful(), "{:?}", first.failed_fixtures());
    assert_eq!(first.stats.created, 5);
    assert_eq!(first.stats.updated, 0);

    let second = load_fixtures_into(&mut session, namespace(), &cfg);
    assert_eq!(second.stats.created, 0);
    assert_eq!(second.stats.updated, 5);
    assert_eq!(session.count("glossary_terms"), 5);
}

#[test]
fn summary_json_has_stats_and_per_fixture_reports() {
    let cfg = FixturesConfig { dir: seed_dir(),
                               ignore_errors: false };
    let summary = load_fixtures_into(InMemorySession::new(), namespace(), &cfg);
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["stats"]["total_fixtures"], 1);
    let report = &json["fixtures"]["01_glossary_terms.json"];
    assert_eq!(report["status"], "success");
    assert_eq!(report["stats"]["created"], 5);
    assert_eq!(report["errors"], serde_json::json!([]));
}

#[test]
fn bad_fixture_does_not_prevent_the_rest_when_ignoring_errors() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("01_bad.json"), r#"{"model": "Nope", "data": [{"a": 1}]}"#).unwrap();
    fs::write(dir.path().join("02_terms.json"),
              r#"{"model": "GlossaryTerm", "unique_fields": ["term"], "data": [{"term": "ORM", "definition": "Object-relational mapper"}]}"#).unwrap();

    let strict = load_fixtures_into(InMemorySession::new(),
                                    namespace(),
                                    &FixturesConfig { dir: dir.path().to_path_buf(),
                                                      ignore_errors: false });
    assert_eq!(strict.stats.total_fixtures, 1);
    assert_eq!(strict.fixtures["01_bad.json"].status, FixtureLoadStatus::Failed);

    let lenient = load_fixtures_into(InMemorySession::new(),
                                     namespace(),
                                     &FixturesConfig { dir: dir.path().to_path_buf(),
                                                       ignore_errors: true });
    assert_eq!(lenient.stats.total_fixtures, 2);
    assert_eq!(lenient.stats.created, 1);
}

#[test]
fn missing_fixtures_directory_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let summary = load_fixtures_into(InMemorySession::new(),
                                     namespace(),
                                     &FixturesConfig { dir: dir.path().join("absent"),
                                                       ignore_errors: false });
    assert_eq!(summary.stats.total_fixtures, 0);
    assert!(summary.all_successful());
}
