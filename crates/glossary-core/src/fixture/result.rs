//! Resultados por archivo (`FixtureResult`) y agregado de una corrida
//! (`LoadSummary`).
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::FixtureLoadStatus;
use crate::errors::{FixtureError, SessionError};

/// Contadores de filas de un archivo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Resultado de cargar un archivo de fixtures.
///
/// Invariante: si `errors` no está vacío, `status` es `Partial` o `Failed`.
/// Los métodos `mark_failed` y `finish_commit` son los únicos que fijan el
/// estado final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureResult {
    pub fixture_name: String,
    pub status: FixtureLoadStatus,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl FixtureResult {
    pub fn new(fixture_name: impl Into<String>) -> Self {
        Self { fixture_name: fixture_name.into(),
               status: FixtureLoadStatus::Success,
               created: 0,
               updated: 0,
               failed: 0,
               errors: Vec::new() }
    }

    /// Resultado para un archivo que no se intentó cargar.
    pub fn skipped(fixture_name: impl Into<String>) -> Self {
        Self { status: FixtureLoadStatus::Skipped,
               ..Self::new(fixture_name) }
    }

    pub fn is_successful(&self) -> bool {
        self.status == FixtureLoadStatus::Success
    }

    pub fn stats(&self) -> LoadStats {
        LoadStats { created: self.created,
                    updated: self.updated,
                    failed: self.failed }
    }

    pub fn record_created(&mut self) {
        self.created += 1;
    }

    pub fn record_updated(&mut self) {
        self.updated += 1;
    }

    /// Falla de una fila: cuenta y guarda el error, el archivo sigue.
    pub fn record_failure(&mut self, err: FixtureError) {
        self.failed += 1;
        self.errors.push(err.to_string());
    }

    /// Falla a nivel de archivo: el estado queda en `Failed`.
    pub fn mark_failed(&mut self, err: FixtureError) {
        self.errors.push(err.to_string());
        self.status = FixtureLoadStatus::Failed;
    }

    /// Fija el estado final según el resultado del commit.
    pub fn finish_commit(&mut self, commit: Result<(), SessionError>) {
        match commit {
            Ok(()) if self.failed == 0 && self.errors.is_empty() => self.status = FixtureLoadStatus::Success,
            Ok(()) => self.status = FixtureLoadStatus::Partial,
            Err(e) => self.mark_failed(FixtureError::CommitFailed(e.to_string())),
        }
    }
}

#[derive(Serialize)]
struct FixtureReport<'a> {
    fixture: &'a str,
    status: FixtureLoadStatus,
    stats: LoadStats,
    errors: &'a [String],
}

impl Serialize for FixtureResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FixtureReport { fixture: &self.fixture_name,
                        status: self.status,
                        stats: self.stats(),
                        errors: &self.errors }.serialize(serializer)
    }
}

/// Totales de una corrida.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub total_fixtures: usize,
    pub successful_fixtures: usize,
}

/// Proyección de sólo lectura sobre los resultados de una corrida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub run_id: Uuid,
    pub stats: SummaryStats,
    pub fixtures: IndexMap<String, FixtureResult>,
}

impl LoadSummary {
    pub fn from_results(run_id: Uuid, results: &IndexMap<String, FixtureResult>) -> Self {
        let stats = results.values().fold(SummaryStats::default(), |mut acc, r| {
                                        acc.created += r.created;
                                        acc.updated += r.updated;
                                        acc.failed += r.failed;
                                        acc.total_fixtures += 1;
                                        if r.is_successful() {
                                            acc.successful_fixtures += 1;
                                        }
                                        acc
                                    });
        Self { run_id,
               stats,
               fixtures: results.clone() }
    }

    pub fn all_successful(&self) -> bool {
        self.stats.successful_fixtures == self.stats.total_fixtures
    }

    /// Nombres de los archivos que no terminaron en `Success`, en orden de carga.
    pub fn failed_fixtures(&self) -> Vec<&str> {
        self.fixtures
            .iter()
            .filter(|(_, r)| !r.is_successful())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commit_ok_without_failures_is_success() {
        let mut r = FixtureResult::new("01.json");
        r.record_created();
        r.finish_commit(Ok(()));
        assert_eq!(r.status, FixtureLoadStatus::Success);
        assert!(r.is_successful());
    }

    #[test]
    fn commit_ok_with_failures_is_partial() {
        let mut r = FixtureResult::new("01.json");
        r.record_created();
        r.record_failure(FixtureError::RecordProcessing { record: "{}".into(), reason: "x".into() });
        r.finish_commit(Ok(()));
        assert_eq!(r.status, FixtureLoadStatus::Partial);
        assert_eq!(r.failed, 1);
        assert_eq!(r.errors.len(), 1);
    }

    #[test]
    fn commit_error_is_failed_regardless_of_rows() {
        let mut r = FixtureResult::new("01.json");
        r.record_updated();
        r.finish_commit(Err(SessionError::Storage("disk full".into())));
        assert_eq!(r.status, FixtureLoadStatus::Failed);
        assert_eq!(r.errors, vec!["Commit failed: storage error: disk full".to_string()]);
    }

    #[test]
    fn serializes_in_report_shape() {
        let mut r = FixtureResult::new("01_terms.json");
        r.record_created();
        r.finish_commit(Ok(()));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v,
                   json!({"fixture": "01_terms.json", "status": "success",
                          "stats": {"created": 1, "updated": 0, "failed": 0}, "errors": []}));
    }

    #[test]
    fn summary_sums_and_counts() {
        let mut ok = FixtureResult::new("01.json");
        ok.created = 2;
        ok.updated = 1;
        let mut partial = FixtureResult::new("02.json");
        partial.created = 1;
        partial.record_failure(FixtureError::RecordProcessing { record: "{}".into(), reason: "x".into() });
        partial.finish_commit(Ok(()));

        let mut results = IndexMap::new();
        results.insert(ok.fixture_name.clone(), ok);
        results.insert(partial.fixture_name.clone(), partial);

        let summary = LoadSummary::from_results(Uuid::nil(), &results);
        assert_eq!(summary.stats,
                   SummaryStats { created: 3, updated: 1, failed: 1, total_fixtures: 2, successful_fixtures: 1 });
        assert!(!summary.all_successful());
        assert_eq!(summary.failed_fixtures(), vec!["02.json"]);
    }
}
