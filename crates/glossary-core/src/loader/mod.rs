//! Orquestador de la carga de fixtures.
//!
//! `FixtureLoader` posee la sesión, el registro de modelos (con su caché) y
//! los resultados de la corrida. Procesamiento estrictamente secuencial:
//! archivos en orden lexicográfico por nombre, filas en orden de aparición.
//! Cada archivo es una transacción independiente.
pub mod upsert;
pub mod validate;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::constants::FIXTURE_EXTENSION;
use crate::errors::FixtureError;
use crate::fixture::{FixtureFile, FixtureResult, LoadSummary};
use crate::registry::{ModelRegistry, Namespace};
use crate::session::FixtureSession;

pub use upsert::{process_row, RowOutcome};
pub use validate::validate_rows;

pub struct FixtureLoader<S: FixtureSession> {
    session: S,
    registry: ModelRegistry,
    results: IndexMap<String, FixtureResult>,
    run_id: Uuid,
}

impl<S: FixtureSession> FixtureLoader<S> {
    pub fn new(session: S, namespace: Namespace) -> Self {
        Self { session,
               registry: ModelRegistry::new(namespace),
               results: IndexMap::new(),
               run_id: Uuid::new_v4() }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// Resultados de la última corrida de `load_all_fixtures`, en orden de carga.
    pub fn results(&self) -> &IndexMap<String, FixtureResult> {
        &self.results
    }

    /// Carga un archivo. Nunca falla: todo error queda en el resultado.
    pub fn load_fixture(&mut self, path: &Path) -> FixtureResult {
        let name = fixture_name(path);
        let mut result = FixtureResult::new(name.clone());

        match FixtureFile::read(path) {
            Ok(fixture) => self.apply_fixture(&name, &fixture, &mut result),
            Err(e) => {
                error!("Error loading fixture {}: {e}", path.display());
                result.mark_failed(e);
            }
        }

        info!("Processed {name}: created {}, updated {}, failed {}",
              result.created,
              result.updated,
              result.failed);
        if !result.errors.is_empty() {
            error!("Errors in {name}: {:?}", result.errors);
        }
        result
    }

    fn apply_fixture(&mut self, name: &str, fixture: &FixtureFile, result: &mut FixtureResult) {
        info!("Loading fixture: {name} for model {}", fixture.model);

        let Some(entity) = self.registry.resolve(&fixture.model) else {
            result.mark_failed(FixtureError::ModelNotFound(fixture.model.clone()));
            return;
        };

        if !validate_rows(&entity, &fixture.data, &fixture.unique_fields) {
            result.mark_failed(FixtureError::ValidationFailed);
            return;
        }

        for row in &fixture.data {
            let savepoint = self.session.savepoint();
            match process_row(&mut self.session, &entity, row, &fixture.unique_fields) {
                Ok(RowOutcome::Created) => result.record_created(),
                Ok(RowOutcome::Updated) => result.record_updated(),
                Err(e) => {
                    error!("Error processing record: {e}");
                    self.session.rollback_to(savepoint);
                    result.record_failure(FixtureError::record(row, &e));
                }
            }
        }

        let commit = self.session.commit();
        if commit.is_err() {
            self.session.rollback();
        }
        result.finish_commit(commit);
    }

    /// Carga todos los `*.json` de `dir` en orden lexicográfico.
    ///
    /// Cada llamada es una corrida nueva: `run_id` nuevo, caché de modelos
    /// vacía y resultados desde cero.
    ///
    /// Sin `ignore_errors`, el primer archivo que no termine en `Success`
    /// detiene la corrida; los archivos restantes no se intentan ni se
    /// registran.
    pub fn load_all_fixtures(&mut self, dir: &Path, ignore_errors: bool) -> &IndexMap<String, FixtureResult> {
        self.run_id = Uuid::new_v4();
        self.registry.clear_cache();
        self.results = IndexMap::new();

        if !dir.is_dir() {
            warn!("Fixtures directory not found: {}", dir.display());
            return &self.results;
        }

        info!("Starting to load all fixtures from {} (run {})", dir.display(), self.run_id);
        let files = match discover_fixtures(dir) {
            Ok(files) => files,
            Err(e) => {
                error!("Cannot list fixtures directory {}: {e}", dir.display());
                return &self.results;
            }
        };

        for path in files {
            let result = self.load_fixture(&path);
            let stop = !result.is_successful() && !ignore_errors;
            self.results.insert(result.fixture_name.clone(), result);
            if stop {
                error!("Stopping fixture loading due to failure in {}", fixture_name(&path));
                break;
            }
        }

        self.log_summary();
        &self.results
    }

    fn log_summary(&self) {
        let summary = self.summary();
        let total = summary.stats.total_fixtures;
        if total == 0 {
            info!("No fixtures found to load");
        } else if summary.all_successful() {
            info!("Successfully loaded all {total} fixtures");
        } else {
            warn!("Loaded {} out of {total} fixtures successfully. Failed fixtures: {:?}",
                  summary.stats.successful_fixtures,
                  summary.failed_fixtures());
        }
    }

    pub fn summary(&self) -> LoadSummary {
        LoadSummary::from_results(self.run_id, &self.results)
    }
}

fn fixture_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Archivos con extensión de fixture, ordenados por nombre de archivo.
pub fn discover_fixtures(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_fixture = path.is_file() && path.extension().is_some_and(|ext| ext == FIXTURE_EXTENSION);
        if is_fixture {
            files.push(path);
        } else {
            debug!("skip non-fixture entry {}", path.display());
        }
    }
    files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(files)
}
