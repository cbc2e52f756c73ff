//! Rutina de arranque: pool, carga de datos iniciales y reporte.
//!
//! Ningún resultado de la carga de fixtures impide arrancar; sólo un error
//! de configuración o de conexión a la base lo hace.

use glossary_core::{FixtureLoader, FixtureSession, LoadSummary, Namespace};
use glossary_persistence::pg::build_pool_from_config;
use glossary_persistence::{namespace, PgFixtureSession, PgPool, PoolProvider};
use log::{debug, error, info, warn};

use crate::config::{AppConfig, FixturesConfig};
use crate::errors::CoreError;

/// Carga todos los fixtures de `cfg.dir` sobre `session` y reporta el resumen.
pub fn load_fixtures_into<S: FixtureSession>(session: S, namespace: Namespace, cfg: &FixturesConfig) -> LoadSummary {
    let mut loader = FixtureLoader::new(session, namespace);
    loader.load_all_fixtures(&cfg.dir, cfg.ignore_errors);
    let summary = loader.summary();
    report(&summary);
    summary
}

fn report(summary: &LoadSummary) {
    let stats = &summary.stats;
    info!("Initial data load {}: {}/{} fixtures successful (created {}, updated {}, failed {})",
          summary.run_id,
          stats.successful_fixtures,
          stats.total_fixtures,
          stats.created,
          stats.updated,
          stats.failed);
    if !summary.all_successful() {
        warn!("Fixtures with errors: {:?}", summary.failed_fixtures());
    }
    match serde_json::to_string(summary) {
        Ok(json) => debug!("load summary: {json}"),
        Err(e) => warn!("cannot serialize load summary: {e}"),
    }
}

/// Carga los datos iniciales en Postgres. `None` si no se pudo abrir la
/// sesión; el error queda en el log.
pub fn load_initial_data(pool: &PgPool, cfg: &FixturesConfig) -> Option<LoadSummary> {
    let provider = PoolProvider { pool: pool.clone() };
    match PgFixtureSession::from_provider(&provider) {
        Ok(session) => Some(load_fixtures_into(session, namespace(), cfg)),
        Err(e) => {
            error!("Error loading initial data: {e}");
            None
        }
    }
}

/// Arranque completo. Devuelve el pool (para quien sirva las operaciones del
/// glosario) y el resumen de la carga inicial.
pub fn run(config: &AppConfig) -> Result<(PgPool, Option<LoadSummary>), CoreError> {
    info!("Starting glossary-api (environment={}, debug={})", config.environment, config.debug);
    let pool = build_pool_from_config(&config.database)?;
    info!("Loading initial data from {}", config.fixtures.dir.display());
    let summary = load_initial_data(&pool, &config.fixtures);
    info!("glossary-api ready on {}:{}", config.server.host, config.server.port);
    Ok((pool, summary))
}
