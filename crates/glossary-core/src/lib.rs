//! glossary-core: carga de fixtures JSON (upsert idempotente).
//!
//! Flujo de una corrida:
//! `FixtureLoader` descubre los archivos `*.json` de un directorio, los
//! procesa en orden lexicográfico y, por cada archivo:
//! parse JSON -> `ModelRegistry` resuelve el descriptor -> `validate_rows`
//! revisa el lote -> `process_row` hace upsert fila a fila -> commit/rollback
//! por archivo -> `FixtureResult` acumula contadores y errores.
//!
//! La persistencia se abstrae detrás de `FixtureSession`; este crate incluye
//! la implementación `InMemorySession` (tests y dry-run). La implementación
//! Postgres vive en `glossary-persistence`.
pub mod constants;
pub mod errors;
pub mod fixture;
pub mod loader;
pub mod registry;
pub mod session;

pub use errors::{FixtureError, RowError, SessionError};
pub use fixture::{FixtureFile, FixtureLoadStatus, FixtureResult, LoadStats, LoadSummary, Row};
pub use loader::{process_row, validate_rows, FixtureLoader, RowOutcome};
pub use registry::{EntityDescriptor, FixtureEntity, ModelRegistry, Namespace};
pub use session::{EntityKey, FixtureSession, InMemorySession, Savepoint, StagedWrite, StagedWrites};
