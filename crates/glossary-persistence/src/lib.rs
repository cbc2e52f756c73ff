//! glossary-persistence
//!
//! Implementaciones Postgres (Diesel) de los contratos del glosario y del
//! cargador de fixtures, más utilidades de conexión y migraciones.
//!
//! Módulos:
//! - `pg`: pool, repositorio de términos y sesión de fixtures sobre Postgres.
//! - `entities`: tabla de registro de entidades cargables desde fixtures.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod entities;
pub mod error;
pub mod migrations;
pub mod models;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use entities::{namespace, GlossaryTermEntity, MODELS_NAMESPACE};
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, ConnectionProvider, PgFixtureSession, PgGlossaryRepository, PgPool,
             PoolProvider};
