//! Glossary API
//!
//! Crate de aplicación: configuración, logging y rutina de arranque que
//! construye el pool de Postgres y carga los datos iniciales desde fixtures.
//! Las operaciones del glosario viven en `glossary-domain`; el cargador en
//! `glossary-core`; los backends Postgres en `glossary-persistence`.

pub mod config;
pub mod errors;
pub mod logging;
pub mod startup;

pub use config::AppConfig;
pub use errors::CoreError;
