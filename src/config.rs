//! Configuración central de la aplicación.
//!
//! Carga `.env` una sola vez y luego lee variables de entorno. Los valores
//! ausentes toman su default; los presentes pero mal formados son error de
//! configuración (nunca panic).
use std::env;
use std::path::PathBuf;

use glossary_core::constants::DEFAULT_FIXTURES_DIR;
use glossary_persistence::config::{DbConfig, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS};

use crate::errors::CoreError;

/// Configuración global de la aplicación.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub debug: bool,
    pub database: DbConfig,
    pub server: ServerConfig,
    pub fixtures: FixturesConfig,
}

/// Dirección anunciada por el servicio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Origen de los datos iniciales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturesConfig {
    pub dir: PathBuf,
    /// Si es `true`, un fixture fallido no detiene la carga del resto.
    pub ignore_errors: bool,
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> Result<bool, CoreError> {
    match raw.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        None | Some("") => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(CoreError::Config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, CoreError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim()
                    .parse()
                    .map_err(|_| CoreError::Config(format!("{key}: expected a number, got '{v}'"))),
    }
}

impl AppConfig {
    /// Lee la configuración del entorno (tras cargar `.env`).
    pub fn from_env() -> Result<Self, CoreError> {
        glossary_persistence::init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de
    /// variables.
    pub fn from_lookup<F>(get: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let url = get("DATABASE_URL").filter(|v| !v.trim().is_empty())
                                     .ok_or_else(|| CoreError::Config("DATABASE_URL is not set".into()))?;
        let database = DbConfig { url,
                                  min_connections: parse_num("DATABASE_MIN_CONNECTIONS",
                                                             get("DATABASE_MIN_CONNECTIONS"),
                                                             DEFAULT_MIN_CONNECTIONS)?,
                                  max_connections: parse_num("DATABASE_MAX_CONNECTIONS",
                                                             get("DATABASE_MAX_CONNECTIONS"),
                                                             DEFAULT_MAX_CONNECTIONS)? };
        let server = ServerConfig { host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
                                    port: parse_num("PORT", get("PORT"), 8000)? };
        let fixtures = FixturesConfig { dir: get("FIXTURES_DIR").map(PathBuf::from)
                                                                .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURES_DIR)),
                                        ignore_errors: parse_bool("FIXTURES_IGNORE_ERRORS",
                                                                  get("FIXTURES_IGNORE_ERRORS"),
                                                                  false)? };
        Ok(Self { environment: get("ENVIRONMENT").unwrap_or_else(|| "production".into()),
                  debug: parse_bool("DEBUG", get("DEBUG"), false)?,
                  database,
                  server,
                  fixtures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/glossary")])).unwrap();
        assert_eq!(cfg.environment, "production");
        assert!(!cfg.debug);
        assert_eq!((cfg.database.min_connections, cfg.database.max_connections), (2, 16));
        assert_eq!(cfg.server,
                   ServerConfig { host: "0.0.0.0".into(),
                                  port: 8000 });
        assert_eq!(cfg.fixtures,
                   FixturesConfig { dir: PathBuf::from("fixtures"),
                                    ignore_errors: false });
    }

    #[test]
    fn missing_url_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err.to_string(), "Error de configuración: DATABASE_URL is not set");
    }

    #[test]
    fn overrides_and_bad_values() {
        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db"),
                                                  ("DEBUG", "True"),
                                                  ("PORT", "9000"),
                                                  ("FIXTURES_DIR", "/srv/seed"),
                                                  ("FIXTURES_IGNORE_ERRORS", "yes")])).unwrap();
        assert!(cfg.debug);
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.fixtures.dir, PathBuf::from("/srv/seed"));
        assert!(cfg.fixtures.ignore_errors);

        assert!(AppConfig::from_lookup(lookup(&[("DATABASE_URL", "x"), ("PORT", "http")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("DATABASE_URL", "x"), ("DEBUG", "maybe")])).is_err());
    }
}
