use glossary_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] PersistenceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_variant_display() {
        let err = CoreError::Config("PORT: expected a number, got 'x'".into());
        assert_eq!(err.to_string(), "Error de configuración: PORT: expected a number, got 'x'");
    }

    #[test]
    fn test_persistence_variant_from() {
        let err: CoreError = PersistenceError::TransientIo("pool".into()).into();
        assert_eq!(err.to_string(), "Error de persistencia: transient IO / connection pool error: pool");
    }
}
