//! Errores del cargador de fixtures.
//!
//! `FixtureError` clasifica las fallas a nivel de archivo; nunca escapa de
//! `FixtureLoader::load_fixture`, sólo se registra como texto en el
//! `FixtureResult`. `RowError` es la falla de una fila individual y
//! `SessionError` la del backend de persistencia.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FixtureError {
    #[error("Model {0} not found")]
    ModelNotFound(String),
    #[error("Data validation failed")]
    ValidationFailed,
    #[error("Error processing record {record}: {reason}")]
    RecordProcessing { record: String, reason: String },
    #[error("Commit failed: {0}")]
    CommitFailed(String),
    #[error("Fixture loading failed: {0}")]
    FixtureParse(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RowError {
    #[error("No unique fields found in record")]
    NoUniqueFields,
    #[error("Missing unique fields {0:?}")]
    MissingUniqueFields(Vec<String>),
    #[error("cannot build {entity}: {reason}")]
    Construct { entity: String, reason: String },
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SessionError {
    #[error("multiple rows in {table} match the unique fields")]
    MultipleResults { table: String },
    #[error("row {key} not found in {table}")]
    MissingRow { table: String, key: i64 },
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("unsupported value for column {column}: {value}")]
    UnsupportedValue { column: String, value: String },
    #[error("storage error: {0}")]
    Storage(String),
}

impl FixtureError {
    /// Error de fila con el registro serializado como contexto.
    pub fn record(record: &crate::fixture::Row, err: &RowError) -> Self {
        let record = serde_json::Value::Object(record.clone()).to_string();
        Self::RecordProcessing { record, reason: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_match_result_error_strings() {
        assert_eq!(FixtureError::ModelNotFound("Foo".into()).to_string(), "Model Foo not found");
        assert_eq!(FixtureError::ValidationFailed.to_string(), "Data validation failed");
        assert_eq!(FixtureError::CommitFailed("boom".into()).to_string(), "Commit failed: boom");
    }

    #[test]
    fn record_error_embeds_row_json() {
        let row = json!({"term": "API"}).as_object().cloned().unwrap();
        let err = FixtureError::record(&row, &RowError::NoUniqueFields);
        assert_eq!(err.to_string(),
                   "Error processing record {\"term\":\"API\"}: No unique fields found in record");
    }

    #[test]
    fn session_error_converts_into_row_error() {
        let err: RowError = SessionError::Storage("down".into()).into();
        assert_eq!(err.to_string(), "storage error: down");
    }
}
