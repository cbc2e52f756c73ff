use std::collections::BTreeMap;

use thiserror::Error;

/// Mensajes de validación agrupados por campo.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub type DomainResult<T> = Result<T, DomainError>;

/// Error del servicio de glosario. Cada variante lleva su código HTTP
/// equivalente (`status_code`) para que un adaptador externo lo traduzca
/// sin reinterpretarlo.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Validation failed: {}", describe(.0))]
    Validation(FieldErrors),
    #[error("Storage error: {0}")]
    Storage(String),
}

fn describe(errors: &FieldErrors) -> String {
    errors.iter()
          .map(|(field, msgs)| format!("{field}: {}", msgs.join(", ")))
          .collect::<Vec<_>>()
          .join("; ")
}

impl DomainError {
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::NotFound(_) => 404,
            DomainError::BadRequest(_) | DomainError::Validation(_) => 400,
            DomainError::Storage(_) => 500,
        }
    }

    pub fn term_not_found(id: i64) -> Self {
        DomainError::NotFound(format!("Glossary term with id {id} not found"))
    }

    /// Errores por campo, si los hay.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            DomainError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::BadRequest(e.to_string())
    }
}
