//! Formato de archivo de fixtures.
//!
//! ```json
//! {
//!   "model": "GlossaryTerm",
//!   "unique_fields": ["term"],
//!   "data": [{"term": "API", "definition": "..."}]
//! }
//! ```
//! `unique_fields` y `data` son opcionales (vacíos por defecto).
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::FixtureError;

/// Una fila: nombre de campo -> valor escalar.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureFile {
    pub model: String,
    #[serde(default)]
    pub unique_fields: Vec<String>,
    #[serde(default)]
    pub data: Vec<Row>,
}

impl FixtureFile {
    pub fn from_json_str(raw: &str) -> Result<Self, FixtureError> {
        serde_json::from_str(raw).map_err(|e| FixtureError::FixtureParse(e.to_string()))
    }

    /// Lee y parsea un archivo UTF-8. Errores de IO y de JSON se reportan
    /// igual (`FixtureParse`).
    pub fn read(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path).map_err(|e| FixtureError::FixtureParse(e.to_string()))?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_sections_default_to_empty() {
        let f = FixtureFile::from_json_str(r#"{"model": "GlossaryTerm"}"#).unwrap();
        assert_eq!(f.model, "GlossaryTerm");
        assert!(f.unique_fields.is_empty());
        assert!(f.data.is_empty());
    }

    #[test]
    fn rows_keep_field_values() {
        let f = FixtureFile::from_json_str(r#"{"model": "GlossaryTerm", "unique_fields": ["term"],
                                              "data": [{"term": "API", "definition": "x", "rank": 3, "draft": null}]}"#).unwrap();
        assert_eq!(f.unique_fields, vec!["term".to_string()]);
        let row = &f.data[0];
        assert_eq!(row["term"], "API");
        assert_eq!(row["rank"], 3);
        assert!(row["draft"].is_null());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = FixtureFile::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, FixtureError::FixtureParse(_)));
        assert!(err.to_string().starts_with("Fixture loading failed:"));
    }

    #[test]
    fn missing_model_is_parse_error() {
        let err = FixtureFile::from_json_str(r#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, FixtureError::FixtureParse(_)));
    }

    #[test]
    fn missing_file_is_parse_error() {
        let err = FixtureFile::read(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, FixtureError::FixtureParse(_)));
    }
}
