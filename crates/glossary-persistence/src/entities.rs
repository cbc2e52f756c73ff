//! Entidades persistentes que el cargador de fixtures puede resolver por
//! nombre de modelo.

use chrono::{DateTime, Utc};
use glossary_core::{FixtureEntity, Namespace, Row};
use serde_json::Value;

/// Nombre lógico de la tabla de registro.
pub const MODELS_NAMESPACE: &str = "database.models";

/// Tabla de registro usada al arranque y por `glossary-cli load`.
pub fn namespace() -> Namespace {
    Namespace::new(MODELS_NAMESPACE).register_entity::<GlossaryTermEntity>()
}

/// `GlossaryTerm` construido desde una fila de fixture.
///
/// Los campos ausentes quedan en `None` y no se envían al insert: la base
/// aplica sus defaults y rechaza los NOT NULL faltantes al commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlossaryTermEntity {
    pub id: Option<i64>,
    pub term: Option<String>,
    pub definition: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn string_field(row: &Row, field: &str) -> Result<Option<String>, String> {
    match row.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!("{field} must be a string, got {other}")),
    }
}

fn timestamp_field(row: &Row, field: &str) -> Result<Option<DateTime<Utc>>, String> {
    match string_field(row, field)? {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(&s).map(|t| Some(t.with_timezone(&Utc)))
                                                   .map_err(|e| format!("{field} is not an RFC 3339 timestamp: {e}")),
    }
}

impl FixtureEntity for GlossaryTermEntity {
    const NAME: &'static str = "GlossaryTerm";
    const TABLE: &'static str = "glossary_terms";
    const COLUMNS: &'static [&'static str] = &["id", "term", "definition", "created_at", "updated_at"];
    const REQUIRED: &'static [&'static str] = &["term", "definition"];
    const TOUCH_ON_UPDATE: Option<&'static str> = Some("updated_at");

    fn from_fixture_row(row: &Row) -> Result<Self, String> {
        let id = match row.get("id") {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.as_i64().ok_or_else(|| format!("id must be an integer, got {v}"))?),
        };
        Ok(Self { id,
                  term: string_field(row, "term")?,
                  definition: string_field(row, "definition")?,
                  created_at: timestamp_field(row, "created_at")?,
                  updated_at: timestamp_field(row, "updated_at")? })
    }

    fn into_columns(self) -> Row {
        let mut row = Row::new();
        if let Some(id) = self.id {
            row.insert("id".into(), Value::from(id));
        }
        if let Some(term) = self.term {
            row.insert("term".into(), Value::String(term));
        }
        if let Some(definition) = self.definition {
            row.insert("definition".into(), Value::String(definition));
        }
        if let Some(t) = self.created_at {
            row.insert("created_at".into(), Value::String(t.to_rfc3339()));
        }
        if let Some(t) = self.updated_at {
            row.insert("updated_at".into(), Value::String(t.to_rfc3339()));
        }
        row
    }
}
