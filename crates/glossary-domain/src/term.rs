use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longitud máxima de `term` (columna VARCHAR(255)).
pub const TERM_MAX_LEN: usize = 255;

/// Entrada del glosario tal como se persiste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub id: i64,
    pub term: String,
    pub definition: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload de creación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGlossaryTerm {
    pub term: String,
    pub definition: String,
}

impl NewGlossaryTerm {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self { term: term.into(),
               definition: definition.into() }
    }
}

/// Payload de actualización parcial. Los campos `None` no se tocan; los
/// campos protegidos (`id`, `created_at`, `updated_at`) no forman parte del
/// payload y cualquier clave desconocida en el JSON de entrada se ignora.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTermPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl GlossaryTermPatch {
    pub fn is_empty(&self) -> bool {
        self.term.is_none() && self.definition.is_none()
    }

    /// Aplica los campos presentes y refresca `updated_at`.
    pub fn apply_to(&self, target: &mut GlossaryTerm, now: DateTime<Utc>) {
        if let Some(term) = &self.term {
            target.term = term.clone();
        }
        if let Some(definition) = &self.definition {
            target.definition = definition.clone();
        }
        target.updated_at = now;
    }
}

impl fmt::Display for GlossaryTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.id, self.term)
    }
}
