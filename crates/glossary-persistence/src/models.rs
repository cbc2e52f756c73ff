//! Filas Diesel de `glossary_terms` y su mapeo a `GlossaryTerm`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use glossary_domain::GlossaryTerm;

use crate::schema::glossary_terms;

/// Fila mapeada de `glossary_terms` para lecturas (orden de columnas del
/// esquema).
#[derive(Queryable, Debug)]
pub struct GlossaryTermRow {
    pub id: i64,
    pub term: String,
    pub definition: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = glossary_terms)]
pub struct NewGlossaryTermRow<'a> {
    pub term: &'a str,
    pub definition: &'a str,
}

/// Cambios parciales: los `None` no se incluyen en el `SET`.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = glossary_terms)]
pub struct GlossaryTermChangeset<'a> {
    pub term: Option<&'a str>,
    pub definition: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl From<GlossaryTermRow> for GlossaryTerm {
    fn from(row: GlossaryTermRow) -> Self {
        GlossaryTerm { id: row.id,
                       term: row.term,
                       definition: row.definition,
                       created_at: row.created_at,
                       updated_at: row.updated_at }
    }
}
