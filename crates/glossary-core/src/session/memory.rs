use std::collections::BTreeMap;

use serde_json::Value;

use super::{EntityKey, FixtureSession, StagedWrite, StagedWrites};
use crate::constants::FIND_ONE_PROBE_LIMIT;
use crate::errors::SessionError;
use crate::fixture::Row;
use crate::registry::EntityDescriptor;

/// Fila almacenada por `InMemorySession`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntity {
    pub key: EntityKey,
    pub values: Row,
}

/// Sesión en memoria: tablas como vectores de filas, claves incrementales.
///
/// El commit trabaja sobre una copia de las tablas y sólo la publica si todas
/// las escrituras pendientes pasan las restricciones NOT NULL del descriptor,
/// con lo que un commit fallido no deja cambios parciales.
#[derive(Debug, Default)]
pub struct InMemorySession {
    tables: BTreeMap<String, Vec<StoredEntity>>,
    last_key: EntityKey,
    staged: StagedWrites,
    commits: usize,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta directamente (sin pasar por staging); útil para sembrar estado.
    pub fn insert_committed(&mut self, entity: &EntityDescriptor, values: Row) -> EntityKey {
        self.last_key += 1;
        let key = self.last_key;
        self.tables
            .entry(entity.table().to_string())
            .or_default()
            .push(StoredEntity { key, values });
        key
    }

    pub fn rows(&self, table: &str) -> &[StoredEntity] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn count(&self, table: &str) -> usize {
        self.rows(table).len()
    }

    /// Número de commits exitosos.
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Escrituras aún no confirmadas.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }
}

fn matches_filter(values: &Row, filter: &[(String, Value)]) -> bool {
    filter.iter()
          .all(|(col, expected)| values.get(col).unwrap_or(&Value::Null) == expected)
}

fn not_null_violation(entity: &EntityDescriptor, values: &Row) -> Result<(), SessionError> {
    match entity.missing_required(values).first() {
        Some(col) => Err(SessionError::Constraint(format!("null value in column \"{col}\" of relation \"{}\" violates not-null constraint",
                                                         entity.table()))),
        None => Ok(()),
    }
}

impl FixtureSession for InMemorySession {
    fn find_one(&mut self, entity: &EntityDescriptor, filter: &[(String, Value)]) -> Result<Option<EntityKey>, SessionError> {
        let found: Vec<EntityKey> = self.rows(entity.table())
                                        .iter()
                                        .filter(|e| matches_filter(&e.values, filter))
                                        .map(|e| e.key)
                                        .take(FIND_ONE_PROBE_LIMIT)
                                        .collect();
        match found.as_slice() {
            [] => Ok(None),
            [key] => Ok(Some(*key)),
            _ => Err(SessionError::MultipleResults { table: entity.table().to_string() }),
        }
    }

    fn staged(&mut self) -> &mut StagedWrites {
        &mut self.staged
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        let mut tables = self.tables.clone();
        let mut last_key = self.last_key;
        for write in self.staged.iter() {
            match write {
                StagedWrite::Insert { entity, values } => {
                    not_null_violation(entity, values)?;
                    last_key += 1;
                    tables.entry(entity.table().to_string())
                          .or_default()
                          .push(StoredEntity { key: last_key,
                                               values: values.clone() });
                }
                StagedWrite::Update { entity, key, values } => {
                    let row = tables.get_mut(entity.table())
                                    .and_then(|rows| rows.iter_mut().find(|e| e.key == *key))
                                    .ok_or_else(|| SessionError::MissingRow { table: entity.table().to_string(),
                                                                              key: *key })?;
                    let mut merged = row.values.clone();
                    merged.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
                    not_null_violation(entity, &merged)?;
                    row.values = merged;
                }
            }
        }
        self.tables = tables;
        self.last_key = last_key;
        self.staged.clear();
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOTE: EntityDescriptor = EntityDescriptor::new("Note", "notes", &["slug", "body"]).with_required(&["body"]);

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    fn filter(col: &str, v: Value) -> Vec<(String, Value)> {
        vec![(col.to_string(), v)]
    }

    #[test]
    fn staged_insert_is_invisible_until_commit() {
        let mut s = InMemorySession::new();
        s.stage_insert(&NOTE, row(json!({"slug": "a", "body": "x"}))).unwrap();
        assert_eq!(s.find_one(&NOTE, &filter("slug", json!("a"))).unwrap(), None);
        assert_eq!(s.pending(), 1);
        s.commit().unwrap();
        assert_eq!(s.pending(), 0);
        assert_eq!(s.commits(), 1);
        assert_eq!(s.find_one(&NOTE, &filter("slug", json!("a"))).unwrap(), Some(1));
    }

    #[test]
    fn update_merges_values() {
        let mut s = InMemorySession::new();
        let key = s.insert_committed(&NOTE, row(json!({"slug": "a", "body": "old"})));
        s.stage_update(&NOTE, key, row(json!({"body": "new"}))).unwrap();
        s.commit().unwrap();
        assert_eq!(s.rows("notes")[0].values, row(json!({"slug": "a", "body": "new"})));
    }

    #[test]
    fn commit_failure_applies_nothing() {
        let mut s = InMemorySession::new();
        s.stage_insert(&NOTE, row(json!({"slug": "ok", "body": "x"}))).unwrap();
        s.stage_insert(&NOTE, row(json!({"slug": "bad"}))).unwrap();
        let err = s.commit().unwrap_err();
        assert!(matches!(err, SessionError::Constraint(ref m) if m.contains("\"body\"")));
        assert_eq!(s.count("notes"), 0);
        assert_eq!(s.pending(), 2);
        s.rollback();
        assert_eq!(s.pending(), 0);
        assert_eq!(s.commits(), 0);
    }

    #[test]
    fn find_one_rejects_ambiguous_filters() {
        let mut s = InMemorySession::new();
        s.insert_committed(&NOTE, row(json!({"slug": "dup", "body": "1"})));
        s.insert_committed(&NOTE, row(json!({"slug": "dup", "body": "2"})));
        let err = s.find_one(&NOTE, &filter("slug", json!("dup"))).unwrap_err();
        assert_eq!(err, SessionError::MultipleResults { table: "notes".into() });
    }

    #[test]
    fn null_filter_matches_absent_column() {
        let mut s = InMemorySession::new();
        let key = s.insert_committed(&NOTE, row(json!({"body": "x"})));
        assert_eq!(s.find_one(&NOTE, &filter("slug", Value::Null)).unwrap(), Some(key));
    }

    #[test]
    fn update_of_unknown_key_fails_commit() {
        let mut s = InMemorySession::new();
        s.stage_update(&NOTE, 99, row(json!({"body": "x"}))).unwrap();
        assert_eq!(s.commit().unwrap_err(), SessionError::MissingRow { table: "notes".into(), key: 99 });
    }
}
