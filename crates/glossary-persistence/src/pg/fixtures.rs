//! Sesión del cargador de fixtures sobre Postgres.
//!
//! El cargador trabaja con entidades descritas en tiempo de ejecución
//! (`EntityDescriptor`), así que las sentencias se arman como SQL dinámico con
//! parámetros enlazados (`sql_query(..).into_boxed()`), nunca interpolando
//! valores. Cada parámetro se castea al tipo real de su columna, leído una vez
//! por tabla de `information_schema.columns`; así un string RFC 3339 llega a
//! una columna `timestamptz` sin que el fixture declare tipos.
//!
//! Las escrituras quedan en `StagedWrites` hasta `commit`, que las aplica
//! todas dentro de una transacción. Las búsquedas no ven lo pendiente.

use std::collections::HashMap;

use diesel::connection::Connection;
use diesel::pg::{Pg, PgConnection};
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Bool, Double, Jsonb, Text};
use diesel::{QueryableByName, RunQueryDsl};
use glossary_core::constants::FIND_ONE_PROBE_LIMIT;
use glossary_core::{EntityDescriptor, EntityKey, FixtureSession, Row, SessionError, StagedWrite, StagedWrites};
use log::{debug, error, info};
use serde_json::Value;

use super::{ConnectionProvider, PgPooledConnection};
use crate::error::PersistenceError;

/// Columna de clave primaria asumida para toda entidad registrada.
pub const PRIMARY_KEY: &str = "id";

type ColumnTypes = HashMap<String, String>;
type BoxedQuery = BoxedSqlQuery<'static, Pg, SqlQuery>;

#[derive(QueryableByName)]
struct KeyRow {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

#[derive(QueryableByName)]
struct ColumnTypeRow {
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    udt_name: String,
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQL con placeholders `$n` y los valores a enlazar en ese orden.
#[derive(Debug, Default, PartialEq)]
struct Statement {
    sql: String,
    binds: Vec<Value>,
}

impl Statement {
    /// Placeholder para `value`; `NULL` literal si es nulo.
    fn placeholder(&mut self, value: &Value, cast: Option<&str>) -> String {
        if value.is_null() {
            return "NULL".into();
        }
        self.binds.push(value.clone());
        match cast {
            Some(ty) => format!("CAST(${} AS {})", self.binds.len(), quote_ident(ty)),
            None => format!("${}", self.binds.len()),
        }
    }

    fn into_query(self) -> BoxedQuery {
        let mut query = diesel::sql_query(self.sql).into_boxed::<Pg>();
        for value in self.binds {
            query = bind_value(query, value);
        }
        query
    }
}

fn bind_value(query: BoxedQuery, value: Value) -> BoxedQuery {
    match value {
        Value::String(s) => query.bind::<Text, _>(s),
        Value::Bool(b) => query.bind::<Bool, _>(b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => query.bind::<BigInt, _>(i),
            (None, Some(f)) => query.bind::<Double, _>(f),
            (None, None) => query.bind::<Text, _>(n.to_string()),
        },
        composite @ (Value::Array(_) | Value::Object(_)) => query.bind::<Jsonb, _>(composite),
        Value::Null => query,
    }
}

fn cast_for<'a>(types: Option<&'a ColumnTypes>, column: &str) -> Option<&'a str> {
    types.and_then(|t| t.get(column)).map(String::as_str)
}

fn find_statement(entity: &EntityDescriptor,
                  filter: &[(String, Value)],
                  types: Option<&ColumnTypes>)
                  -> Result<Statement, SessionError> {
    let mut stmt = Statement::default();
    let mut conditions = Vec::with_capacity(filter.len());
    for (column, value) in filter {
        match value {
            Value::Null => conditions.push(format!("{} IS NULL", quote_ident(column))),
            Value::Array(_) | Value::Object(_) => {
                return Err(SessionError::UnsupportedValue { column: column.clone(),
                                                            value: value.to_string() })
            }
            _ => {
                let ph = stmt.placeholder(value, cast_for(types, column));
                conditions.push(format!("{} = {ph}", quote_ident(column)));
            }
        }
    }
    let where_clause = if conditions.is_empty() { "TRUE".to_string() } else { conditions.join(" AND ") };
    stmt.sql = format!("SELECT CAST({} AS BIGINT) AS id FROM {} WHERE {where_clause} LIMIT {FIND_ONE_PROBE_LIMIT}",
                       quote_ident(PRIMARY_KEY),
                       quote_ident(entity.table()));
    Ok(stmt)
}

fn insert_statement(entity: &EntityDescriptor, values: &Row, types: Option<&ColumnTypes>) -> Statement {
    let table = quote_ident(entity.table());
    let mut stmt = Statement::default();
    if values.is_empty() {
        stmt.sql = format!("INSERT INTO {table} DEFAULT VALUES");
        return stmt;
    }
    let columns: Vec<String> = values.keys().map(|c| quote_ident(c)).collect();
    let placeholders: Vec<String> = values.iter()
                                          .map(|(c, v)| stmt.placeholder(v, cast_for(types, c)))
                                          .collect();
    stmt.sql = format!("INSERT INTO {table} ({}) VALUES ({})", columns.join(", "), placeholders.join(", "));
    stmt
}

/// `None` si no hay nada que asignar.
fn update_statement(entity: &EntityDescriptor,
                    key: EntityKey,
                    values: &Row,
                    types: Option<&ColumnTypes>)
                    -> Option<Statement> {
    let mut stmt = Statement::default();
    let mut assignments: Vec<String> = values.iter()
                                             .map(|(c, v)| {
                                                 format!("{} = {}", quote_ident(c), stmt.placeholder(v, cast_for(types, c)))
                                             })
                                             .collect();
    if let Some(touch) = entity.touch_on_update() {
        if !values.contains_key(touch) {
            assignments.push(format!("{} = now()", quote_ident(touch)));
        }
    }
    if assignments.is_empty() {
        return None;
    }
    let key_ph = stmt.placeholder(&Value::from(key), cast_for(types, PRIMARY_KEY));
    stmt.sql = format!("UPDATE {} SET {} WHERE {} = {key_ph}",
                       quote_ident(entity.table()),
                       assignments.join(", "),
                       quote_ident(PRIMARY_KEY));
    Some(stmt)
}

fn execute_write(conn: &mut PgConnection,
                 types: &HashMap<String, ColumnTypes>,
                 write: &StagedWrite)
                 -> Result<(), PersistenceError> {
    match write {
        StagedWrite::Insert { entity, values } => {
            insert_statement(entity, values, types.get(entity.table())).into_query()
                                                                      .execute(conn)?;
        }
        StagedWrite::Update { entity, key, values } => {
            if let Some(stmt) = update_statement(entity, *key, values, types.get(entity.table())) {
                if stmt.into_query().execute(conn)? == 0 {
                    return Err(PersistenceError::NotFound);
                }
            }
        }
    }
    Ok(())
}

fn load_column_types(conn: &mut PgConnection, table: &str) -> Result<ColumnTypes, PersistenceError> {
    let rows = diesel::sql_query("SELECT column_name::text AS column_name, udt_name::text AS udt_name \
                                  FROM information_schema.columns \
                                  WHERE table_schema = current_schema() AND table_name = $1")
        .bind::<Text, _>(table)
        .load::<ColumnTypeRow>(conn)?;
    Ok(rows.into_iter().map(|r| (r.column_name, r.udt_name)).collect())
}

/// Sesión sobre una conexión del pool; la conexión vuelve al pool al soltar
/// la sesión.
pub struct PgFixtureSession {
    conn: PgPooledConnection,
    staged: StagedWrites,
    column_types: HashMap<String, ColumnTypes>,
}

impl PgFixtureSession {
    pub fn new(conn: PgPooledConnection) -> Self {
        Self { conn,
               staged: StagedWrites::default(),
               column_types: HashMap::new() }
    }

    pub fn from_provider<P: ConnectionProvider>(provider: &P) -> Result<Self, PersistenceError> {
        Ok(Self::new(provider.connection()?))
    }

    fn ensure_column_types(&mut self, table: &str) -> Result<(), PersistenceError> {
        if !self.column_types.contains_key(table) {
            let types = load_column_types(&mut self.conn, table)?;
            debug!("introspected {} column(s) of {table}", types.len());
            self.column_types.insert(table.to_string(), types);
        }
        Ok(())
    }
}

impl FixtureSession for PgFixtureSession {
    fn find_one(&mut self, entity: &EntityDescriptor, filter: &[(String, Value)]) -> Result<Option<EntityKey>, SessionError> {
        self.ensure_column_types(entity.table())?;
        let stmt = find_statement(entity, filter, self.column_types.get(entity.table()))?;
        let rows = stmt.into_query()
                       .load::<KeyRow>(&mut *self.conn)
                       .map_err(PersistenceError::from)?;
        match rows.as_slice() {
            [] => Ok(None),
            [row] => Ok(Some(row.id)),
            _ => Err(SessionError::MultipleResults { table: entity.table().to_string() }),
        }
    }

    fn staged(&mut self) -> &mut StagedWrites {
        &mut self.staged
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        let tables: Vec<&'static str> = self.staged
                                            .iter()
                                            .map(|w| match w {
                                                StagedWrite::Insert { entity, .. } | StagedWrite::Update { entity, .. } => {
                                                    entity.table()
                                                }
                                            })
                                            .collect();
        for table in tables {
            self.ensure_column_types(table)?;
        }

        let staged = &self.staged;
        let types = &self.column_types;
        let conn: &mut PgConnection = &mut self.conn;
        let applied = conn.transaction::<_, PersistenceError, _>(|tx| {
                              for write in staged.iter() {
                                  execute_write(tx, types, write)?;
                              }
                              Ok(())
                          });
        match applied {
            Ok(()) => {
                info!("committed {} staged write(s)", self.staged.len());
                self.staged.clear();
                Ok(())
            }
            Err(e) => {
                error!("commit rolled back: {e}");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TERM: EntityDescriptor =
        EntityDescriptor::new("GlossaryTerm", "glossary_terms", &["id", "term", "definition", "updated_at"])
            .with_touch_on_update("updated_at");

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    fn types() -> ColumnTypes {
        [("id", "int8"), ("term", "varchar"), ("updated_at", "timestamptz")].into_iter()
                                                                             .map(|(c, t)| (c.to_string(), t.to_string()))
                                                                             .collect()
    }

    #[test]
    fn find_uses_casts_and_is_null() {
        let t = types();
        let filter = vec![("term".to_string(), json!("API")), ("definition".to_string(), Value::Null)];
        let stmt = find_statement(&TERM, &filter, Some(&t)).unwrap();
        assert_eq!(stmt.sql,
                   "SELECT CAST(\"id\" AS BIGINT) AS id FROM \"glossary_terms\" \
                    WHERE \"term\" = CAST($1 AS \"varchar\") AND \"definition\" IS NULL LIMIT 2");
        assert_eq!(stmt.binds, vec![json!("API")]);
    }

    #[test]
    fn find_rejects_composite_values() {
        let filter = vec![("term".to_string(), json!(["a"]))];
        assert!(matches!(find_statement(&TERM, &filter, None),
                         Err(SessionError::UnsupportedValue { .. })));
    }

    #[test]
    fn insert_binds_values_and_inlines_null() {
        let stmt = insert_statement(&TERM, &row(json!({"term": "API", "definition": null})), None);
        assert_eq!(stmt.sql, "INSERT INTO \"glossary_terms\" (\"definition\", \"term\") VALUES (NULL, $1)");
        assert_eq!(stmt.binds, vec![json!("API")]);
        let empty = insert_statement(&TERM, &Row::new(), None);
        assert_eq!(empty.sql, "INSERT INTO \"glossary_terms\" DEFAULT VALUES");
    }

    #[test]
    fn update_touches_timestamp_unless_given() {
        let t = types();
        let stmt = update_statement(&TERM, 7, &row(json!({"definition": "d"})), Some(&t)).unwrap();
        assert_eq!(stmt.sql,
                   "UPDATE \"glossary_terms\" SET \"definition\" = $1, \"updated_at\" = now() \
                    WHERE \"id\" = CAST($2 AS \"int8\")");
        assert_eq!(stmt.binds, vec![json!("d"), json!(7)]);

        let explicit = update_statement(&TERM, 7, &row(json!({"updated_at": "2024-01-01T00:00:00Z"})), Some(&t)).unwrap();
        assert!(!explicit.sql.contains("now()"));
    }

    #[test]
    fn update_without_assignments_is_skipped() {
        let plain = EntityDescriptor::new("Tag", "tags", &["id", "label"]);
        assert!(update_statement(&plain, 1, &Row::new(), None).is_none());
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
