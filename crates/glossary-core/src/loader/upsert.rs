use log::debug;
use serde_json::Value;

use crate::errors::RowError;
use crate::fixture::Row;
use crate::registry::EntityDescriptor;
use crate::session::FixtureSession;

/// Efecto de una fila procesada con éxito.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Updated,
}

/// Filtro de igualdad sobre los `unique_fields`. Todos deben estar en la fila.
fn unique_filter(row: &Row, unique_fields: &[String]) -> Result<Vec<(String, Value)>, RowError> {
    if unique_fields.is_empty() {
        return Err(RowError::NoUniqueFields);
    }
    let missing: Vec<String> = unique_fields.iter().filter(|f| !row.contains_key(f.as_str())).cloned().collect();
    if !missing.is_empty() {
        return Err(RowError::MissingUniqueFields(missing));
    }
    Ok(unique_fields.iter().map(|f| (f.clone(), row[f.as_str()].clone())).collect())
}

fn construct(entity: &EntityDescriptor, row: &Row) -> Result<Row, RowError> {
    entity.construct(row)
          .map_err(|reason| RowError::Construct { entity: entity.name().to_string(),
                                                  reason })
}

/// Upsert de una fila: busca por `unique_fields` y deja en staging un update
/// (sólo columnas conocidas) o un insert (vía el constructor del descriptor).
///
/// El constructor valida la fila en ambos caminos, así un valor mal tipado
/// falla la fila y no el commit del archivo.
///
/// No toca contadores ni hace rollback: eso lo decide el llamador según el
/// `Result`.
pub fn process_row<S: FixtureSession + ?Sized>(session: &mut S,
                                               entity: &EntityDescriptor,
                                               row: &Row,
                                               unique_fields: &[String])
                                               -> Result<RowOutcome, RowError> {
    let filter = unique_filter(row, unique_fields)?;
    match session.find_one(entity, &filter)? {
        Some(key) => {
            construct(entity, row)?;
            let changes: Row = row.iter()
                                  .filter(|(k, _)| entity.is_column(k))
                                  .map(|(k, v)| (k.clone(), v.clone()))
                                  .collect();
            session.stage_update(entity, key, changes)?;
            debug!("Updated existing {} record {key}", entity.name());
            Ok(RowOutcome::Updated)
        }
        None => {
            let values = construct(entity, row)?;
            session.stage_insert(entity, values)?;
            debug!("Created new {} record", entity.name());
            Ok(RowOutcome::Created)
        }
    }
}
