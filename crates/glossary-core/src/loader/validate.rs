use log::error;

use crate::fixture::Row;
use crate::registry::EntityDescriptor;

/// Valida el lote completo antes de escribir nada.
///
/// Rechaza el lote si está vacío, si alguna fila no trae todos los
/// `unique_fields` o si alguna fila trae un campo que no es columna ni
/// relación de `entity`. Todo o nada: una fila inválida invalida el archivo.
pub fn validate_rows(entity: &EntityDescriptor, rows: &[Row], unique_fields: &[String]) -> bool {
    if rows.is_empty() {
        error!("No data rows for model {}", entity.name());
        return false;
    }
    for row in rows {
        let missing: Vec<&str> = unique_fields.iter()
                                              .map(String::as_str)
                                              .filter(|f| !row.contains_key(*f))
                                              .collect();
        if !missing.is_empty() {
            error!("Missing required fields {missing:?} in record: {}", serde_json::Value::Object(row.clone()));
            return false;
        }
        let invalid: Vec<&str> = row.keys()
                                    .map(String::as_str)
                                    .filter(|f| !entity.is_known_field(f))
                                    .collect();
        if !invalid.is_empty() {
            error!("Invalid fields {invalid:?} for model {}", entity.name());
            return false;
        }
    }
    true
}
