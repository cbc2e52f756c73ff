//! Descriptor tipado de una entidad persistente.
//!
//! Reemplaza la búsqueda dinámica de clases por nombre: cada entidad que
//! puede cargarse desde fixtures se registra explícitamente con su tabla, sus
//! columnas, sus relaciones y un constructor de filas.
use serde_json::Value;

use crate::fixture::Row;

/// Firma del constructor: valida/normaliza una fila de fixture y devuelve los
/// valores de columna a insertar.
pub type RowConstructor = fn(&Row) -> Result<Row, String>;

/// Entidad que sabe construirse desde una fila de fixture.
///
/// Implementar este trait y registrar `EntityDescriptor::of::<T>()` en un
/// `Namespace` es todo lo que hace falta para que el cargador la reconozca.
pub trait FixtureEntity: Sized {
    /// Nombre del modelo tal como aparece en el campo `model` del fixture.
    const NAME: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const RELATIONS: &'static [&'static str] = &[];
    /// Columnas NOT NULL sin default: el backend rechaza el commit si faltan.
    const REQUIRED: &'static [&'static str] = &[];
    /// Columna de timestamp que se refresca en cada update, si existe.
    const TOUCH_ON_UPDATE: Option<&'static str> = None;

    fn from_fixture_row(row: &Row) -> Result<Self, String>;
    fn into_columns(self) -> Row;
}

fn construct_via<T: FixtureEntity>(row: &Row) -> Result<Row, String> {
    T::from_fixture_row(row).map(T::into_columns)
}

fn passthrough(row: &Row) -> Result<Row, String> {
    Ok(row.clone())
}

#[derive(Clone, Copy)]
pub struct EntityDescriptor {
    name: &'static str,
    table: &'static str,
    columns: &'static [&'static str],
    relations: &'static [&'static str],
    required: &'static [&'static str],
    touch_on_update: Option<&'static str>,
    construct: RowConstructor,
}

impl EntityDescriptor {
    /// Descriptor sin constructor tipado (las filas se insertan tal cual).
    pub const fn new(name: &'static str, table: &'static str, columns: &'static [&'static str]) -> Self {
        Self { name,
               table,
               columns,
               relations: &[],
               required: &[],
               touch_on_update: None,
               construct: passthrough }
    }

    pub fn of<T: FixtureEntity>() -> Self {
        Self { name: T::NAME,
               table: T::TABLE,
               columns: T::COLUMNS,
               relations: T::RELATIONS,
               required: T::REQUIRED,
               touch_on_update: T::TOUCH_ON_UPDATE,
               construct: construct_via::<T> }
    }

    pub const fn with_relations(mut self, relations: &'static [&'static str]) -> Self {
        self.relations = relations;
        self
    }

    pub const fn with_required(mut self, required: &'static [&'static str]) -> Self {
        self.required = required;
        self
    }

    pub const fn with_touch_on_update(mut self, column: &'static str) -> Self {
        self.touch_on_update = Some(column);
        self
    }

    pub const fn with_constructor(mut self, construct: RowConstructor) -> Self {
        self.construct = construct;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn relations(&self) -> &'static [&'static str] {
        self.relations
    }

    pub fn touch_on_update(&self) -> Option<&'static str> {
        self.touch_on_update
    }

    pub fn is_column(&self, field: &str) -> bool {
        self.columns.contains(&field)
    }

    /// Campo conocido: columna o relación.
    pub fn is_known_field(&self, field: &str) -> bool {
        self.is_column(field) || self.relations.contains(&field)
    }

    pub fn construct(&self, row: &Row) -> Result<Row, String> {
        (self.construct)(row)
    }

    /// Columnas obligatorias ausentes o nulas en `values`.
    pub fn missing_required(&self, values: &Row) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|c| values.get(*c).map_or(true, Value::is_null))
            .collect()
    }
}

impl PartialEq for EntityDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.table == other.table
    }
}

impl std::fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDescriptor")
         .field("name", &self.name)
         .field("table", &self.table)
         .field("columns", &self.columns)
         .field("relations", &self.relations)
         .finish()
    }
}
