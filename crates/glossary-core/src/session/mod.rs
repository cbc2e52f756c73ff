//! Sesión de persistencia consumida por el cargador.
//!
//! Contrato:
//! - `find_one`: búsqueda por igualdad; cero o una fila (más de una es error).
//! - `stage_insert` / `stage_update`: las escrituras quedan en memoria
//!   (`StagedWrites`) hasta `commit`.
//! - `savepoint` / `rollback_to`: descartan sólo lo que haya escrito una fila.
//! - `commit`: aplica atomicamente todo lo pendiente; si falla no aplica nada
//!   y lo pendiente se conserva hasta `rollback`.
//! - `rollback`: descarta todo lo pendiente.
pub mod memory;

use serde_json::Value;

use crate::errors::SessionError;
use crate::fixture::Row;
use crate::registry::EntityDescriptor;

pub use memory::{InMemorySession, StoredEntity};

/// Clave primaria de una entidad persistida.
pub type EntityKey = i64;

/// Marca dentro de la cola de escrituras pendientes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Savepoint(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum StagedWrite {
    Insert { entity: EntityDescriptor, values: Row },
    Update { entity: EntityDescriptor, key: EntityKey, values: Row },
}

/// Cola de escrituras pendientes compartida por las implementaciones.
#[derive(Debug, Clone, Default)]
pub struct StagedWrites {
    writes: Vec<StagedWrite>,
}

impl StagedWrites {
    pub fn push(&mut self, write: StagedWrite) {
        self.writes.push(write);
    }

    pub fn savepoint(&self) -> Savepoint {
        Savepoint(self.writes.len())
    }

    pub fn rollback_to(&mut self, savepoint: Savepoint) {
        self.writes.truncate(savepoint.0);
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StagedWrite> {
        self.writes.iter()
    }
}

pub trait FixtureSession {
    /// Busca la única entidad de `entity` cuyas columnas igualan a `filter`.
    fn find_one(&mut self, entity: &EntityDescriptor, filter: &[(String, Value)]) -> Result<Option<EntityKey>, SessionError>;

    /// Cola de escrituras pendientes de la sesión.
    fn staged(&mut self) -> &mut StagedWrites;

    /// Aplica lo pendiente en una única transacción.
    fn commit(&mut self) -> Result<(), SessionError>;

    fn stage_insert(&mut self, entity: &EntityDescriptor, values: Row) -> Result<(), SessionError> {
        self.staged().push(StagedWrite::Insert { entity: *entity, values });
        Ok(())
    }

    fn stage_update(&mut self, entity: &EntityDescriptor, key: EntityKey, values: Row) -> Result<(), SessionError> {
        self.staged().push(StagedWrite::Update { entity: *entity, key, values });
        Ok(())
    }

    fn savepoint(&mut self) -> Savepoint {
        self.staged().savepoint()
    }

    fn rollback_to(&mut self, savepoint: Savepoint) {
        self.staged().rollback_to(savepoint);
    }

    fn rollback(&mut self) {
        self.staged().clear();
    }
}

impl<S: FixtureSession + ?Sized> FixtureSession for &mut S {
    fn find_one(&mut self, entity: &EntityDescriptor, filter: &[(String, Value)]) -> Result<Option<EntityKey>, SessionError> {
        (**self).find_one(entity, filter)
    }

    fn staged(&mut self) -> &mut StagedWrites {
        (**self).staged()
    }

    fn commit(&mut self) -> Result<(), SessionError> {
        (**self).commit()
    }

    fn stage_insert(&mut self, entity: &EntityDescriptor, values: Row) -> Result<(), SessionError> {
        (**self).stage_insert(entity, values)
    }

    fn stage_update(&mut self, entity: &EntityDescriptor, key: EntityKey, values: Row) -> Result<(), SessionError> {
        (**self).stage_update(entity, key, values)
    }

    fn savepoint(&mut self) -> Savepoint {
        (**self).savepoint()
    }

    fn rollback_to(&mut self, savepoint: Savepoint) {
        (**self).rollback_to(savepoint)
    }

    fn rollback(&mut self) {
        (**self).rollback()
    }
}
