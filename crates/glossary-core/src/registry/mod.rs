//! Registro de modelos: nombre -> `EntityDescriptor`.
//!
//! `Namespace` es la tabla de registro explícita (se arma al arranque).
//! `ModelRegistry` resuelve nombres contra ese namespace y cachea las
//! resoluciones exitosas mientras viva la corrida de carga que lo posee.
pub mod descriptor;

use std::collections::HashMap;

use log::{debug, error};

pub use descriptor::{EntityDescriptor, FixtureEntity, RowConstructor};

/// Conjunto de entidades registrables, identificado por un nombre lógico.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    name: String,
    entities: Vec<EntityDescriptor>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               entities: Vec::new() }
    }

    /// Registra (o reemplaza) una entidad por nombre.
    pub fn register(mut self, descriptor: EntityDescriptor) -> Self {
        self.entities.retain(|d| d.name() != descriptor.name());
        self.entities.push(descriptor);
        self
    }

    pub fn register_entity<T: FixtureEntity>(self) -> Self {
        self.register(EntityDescriptor::of::<T>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lookup(&self, model: &str) -> Option<EntityDescriptor> {
        self.entities.iter().find(|d| d.name() == model).copied()
    }

    pub fn entity_names(&self) -> Vec<&'static str> {
        self.entities.iter().map(|d| d.name()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ModelRegistry {
    namespace: Namespace,
    cache: HashMap<String, EntityDescriptor>,
}

impl ModelRegistry {
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace,
               cache: HashMap::new() }
    }

    /// Resuelve `model`; `None` (con log de error) si no está registrado.
    pub fn resolve(&mut self, model: &str) -> Option<EntityDescriptor> {
        if let Some(d) = self.cache.get(model) {
            return Some(*d);
        }
        match self.namespace.lookup(model) {
            Some(d) => {
                debug!("model {model} resolved in namespace {}", self.namespace.name());
                self.cache.insert(model.to_string(), d);
                Some(d)
            }
            None => {
                error!("Model {model} not found in namespace {}", self.namespace.name());
                None
            }
        }
    }

    /// Olvida las resoluciones previas; se llama al empezar cada corrida.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn is_cached(&self, model: &str) -> bool {
        self.cache.contains_key(model)
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namespace() -> Namespace {
        Namespace::new("test.models").register(EntityDescriptor::new("Note", "notes", &["id", "body"]))
    }

    #[test]
    fn resolves_registered_model_and_caches_it() {
        let mut registry = ModelRegistry::new(namespace());
        assert!(!registry.is_cached("Note"));
        let d = registry.resolve("Note").expect("registered");
        assert_eq!(d.table(), "notes");
        assert!(registry.is_cached("Note"));
        assert_eq!(registry.resolve("Note").map(|d| d.name()), Some("Note"));
    }

    #[test]
    fn clear_cache_forgets_resolutions() {
        let mut registry = ModelRegistry::new(namespace());
        registry.resolve("Note");
        registry.clear_cache();
        assert!(!registry.is_cached("Note"));
        assert!(registry.resolve("Note").is_some());
    }

    #[test]
    fn unknown_model_is_not_found_and_not_cached() {
        let mut registry = ModelRegistry::new(namespace());
        assert!(registry.resolve("Ghost").is_none());
        assert!(!registry.is_cached("Ghost"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut registry = ModelRegistry::new(namespace());
        assert!(registry.resolve("note").is_none());
    }

    #[test]
    fn register_replaces_same_name() {
        let ns = namespace().register(EntityDescriptor::new("Note", "notes_v2", &["id"]));
        assert_eq!(ns.entity_names(), vec!["Note"]);
        assert_eq!(ns.lookup("Note").map(|d| d.table()), Some("notes_v2"));
    }
}
