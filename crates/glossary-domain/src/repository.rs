use std::collections::BTreeMap;

use chrono::Utc;

use crate::error::DomainResult;
use crate::page::PageRequest;
use crate::term::{GlossaryTerm, GlossaryTermPatch, NewGlossaryTerm};

/// Almacenamiento de términos. Los listados se ordenan por `id` ascendente.
pub trait GlossaryRepository {
    fn get(&self, id: i64) -> DomainResult<Option<GlossaryTerm>>;
    fn get_by_term(&self, term: &str) -> DomainResult<Option<GlossaryTerm>>;
    fn list(&self, page: PageRequest) -> DomainResult<Vec<GlossaryTerm>>;
    fn count(&self) -> DomainResult<i64>;
    /// Coincidencia parcial, sin distinguir mayúsculas, sobre `term` o `definition`.
    fn search(&self, query: &str, page: PageRequest) -> DomainResult<Vec<GlossaryTerm>>;
    fn count_search(&self, query: &str) -> DomainResult<i64>;
    fn create(&mut self, payload: &NewGlossaryTerm) -> DomainResult<GlossaryTerm>;
    /// Aplica el patch y refresca `updated_at`; `None` si el id no existe.
    fn update(&mut self, id: i64, patch: &GlossaryTermPatch) -> DomainResult<Option<GlossaryTerm>>;
    /// Devuelve la fila eliminada.
    fn delete(&mut self, id: i64) -> DomainResult<Option<GlossaryTerm>>;
}

#[derive(Debug, Default)]
pub struct InMemoryGlossaryRepository {
    inner: BTreeMap<i64, GlossaryTerm>,
    last_id: i64,
}

impl InMemoryGlossaryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a GlossaryTerm> + 'a {
        let needle = query.to_lowercase();
        self.inner
            .values()
            .filter(move |t| t.term.to_lowercase().contains(&needle) || t.definition.to_lowercase().contains(&needle))
    }
}

impl GlossaryRepository for InMemoryGlossaryRepository {
    fn get(&self, id: i64) -> DomainResult<Option<GlossaryTerm>> {
        Ok(self.inner.get(&id).cloned())
    }

    fn get_by_term(&self, term: &str) -> DomainResult<Option<GlossaryTerm>> {
        Ok(self.inner.values().find(|t| t.term == term).cloned())
    }

    fn list(&self, page: PageRequest) -> DomainResult<Vec<GlossaryTerm>> {
        Ok(page.slice(self.inner.values().cloned()))
    }

    fn count(&self) -> DomainResult<i64> {
        Ok(self.inner.len() as i64)
    }

    fn search(&self, query: &str, page: PageRequest) -> DomainResult<Vec<GlossaryTerm>> {
        Ok(page.slice(self.matching(query).cloned()))
    }

    fn count_search(&self, query: &str) -> DomainResult<i64> {
        Ok(self.matching(query).count() as i64)
    }

    fn create(&mut self, payload: &NewGlossaryTerm) -> DomainResult<GlossaryTerm> {
        self.last_id += 1;
        let now = Utc::now();
        let term = GlossaryTerm { id: self.last_id,
                                  term: payload.term.clone(),
                                  definition: payload.definition.clone(),
                                  created_at: now,
                                  updated_at: now };
        self.inner.insert(term.id, term.clone());
        Ok(term)
    }

    fn update(&mut self, id: i64, patch: &GlossaryTermPatch) -> DomainResult<Option<GlossaryTerm>> {
        Ok(self.inner.get_mut(&id).map(|t| {
                                      patch.apply_to(t, Utc::now());
                                      t.clone()
                                  }))
    }

    fn delete(&mut self, id: i64) -> DomainResult<Option<GlossaryTerm>> {
        Ok(self.inner.remove(&id))
    }
}
