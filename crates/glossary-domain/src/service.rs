//! Casos de uso del glosario sobre un `GlossaryRepository`.
use log::{debug, info};

use crate::error::{DomainError, DomainResult};
use crate::page::{Page, PageRequest};
use crate::repository::GlossaryRepository;
use crate::term::{GlossaryTerm, GlossaryTermPatch, NewGlossaryTerm};
use crate::validators::{validate_create, validate_update};

pub struct GlossaryService<R: GlossaryRepository> {
    repo: R,
}

impl<R: GlossaryRepository> GlossaryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    pub fn list(&self, limit: i64, offset: i64) -> DomainResult<Page<GlossaryTerm>> {
        let page = PageRequest::new(limit, offset)?;
        let items = self.repo.list(page)?;
        let total = self.repo.count()?;
        debug!("list glossary terms limit={limit} offset={offset} -> {} of {total}", items.len());
        Ok(Page::new(items, total, page.limit()))
    }

    pub fn search(&self, query: &str, limit: i64, offset: i64) -> DomainResult<Page<GlossaryTerm>> {
        let page = PageRequest::new(limit, offset)?;
        let items = self.repo.search(query, page)?;
        let total = self.repo.count_search(query)?;
        debug!("search glossary terms '{query}' -> {} of {total}", items.len());
        Ok(Page::new(items, total, page.limit()))
    }

    pub fn get(&self, id: i64) -> DomainResult<GlossaryTerm> {
        self.repo.get(id)?.ok_or_else(|| DomainError::term_not_found(id))
    }

    pub fn create(&mut self, payload: NewGlossaryTerm) -> DomainResult<GlossaryTerm> {
        validate_create(&self.repo, &payload)?;
        let created = self.repo.create(&payload)?;
        info!("created glossary term {created}");
        Ok(created)
    }

    pub fn update(&mut self, id: i64, patch: GlossaryTermPatch) -> DomainResult<GlossaryTerm> {
        self.get(id)?;
        validate_update(&self.repo, id, &patch)?;
        let updated = self.repo
                          .update(id, &patch)?
                          .ok_or_else(|| DomainError::term_not_found(id))?;
        info!("updated glossary term {updated}");
        Ok(updated)
    }

    pub fn delete(&mut self, id: i64) -> DomainResult<GlossaryTerm> {
        let deleted = self.repo.delete(id)?.ok_or_else(|| DomainError::term_not_found(id))?;
        info!("deleted glossary term {deleted}");
        Ok(deleted)
    }
}
