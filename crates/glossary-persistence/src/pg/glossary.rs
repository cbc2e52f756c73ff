use chrono::Utc;
use diesel::prelude::*;
use glossary_domain::{DomainResult, GlossaryRepository, GlossaryTerm, GlossaryTermPatch, NewGlossaryTerm, PageRequest};
use log::debug;

use super::{with_retry, ConnectionProvider};
use crate::error::PersistenceError;
use crate::models::{GlossaryTermChangeset, GlossaryTermRow, NewGlossaryTermRow};
use crate::schema::glossary_terms;

/// Repositorio de términos sobre Postgres. Las lecturas reintentan errores
/// transitorios; las escrituras no.
pub struct PgGlossaryRepository<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> PgGlossaryRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

/// Patrón ILIKE de subcadena con `%`, `_` y `\` escapados.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl<P: ConnectionProvider> GlossaryRepository for PgGlossaryRepository<P> {
    fn get(&self, id: i64) -> DomainResult<Option<GlossaryTerm>> {
        let row = with_retry(|| {
                      let mut conn = self.provider.connection()?;
                      glossary_terms::table.find(id)
                                           .first::<GlossaryTermRow>(&mut conn)
                                           .optional()
                                           .map_err(PersistenceError::from)
                  })?;
        Ok(row.map(GlossaryTerm::from))
    }

    fn get_by_term(&self, term: &str) -> DomainResult<Option<GlossaryTerm>> {
        let row = with_retry(|| {
                      let mut conn = self.provider.connection()?;
                      glossary_terms::table.filter(glossary_terms::term.eq(term))
                                           .order(glossary_terms::id.asc())
                                           .first::<GlossaryTermRow>(&mut conn)
                                           .optional()
                                           .map_err(PersistenceError::from)
                  })?;
        Ok(row.map(GlossaryTerm::from))
    }

    fn list(&self, page: PageRequest) -> DomainResult<Vec<GlossaryTerm>> {
        let rows = with_retry(|| {
                       let mut conn = self.provider.connection()?;
                       glossary_terms::table.order(glossary_terms::id.asc())
                                            .limit(page.limit())
                                            .offset(page.offset())
                                            .load::<GlossaryTermRow>(&mut conn)
                                            .map_err(PersistenceError::from)
                   })?;
        Ok(rows.into_iter().map(GlossaryTerm::from).collect())
    }

    fn count(&self) -> DomainResult<i64> {
        Ok(with_retry(|| {
               let mut conn = self.provider.connection()?;
               glossary_terms::table.count()
                                    .get_result::<i64>(&mut conn)
                                    .map_err(PersistenceError::from)
           })?)
    }

    fn search(&self, query: &str, page: PageRequest) -> DomainResult<Vec<GlossaryTerm>> {
        let pattern = like_pattern(query);
        let rows = with_retry(|| {
                       let mut conn = self.provider.connection()?;
                       glossary_terms::table.filter(glossary_terms::term.ilike(pattern.as_str())
                                                                        .or(glossary_terms::definition.ilike(pattern.as_str())))
                                            .order(glossary_terms::id.asc())
                                            .limit(page.limit())
                                            .offset(page.offset())
                                            .load::<GlossaryTermRow>(&mut conn)
                                            .map_err(PersistenceError::from)
                   })?;
        Ok(rows.into_iter().map(GlossaryTerm::from).collect())
    }

    fn count_search(&self, query: &str) -> DomainResult<i64> {
        let pattern = like_pattern(query);
        Ok(with_retry(|| {
               let mut conn = self.provider.connection()?;
               glossary_terms::table.filter(glossary_terms::term.ilike(pattern.as_str())
                                                                .or(glossary_terms::definition.ilike(pattern.as_str())))
                                    .count()
                                    .get_result::<i64>(&mut conn)
                                    .map_err(PersistenceError::from)
           })?)
    }

    fn create(&mut self, payload: &NewGlossaryTerm) -> DomainResult<GlossaryTerm> {
        let mut conn = self.provider.connection()?;
        let row = diesel::insert_into(glossary_terms::table).values(&NewGlossaryTermRow { term: &payload.term,
                                                                                          definition:
                                                                                              &payload.definition })
                                                            .get_result::<GlossaryTermRow>(&mut conn)
                                                            .map_err(PersistenceError::from)?;
        debug!("inserted glossary_terms id={}", row.id);
        Ok(row.into())
    }

    fn update(&mut self, id: i64, patch: &GlossaryTermPatch) -> DomainResult<Option<GlossaryTerm>> {
        let mut conn = self.provider.connection()?;
        let changes = GlossaryTermChangeset { term: patch.term.as_deref(),
                                              definition: patch.definition.as_deref(),
                                              updated_at: Utc::now() };
        let row = diesel::update(glossary_terms::table.find(id)).set(&changes)
                                                                .get_result::<GlossaryTermRow>(&mut conn)
                                                                .optional()
                                                                .map_err(PersistenceError::from)?;
        Ok(row.map(GlossaryTerm::from))
    }

    fn delete(&mut self, id: i64) -> DomainResult<Option<GlossaryTerm>> {
        let mut conn = self.provider.connection()?;
        let row = diesel::delete(glossary_terms::table.find(id)).get_result::<GlossaryTermRow>(&mut conn)
                                                                .optional()
                                                                .map_err(PersistenceError::from)?;
        Ok(row.map(GlossaryTerm::from))
    }
}
