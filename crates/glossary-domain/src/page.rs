use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, FieldErrors};

pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Envoltura de una página de resultados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page_size: i64) -> Self {
        Self { items,
               total,
               page_size }
    }
}

/// Ventana `limit`/`offset` ya validada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    offset: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { limit: DEFAULT_PAGE_LIMIT,
               offset: 0 }
    }
}

impl PageRequest {
    /// `limit >= 1`, `offset >= 0`.
    pub fn new(limit: i64, offset: i64) -> DomainResult<Self> {
        let mut errors = FieldErrors::new();
        if limit < 1 {
            errors.entry("limit".into())
                  .or_default()
                  .push("limit must be greater than or equal to 1".into());
        }
        if offset < 0 {
            errors.entry("offset".into())
                  .or_default()
                  .push("offset must be greater than or equal to 0".into());
        }
        if errors.is_empty() {
            Ok(Self { limit, offset })
        } else {
            Err(DomainError::Validation(errors))
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Aplica la ventana sobre un iterador ya ordenado.
    pub fn slice<T, I: IntoIterator<Item = T>>(&self, items: I) -> Vec<T> {
        items.into_iter()
             .skip(self.offset as usize)
             .take(self.limit as usize)
             .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_window() {
        let err = PageRequest::new(0, -1).unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains_key("limit"));
        assert!(fields.contains_key("offset"));
    }

    #[test]
    fn slice_applies_offset_then_limit() {
        let req = PageRequest::new(2, 1).unwrap();
        assert_eq!(req.slice(1..=5), vec![2, 3]);
        assert_eq!(PageRequest::default().limit(), 50);
    }
}
