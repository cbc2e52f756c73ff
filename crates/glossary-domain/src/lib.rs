// glossary-domain library entry point
pub mod error;
pub mod page;
pub mod repository;
pub mod service;
pub mod term;
pub mod validators;

pub use error::{DomainError, DomainResult, FieldErrors};
pub use page::{Page, PageRequest, DEFAULT_PAGE_LIMIT};
pub use repository::{GlossaryRepository, InMemoryGlossaryRepository};
pub use service::GlossaryService;
pub use term::{GlossaryTerm, GlossaryTermPatch, NewGlossaryTerm, TERM_MAX_LEN};
