//! Validadores de payloads del glosario.
//!
//! Los errores se acumulan por campo y se reportan juntos. La unicidad se
//! consulta al repositorio; en una actualización se ignora la propia fila.
use crate::error::{DomainError, DomainResult, FieldErrors};
use crate::repository::GlossaryRepository;
use crate::term::{GlossaryTermPatch, NewGlossaryTerm, TERM_MAX_LEN};

fn push(errors: &mut FieldErrors, field: &str, msg: String) {
    errors.entry(field.to_string()).or_default().push(msg);
}

fn check_term<R: GlossaryRepository + ?Sized>(repo: &R,
                                               term: &str,
                                               current_id: Option<i64>,
                                               errors: &mut FieldErrors)
                                               -> DomainResult<()> {
    if term.trim().is_empty() {
        push(errors, "term", "Term is required".into());
        return Ok(());
    }
    if term.chars().count() > TERM_MAX_LEN {
        push(errors, "term", format!("Term must be at most {TERM_MAX_LEN} characters"));
    }
    if let Some(existing) = repo.get_by_term(term)? {
        if Some(existing.id) != current_id {
            push(errors, "term", format!("Glossary term with term '{term}' already exists"));
        }
    }
    Ok(())
}

/// Sólo la cadena vacía se rechaza; los espacios cuentan como contenido.
fn check_definition(definition: &str, errors: &mut FieldErrors) {
    if definition.is_empty() {
        push(errors, "definition", "Definition is required".into());
    }
}

fn finish(errors: FieldErrors) -> DomainResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors))
    }
}

pub fn validate_create<R: GlossaryRepository + ?Sized>(repo: &R, payload: &NewGlossaryTerm) -> DomainResult<()> {
    let mut errors = FieldErrors::new();
    check_term(repo, &payload.term, None, &mut errors)?;
    check_definition(&payload.definition, &mut errors);
    finish(errors)
}

/// Valida sólo los campos presentes en el patch.
pub fn validate_update<R: GlossaryRepository + ?Sized>(repo: &R, id: i64, patch: &GlossaryTermPatch) -> DomainResult<()> {
    let mut errors = FieldErrors::new();
    if let Some(term) = &patch.term {
        check_term(repo, term, Some(id), &mut errors)?;
    }
    if let Some(definition) = &patch.definition {
        check_definition(definition, &mut errors);
    }
    finish(errors)
}
