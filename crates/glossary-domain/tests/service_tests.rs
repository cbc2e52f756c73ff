use glossary_domain::{DomainError, GlossaryService, GlossaryTermPatch, InMemoryGlossaryRepository, NewGlossaryTerm};

fn seeded() -> GlossaryService<InMemoryGlossaryRepository> {
    let mut svc = GlossaryService::new(InMemoryGlossaryRepository::new());
    svc.create(NewGlossaryTerm::new("API", "Application Programming Interface")).unwrap();
    svc.create(NewGlossaryTerm::new("SDK", "Software Development Kit")).unwrap();
    svc.create(NewGlossaryTerm::new("CLI", "Command line interface")).unwrap();
    svc
}

#[test]
fn test_list_pages_by_id() {
    let svc = seeded();
    let page = svc.list(2, 1).unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.page_size, 2);
    let terms: Vec<&str> = page.items.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["SDK", "CLI"]);
}

#[test]
fn test_list_rejects_invalid_window() {
    let svc = seeded();
    let err = svc.list(0, 0).unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(svc.list(10, -1).is_err());
}

#[test]
fn test_search_is_case_insensitive_over_term_and_definition() {
    let svc = seeded();
    let page = svc.search("INTERFACE", 50, 0).unwrap();
    assert_eq!(page.total, 2);
    let terms: Vec<&str> = page.items.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["API", "CLI"]);

    let by_term = svc.search("sd", 50, 0).unwrap();
    assert_eq!(by_term.items.len(), 1);
    assert_eq!(by_term.items[0].term, "SDK");
}

#[test]
fn test_get_missing_is_not_found() {
    let svc = seeded();
    let err = svc.get(42).unwrap_err();
    assert_eq!(err, DomainError::NotFound("Glossary term with id 42 not found".into()));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_create_duplicate_reports_field_error() {
    let mut svc = seeded();
    let err = svc.create(NewGlossaryTerm::new("API", "again")).unwrap_err();
    let fields = err.field_errors().expect("validation error");
    assert_eq!(fields["term"], vec!["Glossary term with term 'API' already exists".to_string()]);
    assert_eq!(svc.list(50, 0).unwrap().total, 3);
}

#[test]
fn test_empty_patch_only_touches_updated_at() {
    let mut svc = seeded();
    let before = svc.get(1).unwrap();
    let after = svc.update(1, GlossaryTermPatch::default()).unwrap();
    assert_eq!((after.id, &after.term, &after.definition), (before.id, &before.term, &before.definition));
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
}

#[test]
fn test_update_applies_present_fields() {
    let mut svc = seeded();
    let patch = GlossaryTermPatch { term: None,
                                    definition: Some("Interfaz de programación".into()) };
    let updated = svc.update(1, patch).unwrap();
    assert_eq!(updated.term, "API");
    assert_eq!(updated.definition, "Interfaz de programación");

    let clash = GlossaryTermPatch { term: Some("SDK".into()),
                                    definition: None };
    assert!(svc.update(1, clash).unwrap_err().field_errors().is_some());
    assert_eq!(svc.update(99, GlossaryTermPatch::default()).unwrap_err().status_code(), 404);
}

#[test]
fn test_delete_returns_row_then_not_found() {
    let mut svc = seeded();
    let deleted = svc.delete(2).unwrap();
    assert_eq!(deleted.term, "SDK");
    assert_eq!(svc.get(2).unwrap_err().status_code(), 404);
    assert_eq!(svc.delete(2).unwrap_err().status_code(), 404);
    assert_eq!(svc.list(50, 0).unwrap().total, 2);
}
