//! Repositorio de términos sobre Postgres (requiere DATABASE_URL).


use glossary_domain::{GlossaryService, GlossaryTermPatch, NewGlossaryTerm};
use glossary_persistence::PgGlossaryRepository;
use test_support::{unique, with_provider};

#[test]
fn crud_roundtrip_through_service() {
    with_provider(|provider| {
        let mut svc = GlossaryService::new(PgGlossaryRepository::new(provider));
        let term = unique("API");
        let created = svc.create(NewGlossaryTerm::new(term.clone(), "Application Programming Interface"))
                         .expect("create");
        assert_eq!(svc.get(created.id).expect("get").term, term);

        let dup = svc.create(NewGlossaryTerm::new(term.clone(), "again")).unwrap_err();
        assert!(dup.field_errors().expect("validation")["term"][0].contains("already exists"));

        let patch = GlossaryTermPatch { term: None,
                                        definition: Some("Interfaz".into()) };
        let updated = svc.update(created.id, patch).expect("update");
        assert_eq!(updated.definition, "Interfaz");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let deleted = svc.delete(created.id).expect("delete");
        assert_eq!(deleted.id, created.id);
        assert_eq!(svc.get(created.id).unwrap_err().status_code(), 404);
    });
}

#[test]
fn search_is_case_insensitive_and_counts_matches() {
    with_provider(|provider| {
        let mut svc = GlossaryService::new(PgGlossaryRepository::new(provider));
        let marker = unique("zq");
        let a = svc.create(NewGlossaryTerm::new(format!("{marker}-one"), "first")).expect("create");
        let b = svc.create(NewGlossaryTerm::new("other".to_string() + &marker, format!("mentions {}", marker.to_uppercase())))
                   .expect("create");

        let page = svc.search(&marker.to_uppercase(), 1, 0).expect("search");
        assert_eq!(page.total, 2);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, a.id);

        assert_eq!(svc.search("%", 50, 0).expect("search").items.iter().filter(|t| t.id == a.id).count(), 0);

        svc.delete(a.id).expect("delete");
        svc.delete(b.id).expect("delete");
    });
}
