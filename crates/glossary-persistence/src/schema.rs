//! Esquema Diesel. Reemplazable con `diesel print-schema`.

diesel::table! {
    glossary_terms (id) {
        id -> BigInt,
        term -> Varchar,
        definition -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
