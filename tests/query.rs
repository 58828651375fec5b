use condo_store::{Error, Filters, RecordStore, RecordStoreHandle};
use serde_json::{json, Value};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("condo_store_test_{}.json", name))
}

fn empty_store(path: &std::path::Path) -> RecordStoreHandle {
    RecordStore::builder(path)
        .collections(["moradores"])
        .build()
        .unwrap()
}

fn filters(value: Value) -> Filters {
    match value {
        Value::Object(map) => map,
        _ => panic!("filters must be a JSON object"),
    }
}

// ---- filtering --------------------------------------------------------------

#[test]
fn textual_filter_is_case_insensitive_substring() {
    let path = temp_path("filter_text");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    db.create("moradores", json!({ "nome": "João Silva" })).unwrap();
    db.create("moradores", json!({ "nome": "Maria" })).unwrap();

    let hits = db.read("moradores", &filters(json!({ "nome": "jo" }))).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].get("nome"), Some(&json!("João Silva")));

    // the whole stringified value is searched, not just the prefix
    let hits = db.read("moradores", &filters(json!({ "nome": "SILVA" }))).unwrap();
    assert_eq!(hits.len(), 1);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn non_string_filters_use_strict_equality() {
    let path = temp_path("filter_strict");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    db.create("moradores", json!({ "nome": "Ana", "ativo": true, "vagas": 2 }))
        .unwrap();
    db.create("moradores", json!({ "nome": "Bruno", "ativo": false, "vagas": 1 }))
        .unwrap();

    let active = db.read("moradores", &filters(json!({ "ativo": true }))).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].get("nome"), Some(&json!("Ana")));

    let two_spots = db.read("moradores", &filters(json!({ "vagas": 2 }))).unwrap();
    assert_eq!(two_spots.len(), 1);
    assert_eq!(two_spots[0].get("nome"), Some(&json!("Ana")));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_or_null_field_never_matches() {
    let path = temp_path("filter_missing");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    db.create("moradores", json!({ "nome": "Ana" })).unwrap();
    db.create("moradores", json!({ "nome": "Bruno", "bloco": null })).unwrap();
    db.create("moradores", json!({ "nome": "Carla", "bloco": "A" })).unwrap();

    let hits = db.read("moradores", &filters(json!({ "bloco": "a" }))).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].get("nome"), Some(&json!("Carla")));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn every_filter_pair_must_match() {
    let path = temp_path("filter_and");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    db.create("moradores", json!({ "nome": "Ana", "bloco": "A", "ativo": true }))
        .unwrap();
    db.create("moradores", json!({ "nome": "Aldo", "bloco": "B", "ativo": true }))
        .unwrap();

    let hits = db
        .read("moradores", &filters(json!({ "nome": "a", "bloco": "A" })))
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].get("nome"), Some(&json!("Ana")));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn empty_filters_return_everything() {
    let path = temp_path("filter_empty");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    for i in 0..4 {
        db.create("moradores", json!({ "n": i })).unwrap();
    }
    assert_eq!(db.read("moradores", &Filters::new()).unwrap().len(), 4);
    let _ = std::fs::remove_file(&path);
}

// ---- find_by_field / count --------------------------------------------------

#[test]
fn find_by_field_matches_like_a_single_filter() {
    let path = temp_path("find_by_field");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    db.create("moradores", json!({ "nome": "João Silva" })).unwrap();
    db.create("moradores", json!({ "nome": "Maria" })).unwrap();

    let hits = db.find_by_field("moradores", "nome", &json!("silva")).unwrap();
    assert_eq!(hits.len(), 1);

    let none = db.find_by_field("moradores", "nome", &json!("zeta")).unwrap();
    assert!(none.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn count_applies_filters() {
    let path = temp_path("count");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    db.create("moradores", json!({ "bloco": "A" })).unwrap();
    db.create("moradores", json!({ "bloco": "A" })).unwrap();
    db.create("moradores", json!({ "bloco": "B" })).unwrap();

    assert_eq!(db.count("moradores", &Filters::new()).unwrap(), 3);
    assert_eq!(db.count("moradores", &filters(json!({ "bloco": "A" }))).unwrap(), 2);
    let _ = std::fs::remove_file(&path);
}

// ---- pagination -------------------------------------------------------------

#[test]
fn middle_page_slices_and_reports_neighbours() {
    let path = temp_path("page_middle");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    for i in 1..=5 {
        db.create("moradores", json!({ "n": i })).unwrap();
    }
    let page = db.read_paginated("moradores", 2, 2, &Filters::new()).unwrap();
    let ids: Vec<_> = page.records.iter().map(|r| r.id().unwrap()).collect();
    assert_eq!(ids, vec![3, 4]);
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.total_pages, 3);
    assert!(page.pagination.has_next);
    assert!(page.pagination.has_prev);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn last_page_is_short_and_pages_beyond_are_empty() {
    let path = temp_path("page_last");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    for i in 1..=5 {
        db.create("moradores", json!({ "n": i })).unwrap();
    }
    let last = db.read_paginated("moradores", 3, 2, &Filters::new()).unwrap();
    assert_eq!(last.records.len(), 1);
    assert!(!last.pagination.has_next);
    assert!(last.pagination.has_prev);

    let beyond = db.read_paginated("moradores", 4, 2, &Filters::new()).unwrap();
    assert!(beyond.records.is_empty());
    // hasPrev is just `page > 1`, never re-checked against the upper bound
    assert!(beyond.pagination.has_prev);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn pagination_applies_filters_before_slicing() {
    let path = temp_path("page_filtered");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    for i in 1..=6 {
        let bloco = if i % 2 == 0 { "A" } else { "B" };
        db.create("moradores", json!({ "n": i, "bloco": bloco })).unwrap();
    }
    let page = db
        .read_paginated("moradores", 1, 2, &filters(json!({ "bloco": "A" })))
        .unwrap();
    let ids: Vec<_> = page.records.iter().map(|r| r.id().unwrap()).collect();
    assert_eq!(ids, vec![2, 4]);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn zero_page_or_limit_is_rejected() {
    let path = temp_path("page_zero");
    let _ = std::fs::remove_file(&path);
    let db = empty_store(&path);

    assert!(matches!(
        db.read_paginated("moradores", 0, 10, &Filters::new()),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        db.read_paginated("moradores", 1, 0, &Filters::new()),
        Err(Error::Config(_))
    ));
    let _ = std::fs::remove_file(&path);
}
