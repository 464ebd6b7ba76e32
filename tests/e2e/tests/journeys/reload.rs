//! Reload Journeys
//!
//! A user edits the spec directory while apiseek is running: files are
//! added, broken, removed, and the index is rebuilt on request.

use std::sync::Arc;

use apiseek_cli::reload;
use apiseek_core::{ConfigSource, SearchEngine, SearchOptions};
use apiseek_e2e_tests::{fixtures, SpecDir};

async fn top_path(engine: &SearchEngine, query: &str) -> Option<String> {
    engine
        .search(query, SearchOptions::default())
        .await
        .expect("search succeeds")
        .first()
        .map(|c| c.path.clone())
}

#[tokio::test]
async fn test_added_document_becomes_searchable() {
    let dir = SpecDir::with_documents([("todo", fixtures::todo_document())]).unwrap();
    let (engine, summary) = dir.engine(ConfigSource::default()).unwrap();
    assert_eq!(summary.loaded, vec!["todo"]);
    assert_eq!(top_path(&engine, "vaccination date").await, None);

    dir.write("petstore", &fixtures::petstore_document()).unwrap();
    let summary = reload(&engine, dir.path()).unwrap();
    assert_eq!(summary.loaded, vec!["petstore", "todo"]);
    assert_eq!(summary.operations, 6);

    assert_eq!(top_path(&engine, "vaccination date").await.as_deref(), Some("/pets"));
}

#[tokio::test]
async fn test_removed_document_disappears() {
    let dir = SpecDir::with_documents([
        ("petstore", fixtures::petstore_document()),
        ("todo", fixtures::todo_document()),
    ])
    .unwrap();
    let (engine, _) = dir.engine(ConfigSource::default()).unwrap();
    assert!(top_path(&engine, "delete a pet").await.is_some());

    dir.remove("petstore").unwrap();
    reload(&engine, dir.path()).unwrap();

    let results = engine
        .search("delete a pet", SearchOptions::default())
        .await
        .unwrap();
    assert!(results.iter().all(|c| c.spec_name == "todo"));
    assert!(engine.lookup("DELETE", "/pets/{id}").unwrap().is_empty());
}

#[tokio::test]
async fn test_broken_file_is_skipped_not_fatal() {
    let dir = SpecDir::with_documents([("todo", fixtures::todo_document())]).unwrap();
    dir.write_raw("broken.json", "{ \"paths\": ").unwrap();
    dir.write_raw("README.md", "# not a spec").unwrap();

    let (engine, summary) = dir.engine(ConfigSource::default()).unwrap();
    assert_eq!(summary.loaded, vec!["todo"]);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(top_path(&engine, "create a todo").await.as_deref(), Some("/todos"));
}

#[tokio::test]
async fn test_reset_rebuilds_with_same_answers() {
    let dir = SpecDir::with_documents([("todo", fixtures::todo_document())]).unwrap();
    let (engine, _) = dir.engine(ConfigSource::default()).unwrap();
    let reset = engine.reset_handle();

    let before = engine
        .search("list todos", SearchOptions::default())
        .await
        .unwrap();
    let built_before = engine.stats().await.unwrap().built_at;

    reset.reset();

    let after = engine
        .search("list todos", SearchOptions::default())
        .await
        .unwrap();
    let built_after = engine.stats().await.unwrap().built_at;

    assert_eq!(before, after);
    assert!(built_after >= built_before);
}

#[tokio::test]
async fn test_searches_during_catalog_swaps() {
    let engine = Arc::new(SearchEngine::new(fixtures::todo_catalog()));

    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            if i % 4 == 0 {
                let catalog = if i % 8 == 0 {
                    fixtures::mixed_catalog()
                } else {
                    fixtures::todo_catalog()
                };
                engine.replace_catalog(catalog).unwrap();
            }
            engine
                .search("create a todo", SearchOptions::default())
                .await
                .unwrap()
        }));
    }

    for handle in handles {
        let results = handle.await.unwrap();
        // Both catalogs hold the todo API, so every search sees it
        assert_eq!(results[0].path, "/todos");
        assert_eq!(results[0].method, "POST");
    }
}
