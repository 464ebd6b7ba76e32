//! Search Journeys
//!
//! A user points apiseek at a set of API documents and asks for operations
//! in plain language, by property name, in Japanese, or as `METHOD /path`.

use apiseek_core::{
    parse_direct_query, select_confident, NodeKind, SearchConfig, SearchEngine, SearchOptions,
};
use apiseek_e2e_tests::fixtures;

async fn search(engine: &SearchEngine, query: &str) -> Vec<apiseek_core::Candidate> {
    engine
        .search(query, SearchOptions::default())
        .await
        .expect("search succeeds")
}

// ============================================================================
// PLAIN-LANGUAGE QUERIES
// ============================================================================

#[tokio::test]
async fn test_create_request_finds_post() {
    let engine = SearchEngine::new(fixtures::todo_catalog());

    let results = search(&engine, "create a new todo").await;
    assert_eq!(results[0].method, "POST");
    assert_eq!(results[0].path, "/todos");
    assert_eq!(results[0].spec_name, "todo");
}

#[tokio::test]
async fn test_synonym_request_finds_post() {
    let engine = SearchEngine::new(fixtures::todo_catalog());

    let results = search(&engine, "add todo").await;
    assert_eq!(results[0].method, "POST");
    assert_eq!(results[0].path, "/todos");
}

#[tokio::test]
async fn test_swagger_delete_request() {
    let engine = SearchEngine::new(fixtures::mixed_catalog());

    let results = search(&engine, "delete a pet").await;
    assert_eq!(results[0].method, "DELETE");
    assert_eq!(results[0].path, "/pets/{petId}");
    assert_eq!(results[0].spec_name, "petstore");
}

#[tokio::test]
async fn test_confident_answer_is_top_candidate() {
    let engine = SearchEngine::new(fixtures::mixed_catalog());
    let config = SearchConfig::default();

    let results = search(&engine, "remove pet").await;
    if let Some(accepted) = select_confident(&results, &config) {
        assert_eq!(accepted, &results[0]);
        assert!(accepted.score >= config.score_threshold);
    }
}

// ============================================================================
// PROPERTY QUERIES
// ============================================================================

#[tokio::test]
async fn test_property_name_reports_property_path() {
    let engine = SearchEngine::new(fixtures::todo_catalog());

    let results = search(&engine, "title").await;
    let create = results
        .iter()
        .find(|c| c.method == "POST" && c.path == "/todos")
        .expect("POST /todos is a candidate");
    assert_eq!(create.source_type, NodeKind::Property);
    assert_eq!(create.matched_property_path.as_deref(), Some("requestBody.title"));
}

#[tokio::test]
async fn test_property_tie_orders_by_method() {
    let engine = SearchEngine::new(fixtures::todo_catalog());

    // List response items and the create body both carry a bare `title`
    let results = search(&engine, "title").await;
    let get = results
        .iter()
        .position(|c| c.method == "GET" && c.path == "/todos")
        .expect("GET /todos is a candidate");
    let post = results
        .iter()
        .position(|c| c.method == "POST" && c.path == "/todos")
        .expect("POST /todos is a candidate");

    assert_eq!(results[get].score, results[post].score);
    assert!(get < post);
    assert_eq!(
        results[get].matched_property_path.as_deref(),
        Some("response.200.items.title")
    );
}

#[tokio::test]
async fn test_swagger_body_property() {
    let engine = SearchEngine::new(fixtures::mixed_catalog());

    let results = search(&engine, "vaccination date").await;
    let top = &results[0];
    assert_eq!(top.path, "/pets");
    assert_eq!(top.source_type, NodeKind::Property);
    assert!(
        top.matched_property_path
            .as_deref()
            .is_some_and(|path| path.ends_with("vaccinationDate")),
        "unexpected property path {:?}",
        top.matched_property_path
    );
}

#[tokio::test]
async fn test_recursive_schema_is_searchable() {
    let engine = SearchEngine::new(fixtures::catalog([("tree", fixtures::tree_document())]));

    let results = search(&engine, "label").await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "/nodes");

    let stats = engine.stats().await.unwrap();
    assert_eq!(stats.operations, 1);
    assert!(stats.properties >= 2);
}

// ============================================================================
// JAPANESE QUERIES
// ============================================================================

#[tokio::test]
async fn test_japanese_compound_create() {
    let engine = SearchEngine::new(fixtures::catalog([("tasks", fixtures::japanese_document())]));

    let results = search(&engine, "タスク作成").await;
    assert_eq!(results[0].method, "POST");
    assert_eq!(results[0].path, "/tasks");
}

#[tokio::test]
async fn test_japanese_compound_delete() {
    let engine = SearchEngine::new(fixtures::catalog([("tasks", fixtures::japanese_document())]));

    let results = search(&engine, "タスク削除").await;
    assert_eq!(results[0].method, "DELETE");
    assert_eq!(results[0].path, "/tasks/{taskId}");
}

#[tokio::test]
async fn test_full_width_query_matches_ascii() {
    let engine = SearchEngine::new(fixtures::todo_catalog());

    let ascii = search(&engine, "create todo").await;
    let full_width = search(&engine, "ｃｒｅａｔｅ ｔｏｄｏ").await;
    assert_eq!(ascii, full_width);
}

// ============================================================================
// DIRECT LOOKUP
// ============================================================================

#[test]
fn test_direct_lookup_ignores_parameter_names() {
    let engine = SearchEngine::new(fixtures::todo_catalog());

    let direct = parse_direct_query("get /todos/{todoId}").expect("direct query");
    assert_eq!(direct.method, "GET");

    let found = engine.lookup(&direct.method, &direct.path).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "/todos/{id}");
    assert_eq!(found[0].operation_id(), Some("getTodo"));
}

#[test]
fn test_plain_query_is_not_direct() {
    assert!(parse_direct_query("create a todo").is_none());
    assert!(parse_direct_query("fetch /todos").is_none());
}
