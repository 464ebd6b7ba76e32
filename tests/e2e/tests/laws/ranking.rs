//! Ranking Laws
//!
//! Properties every result list must satisfy regardless of the query:
//! - identical input gives identical output, across engines and runs
//! - candidates are sorted by score, then path, then method
//! - at most one candidate per operation, at most `top_k` candidates
//! - every score clears the threshold; raising it only drops the tail

use std::collections::HashSet;

use apiseek_core::{Candidate, ConfigSource, SearchConfig, SearchEngine, SearchOptions};
use apiseek_e2e_tests::fixtures;

const QUERIES: &[&str] = &[
    "create a todo",
    "list all todos",
    "get todo by id",
    "title",
    "delete a pet",
    "add pet to the store",
    "species",
    "vaccination date",
    "タスク作成",
    "status",
];

fn engine_with(config: SearchConfig) -> SearchEngine {
    SearchEngine::with_config(fixtures::mixed_catalog(), ConfigSource::Fixed(config))
}

async fn run(engine: &SearchEngine, query: &str) -> Vec<Candidate> {
    engine
        .search(query, SearchOptions::default())
        .await
        .expect("search succeeds")
}

fn wide_config() -> SearchConfig {
    SearchConfig {
        score_threshold: 0.0,
        top_k: 50,
        ..SearchConfig::default()
    }
}

// ============================================================================
// DETERMINISM
// ============================================================================

#[tokio::test]
async fn test_same_query_same_answer() {
    let first = engine_with(SearchConfig::default());
    let second = engine_with(SearchConfig::default());

    for query in QUERIES {
        let a = run(&first, query).await;
        let b = run(&first, query).await;
        let c = run(&second, query).await;
        assert_eq!(a, b, "repeat run differs for {:?}", query);
        assert_eq!(a, c, "second engine differs for {:?}", query);
    }
}

#[tokio::test]
async fn test_fused_scores_are_deterministic() {
    let config = SearchConfig {
        embeddings_enabled: true,
        ..wide_config()
    };
    let first = engine_with(config.clone());
    let second = engine_with(config);

    for query in QUERIES {
        assert_eq!(run(&first, query).await, run(&second, query).await);
    }
}

#[tokio::test]
async fn test_forced_reload_does_not_change_results() {
    let engine = engine_with(SearchConfig::default());

    for query in QUERIES {
        let cached = run(&engine, query).await;
        let rebuilt = engine
            .search(query, SearchOptions { force_reload: true })
            .await
            .unwrap();
        assert_eq!(cached, rebuilt);
    }
}

// ============================================================================
// ORDERING AND SHAPE
// ============================================================================

#[tokio::test]
async fn test_sorted_by_score_then_path_then_method() {
    let engine = engine_with(wide_config());

    for query in QUERIES {
        let results = run(&engine, query).await;
        for pair in results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ordered = a.score > b.score
                || (a.score == b.score && (&a.path, &a.method) <= (&b.path, &b.method));
            assert!(ordered, "{:?} before {:?} for {:?}", a, b, query);
        }
    }
}

#[tokio::test]
async fn test_one_candidate_per_operation() {
    let engine = engine_with(wide_config());

    for query in QUERIES {
        let results = run(&engine, query).await;
        let keys: HashSet<(&str, &str)> = results
            .iter()
            .map(|c| (c.method.as_str(), c.path.as_str()))
            .collect();
        assert_eq!(keys.len(), results.len(), "duplicate operation for {:?}", query);
    }
}

#[tokio::test]
async fn test_top_k_truncates_the_same_order() {
    let wide = engine_with(wide_config());
    let narrow = engine_with(SearchConfig {
        top_k: 2,
        ..wide_config()
    });

    for query in QUERIES {
        let all = run(&wide, query).await;
        let top = run(&narrow, query).await;
        assert!(top.len() <= 2);
        assert_eq!(top.as_slice(), &all[..top.len()]);
    }
}

#[tokio::test]
async fn test_zero_top_k_still_returns_one() {
    let engine = engine_with(SearchConfig {
        top_k: 0,
        ..wide_config()
    });

    let results = run(&engine, "create a todo").await;
    assert_eq!(results.len(), 1);
}

// ============================================================================
// THRESHOLD
// ============================================================================

#[tokio::test]
async fn test_scores_clear_the_threshold() {
    let config = SearchConfig::default();
    let engine = engine_with(config.clone());

    for query in QUERIES {
        for candidate in run(&engine, query).await {
            assert!(candidate.score >= config.score_threshold);
            assert!(candidate.score.is_finite());
        }
    }
}

#[tokio::test]
async fn test_raising_threshold_only_drops_the_tail() {
    let wide = engine_with(wide_config());

    for query in QUERIES {
        let all = run(&wide, query).await;
        let Some(median) = all.get(all.len() / 2).map(|c| c.score) else {
            continue;
        };
        let strict = engine_with(SearchConfig {
            score_threshold: median,
            ..wide_config()
        });
        let kept = run(&strict, query).await;
        assert!(kept.iter().all(|c| c.score >= median));
        assert_eq!(kept.as_slice(), &all[..kept.len()]);
    }
}

// ============================================================================
// EMPTY RESULTS
// ============================================================================

#[tokio::test]
async fn test_queries_without_content_return_nothing() {
    let engine = engine_with(wide_config());

    for query in ["", "   ", "the", "a the of", "!!!"] {
        assert!(run(&engine, query).await.is_empty(), "{:?}", query);
    }
}

#[tokio::test]
async fn test_empty_catalog_returns_nothing() {
    let engine = SearchEngine::new(fixtures::catalog(Vec::new()));

    assert!(run(&engine, "create a todo").await.is_empty());
    let stats = engine.stats().await.unwrap();
    assert_eq!(stats.operations, 0);
}
