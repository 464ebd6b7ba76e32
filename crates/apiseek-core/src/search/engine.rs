//! Search Engine
//!
//! Ties the pipeline together:
//! query text → tokens → expanded query context → node scores → candidates.
//!
//! The index is built lazily through the shared [`IndexCache`]; the
//! configuration is re-read from its [`ConfigSource`] on every call.

use std::num::NonZeroUsize;
use std::sync::{Arc, LazyLock, Mutex, RwLock};

use lru::LruCache;
use regex::Regex;

use super::ranker::{aggregate, Candidate};
use super::scorer::score_node;
use crate::catalog::{OperationCatalog, OperationDescriptor, HTTP_METHODS};
use crate::config::{ConfigSource, SearchConfig};
use crate::embeddings::HashedEmbedding;
use crate::index::{IndexCache, IndexStats, ResetHandle, Result, SearchError, SearchIndex};
use crate::text::{is_all_stopwords, normalize, synonym_table, QueryContext};

/// Expanded queries kept in memory
const QUERY_CACHE_CAPACITY: usize = 256;

static DIRECT_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z]+)\s+(/\S*)\s*$").expect("valid direct query pattern")
});

// ============================================================================
// TYPES
// ============================================================================

/// Per-call search options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Discard the cached index before searching
    pub force_reload: bool,
}

/// A query of the form `METHOD /path`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectQuery {
    /// Uppercase method
    pub method: String,
    pub path: String,
}

/// Recognize `GET /todos/{id}` style queries
pub fn parse_direct_query(query: &str) -> Option<DirectQuery> {
    let captures = DIRECT_QUERY.captures(query)?;
    let method = captures.get(1)?.as_str().to_ascii_lowercase();
    if !HTTP_METHODS.contains(&method.as_str()) {
        return None;
    }
    Some(DirectQuery {
        method: method.to_ascii_uppercase(),
        path: captures.get(2)?.as_str().to_string(),
    })
}

/// Query state that does not depend on the index
#[derive(Debug)]
struct PreparedQuery {
    context: QueryContext,
    embedding: Option<HashedEmbedding>,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Hybrid search over an operation catalog
pub struct SearchEngine {
    catalog: RwLock<Arc<dyn OperationCatalog>>,
    cache: Arc<IndexCache>,
    config: ConfigSource,
    queries: Mutex<LruCache<String, Arc<PreparedQuery>>>,
}

impl SearchEngine {
    /// Engine with the default fixed configuration
    pub fn new(catalog: Arc<dyn OperationCatalog>) -> Self {
        Self::with_config(catalog, ConfigSource::default())
    }

    pub fn with_config(catalog: Arc<dyn OperationCatalog>, config: ConfigSource) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            cache: Arc::new(IndexCache::new()),
            config,
            queries: Mutex::new(LruCache::new(
                NonZeroUsize::new(QUERY_CACHE_CAPACITY).expect("capacity is non-zero"),
            )),
        }
    }

    /// Configuration as the next call would see it
    pub fn config(&self) -> SearchConfig {
        self.config.load()
    }

    /// Rank operations for a natural-language query
    ///
    /// Empty and stop-word-only queries return an empty list without
    /// touching the index.
    pub async fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<Candidate>> {
        let config = self.config.load();
        if options.force_reload {
            self.invalidate();
        }

        let tokens = normalize(query);
        if is_all_stopwords(&tokens) {
            tracing::debug!(query, "Query has no content tokens");
            return Ok(Vec::new());
        }

        let prepared = self.prepare(query, &tokens);
        if prepared.context.is_empty() {
            return Ok(Vec::new());
        }

        let index = self.index().await?;
        let query_embedding = prepared.embedding.as_ref();
        let scored = index.nodes().iter().map(|node| {
            let score = score_node(node, &prepared.context, query_embedding, &index, &config);
            (node, score)
        });

        let candidates = aggregate(scored, &config);
        tracing::debug!(query, results = candidates.len(), "Search complete");
        Ok(candidates)
    }

    /// Operations matching a direct `METHOD /path` query
    ///
    /// Paths are compared in normalized form, so `/Todos/{todoId}` finds
    /// `/todos/{id}`.
    pub fn lookup(&self, method: &str, path: &str) -> Result<Vec<Arc<OperationDescriptor>>> {
        let catalog = self.catalog()?;
        Ok(catalog
            .operations()
            .iter()
            .filter(|op| op.matches(method, path))
            .cloned()
            .collect())
    }

    /// Statistics of the current index, building it if needed
    pub async fn stats(&self) -> Result<IndexStats> {
        Ok(self.index().await?.stats().clone())
    }

    /// Discard the cached index; the next search rebuilds it
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    /// Hook for the document source to signal that documents changed
    pub fn reset_handle(&self) -> ResetHandle {
        ResetHandle::new(Arc::clone(&self.cache))
    }

    /// Swap in a new catalog and invalidate the index
    pub fn replace_catalog(&self, catalog: Arc<dyn OperationCatalog>) -> Result<()> {
        let mut current = self
            .catalog
            .write()
            .map_err(|_| SearchError::LockPoisoned("Catalog lock poisoned".to_string()))?;
        *current = catalog;
        // Under the write lock, so no build can pair the old catalog with
        // the new generation
        self.cache.invalidate();
        Ok(())
    }

    fn catalog(&self) -> Result<Arc<dyn OperationCatalog>> {
        self.catalog
            .read()
            .map(|catalog| Arc::clone(&*catalog))
            .map_err(|_| SearchError::LockPoisoned("Catalog lock poisoned".to_string()))
    }

    /// Shared index, awaiting (or starting) the build
    async fn index(&self) -> Result<Arc<SearchIndex>> {
        let (build, generation) = {
            let catalog = self
                .catalog
                .read()
                .map_err(|_| SearchError::LockPoisoned("Catalog lock poisoned".to_string()))?;
            self.cache.get_or_build(Arc::clone(&*catalog))?
        };

        match build.await {
            Ok(index) => Ok(index),
            Err(e) => {
                tracing::warn!("Index build failed: {}", e);
                self.cache.discard_failed(generation);
                Err(e)
            }
        }
    }

    /// Expanded query context and embedding, memoized by query text
    fn prepare(&self, query: &str, tokens: &[String]) -> Arc<PreparedQuery> {
        if let Ok(mut queries) = self.queries.lock() {
            if let Some(prepared) = queries.get(query) {
                return Arc::clone(prepared);
            }
        }

        let context = synonym_table().build_query_context(tokens);
        let embedding = HashedEmbedding::from_tokens(&context.terms);
        let prepared = Arc::new(PreparedQuery { context, embedding });

        if let Ok(mut queries) = self.queries.lock() {
            queries.put(query.to_string(), Arc::clone(&prepared));
        }
        prepared
    }
}

// ============================================================================
// TESTS
// ============================================================================
