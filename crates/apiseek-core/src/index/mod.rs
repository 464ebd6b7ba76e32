//! Index Module
//!
//! Term-frequency index over operation and property nodes:
//! - Document building from the catalog
//! - Document frequency and IDF (`ln((N+1)/(df+1)) + 1`)
//! - Average node length for BM25 length normalization
//! - Lazily built, memoized cache with explicit invalidation

mod cache;
mod document;

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::OperationCatalog;

pub use cache::{BuildFuture, IndexCache, ResetHandle, Result, SearchError};
pub use document::{build_nodes, DocumentNode, NodeKind, REQUEST_BODY_SEGMENT, RESPONSE_SEGMENT};

// ============================================================================
// STATISTICS
// ============================================================================

/// Summary of one index build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Operation nodes
    pub operations: usize,
    /// Property nodes
    pub properties: usize,
    /// All indexed nodes
    pub nodes: usize,
    /// Distinct tokens with an IDF entry
    pub vocabulary: usize,
    /// Node count N used for IDF
    pub document_count: usize,
    /// Average token length of the IDF population
    pub avg_length: f64,
    /// When the build finished
    pub built_at: DateTime<Utc>,
}

// ============================================================================
// SEARCH INDEX
// ============================================================================

/// Immutable index published by one build
#[derive(Debug, Clone)]
pub struct SearchIndex {
    nodes: Vec<DocumentNode>,
    idf: HashMap<String, f64>,
    document_count: usize,
    avg_length: f64,
    stats: IndexStats,
}

impl SearchIndex {
    /// Build from every operation of a catalog
    pub fn build(catalog: &dyn OperationCatalog) -> Self {
        let started = Instant::now();
        let index = Self::from_nodes(build_nodes(catalog));
        tracing::info!(
            operations = index.stats.operations,
            properties = index.stats.properties,
            vocabulary = index.stats.vocabulary,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search index built"
        );
        index
    }

    /// Build from prepared nodes; nodes without tokens are dropped
    ///
    /// Document frequency and average length are computed over operation
    /// nodes when any exist, otherwise over all nodes.
    pub fn from_nodes(nodes: Vec<DocumentNode>) -> Self {
        let nodes: Vec<DocumentNode> = nodes.into_iter().filter(|n| !n.is_empty()).collect();

        let has_operations = nodes.iter().any(|n| n.kind == NodeKind::Operation);
        let population: Vec<&DocumentNode> = nodes
            .iter()
            .filter(|n| !has_operations || n.kind == NodeKind::Operation)
            .collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for node in &population {
            let unique: HashSet<&str> = node.tokens.iter().map(String::as_str).collect();
            for token in unique {
                *doc_freq.entry(token).or_insert(0) += 1;
            }
        }

        let document_count = population.len().max(1);
        let n = document_count as f64;
        let idf: HashMap<String, f64> = doc_freq
            .into_iter()
            .map(|(token, df)| (token.to_string(), ((n + 1.0) / (df as f64 + 1.0)).ln() + 1.0))
            .collect();

        let avg_length = if population.is_empty() {
            0.0
        } else {
            let total: usize = population.iter().map(|n| n.length).sum();
            total as f64 / population.len() as f64
        };

        let operations = nodes.iter().filter(|n| n.kind == NodeKind::Operation).count();
        let stats = IndexStats {
            operations,
            properties: nodes.len() - operations,
            nodes: nodes.len(),
            vocabulary: idf.len(),
            document_count,
            avg_length,
            built_at: Utc::now(),
        };

        Self {
            nodes,
            idf,
            document_count,
            avg_length,
            stats,
        }
    }

    pub fn nodes(&self) -> &[DocumentNode] {
        &self.nodes
    }

    /// IDF of a token, `ln(N+1) + 1` for tokens never seen
    pub fn idf(&self, token: &str) -> f64 {
        self.idf
            .get(token)
            .copied()
            .unwrap_or_else(|| (self.document_count as f64 + 1.0).ln() + 1.0)
    }

    /// Token → IDF table
    pub fn idf_table(&self) -> &HashMap<String, f64> {
        &self.idf
    }

    /// N used for IDF (never 0)
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn avg_length(&self) -> f64 {
        self.avg_length
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
