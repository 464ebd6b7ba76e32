//! Node Scoring (BM25 + Method Bias + Embedding Fusion)
//!
//! Every node is scored independently against an expanded query:
//!
//! ```text
//! bm25  = Σ idf(t) · qw(t) · tf·(k1+1) / (tf + k1·(1 - b + b·L/avgL))
//! qw(t) = 1 + ln(1 + query weight of t)
//! fused = bm25·(1-w) + ((cos+1)/2)·w
//! ```
//!
//! The method bias is added to the BM25 score. Fusion is computed from the
//! unbiased BM25 score and replaces the biased one, so the bias only
//! survives fusion with `bias_after_fusion` set.

use crate::config::SearchConfig;
use crate::embeddings::HashedEmbedding;
use crate::index::{DocumentNode, SearchIndex};
use crate::text::{synonym_table, Intent, QueryContext};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Term-frequency saturation
pub const BM25_K1: f64 = 1.5;

/// Length normalization strength
pub const BM25_B: f64 = 0.75;

/// Bonus for a method whose intent the query names
pub const METHOD_BIAS: f64 = 0.5;

// ============================================================================
// BM25
// ============================================================================

/// Query term weight from its cumulative expansion weight
fn query_weight(frequency: u32) -> f64 {
    1.0 + (1.0 + f64::from(frequency)).ln()
}

/// BM25 score of one node
///
/// Terms are summed in the query context's sorted order so repeated calls
/// produce bit-identical results.
pub fn bm25(node: &DocumentNode, query: &QueryContext, index: &SearchIndex) -> f64 {
    let avg_length = index.avg_length();
    if node.length == 0 || avg_length == 0.0 {
        return 0.0;
    }

    let length_ratio = node.length as f64 / avg_length;
    let mut score = 0.0;

    for (term, &frequency) in &query.term_freq {
        let Some(&tf) = node.term_freq.get(term) else {
            continue;
        };
        let tf = f64::from(tf);
        let numerator = tf * (BM25_K1 + 1.0);
        let denominator = tf + BM25_K1 * (1.0 - BM25_B + BM25_B * length_ratio);
        score += index.idf(term) * query_weight(frequency) * numerator / denominator;
    }

    score
}

// ============================================================================
// METHOD BIAS
// ============================================================================

/// Intents that hint at an HTTP method
fn method_intents(method: &str) -> &'static [Intent] {
    match method {
        "POST" => &[Intent::Create],
        "PUT" | "PATCH" => &[Intent::Update],
        "DELETE" => &[Intent::Delete],
        "GET" => &[Intent::Retrieve, Intent::List, Intent::Status],
        _ => &[],
    }
}

/// [`METHOD_BIAS`] when the query names an intent of `method`, else 0
///
/// Applied at most once per node, however many hint terms match.
pub fn method_bias(method: &str, query: &QueryContext) -> f64 {
    let table = synonym_table();
    let hinted = method_intents(method)
        .iter()
        .flat_map(|intent| table.intent_terms(*intent))
        .any(|term| query.terms.contains(term));

    if hinted { METHOD_BIAS } else { 0.0 }
}

// ============================================================================
// FUSION
// ============================================================================

/// Blend a lexical score with cosine similarity mapped to [0, 1]
pub fn fuse(lexical: f64, cosine: f64, weight: f64) -> f64 {
    let normalized_cosine = (cosine + 1.0) / 2.0;
    lexical * (1.0 - weight) + normalized_cosine * weight
}

/// Final score of one node
pub fn score_node(
    node: &DocumentNode,
    query: &QueryContext,
    query_embedding: Option<&HashedEmbedding>,
    index: &SearchIndex,
    config: &SearchConfig,
) -> f64 {
    let lexical = bm25(node, query, index);
    let bias = method_bias(&node.operation.method, query);
    let biased = lexical + bias;

    if !config.embeddings_enabled {
        return biased;
    }

    match (query_embedding, node.embedding.as_ref()) {
        (Some(query_embedding), Some(node_embedding)) => {
            let cosine = f64::from(query_embedding.cosine_similarity(node_embedding));
            let fused = fuse(lexical, cosine, config.embedding_weight);
            if config.bias_after_fusion {
                fused + bias
            } else {
                fused
            }
        }
        _ => biased,
    }
}

// ============================================================================
// TESTS
// ============================================================================
