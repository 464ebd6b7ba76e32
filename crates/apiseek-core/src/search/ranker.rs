//! Candidate Aggregation
//!
//! Collapses node scores to one candidate per operation, filters by the
//! acceptance threshold, orders deterministically and truncates to top-K.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::index::{DocumentNode, NodeKind};

// ============================================================================
// CANDIDATE
// ============================================================================

/// One ranked operation with the provenance of its best match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub method: String,
    pub path: String,
    pub summary: Option<String>,
    pub score: f64,
    pub spec_name: String,
    pub source_type: NodeKind,
    pub matched_property_path: Option<String>,
}

impl Candidate {
    /// Candidate for a node's owning operation
    pub fn from_node(node: &DocumentNode, score: f64) -> Self {
        let operation = &node.operation;
        Self {
            method: operation.method.clone(),
            path: operation.path.clone(),
            summary: operation.summary().map(str::to_string),
            score,
            spec_name: operation.spec_name.clone(),
            source_type: node.kind,
            matched_property_path: node.matched_property_path(),
        }
    }
}

/// Score descending, then path ascending, then method ascending
fn rank_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.path.cmp(&b.path))
        .then_with(|| a.method.cmp(&b.method))
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Aggregate scored nodes into the final ranked list
///
/// Per operation the best node wins. On an exact tie a property node
/// replaces an operation node, so matched-property information surfaces.
pub fn aggregate<'a, I>(scored: I, config: &SearchConfig) -> Vec<Candidate>
where
    I: IntoIterator<Item = (&'a DocumentNode, f64)>,
{
    let mut best: HashMap<(&'a str, &'a str), (&'a DocumentNode, f64)> = HashMap::new();

    for (node, score) in scored {
        let key = (node.operation.method.as_str(), node.operation.path.as_str());
        let replaces = match best.get(&key) {
            Some(&(held, held_score)) => {
                score > held_score
                    || (score == held_score
                        && node.kind == NodeKind::Property
                        && held.kind == NodeKind::Operation)
            }
            None => true,
        };
        if replaces {
            best.insert(key, (node, score));
        }
    }

    let mut candidates: Vec<Candidate> = best
        .into_values()
        .filter(|(_, score)| *score >= config.score_threshold)
        .map(|(node, score)| Candidate::from_node(node, score))
        .collect();

    candidates.sort_by(rank_order);
    candidates.truncate(config.top_k.max(1));
    candidates
}

/// The top candidate, if it is confident enough to accept without asking
///
/// Confident means it is the only candidate, or it leads the runner-up by at
/// least `min_margin`.
pub fn select_confident<'a>(candidates: &'a [Candidate], config: &SearchConfig) -> Option<&'a Candidate> {
    match candidates {
        [] => None,
        [only] => Some(only),
        [first, second, ..] => {
            (first.score - second.score >= config.min_margin).then_some(first)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
