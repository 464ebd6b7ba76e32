//! Search Module
//!
//! Ranking pipeline over the index:
//! - BM25 lexical scoring with a method-intent bias
//! - Optional fusion with hashed-embedding cosine similarity
//! - Per-operation aggregation with deterministic tie-breaking
//! - The `SearchEngine` front door (lazy index, query cache, direct lookup)

mod engine;
mod ranker;
mod scorer;

pub use engine::{parse_direct_query, DirectQuery, SearchEngine, SearchOptions};

pub use ranker::{aggregate, select_confident, Candidate};

pub use scorer::{bm25, fuse, method_bias, score_node, BM25_B, BM25_K1, METHOD_BIAS};
