//! Embeddings Module
//!
//! Provides deterministic hashed pseudo-embeddings.
//! No model downloads and no external API calls - 100% local and reproducible.
//!
//! Supports:
//! - Token-multiset embedding (256-dimensional FNV-1a bucket vectors)
//! - Cosine similarity over stored norms

mod hashed;

pub use hashed::{
    cosine_similarity, dot_product, fnv1a_32, HashedEmbedding, EMBEDDING_DIMENSIONS,
    FNV_OFFSET_BASIS, FNV_PRIME,
};
