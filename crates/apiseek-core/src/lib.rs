//! # apiseek Core
//!
//! Deterministic hybrid search over API description documents (OpenAPI 3 and
//! Swagger 2). Given a natural-language query, ranks the operations of a
//! catalog and reports which operation (and which schema property) matched.
//!
//! - **Tokenizer**: NFKC normalization, camelCase splitting, Latin and CJK segmentation
//! - **Synonym Expansion**: Symmetric intent groups with compound-word handling for Japanese
//! - **Schema Walking**: Cycle-safe, `$ref`-following property extraction
//! - **BM25 Index**: Term-frequency index over operation and property nodes
//! - **Hashed Embeddings**: 256-dimensional FNV-1a pseudo-embeddings, fully local
//! - **Ranking**: Per-operation aggregation with stable tie-breaking
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use apiseek_core::{InMemoryCatalog, SearchEngine, SearchOptions};
//!
//! let catalog = InMemoryCatalog::from_documents([("todo", document)])?;
//! let engine = SearchEngine::new(Arc::new(catalog));
//!
//! let candidates = engine.search("create a todo", SearchOptions::default()).await?;
//! for candidate in candidates {
//!     println!("{} {} ({:.3})", candidate.method, candidate.path, candidate.score);
//! }
//! ```
//!
//! ## Configuration
//!
//! Thresholds and fusion settings live in [`SearchConfig`]. An engine built
//! with [`ConfigSource::Environment`] re-reads the `APISEEK_*` variables on
//! every search.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod catalog;
pub mod config;
pub mod embeddings;
pub mod index;
pub mod schema;
pub mod search;
pub mod text;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Catalog boundary
pub use catalog::{
    normalize_path, CatalogError, InMemoryCatalog, OperationCatalog, OperationDescriptor,
    HTTP_METHODS,
};

// Configuration
pub use config::{ConfigSource, SearchConfig};

// Hashed embeddings
pub use embeddings::{cosine_similarity, fnv1a_32, HashedEmbedding, EMBEDDING_DIMENSIONS};

// Index and cache
pub use index::{
    build_nodes, DocumentNode, IndexCache, IndexStats, NodeKind, ResetHandle, Result,
    SearchError, SearchIndex,
};

// Schema walking
pub use schema::{PropertyAccumulator, PropertyDescriptor, SchemaWalker, VisitedSet};

// Search
pub use search::{
    aggregate, parse_direct_query, select_confident, Candidate, DirectQuery, SearchEngine,
    SearchOptions,
};

// Text processing
pub use text::{normalize, synonym_table, Intent, QueryContext, SynonymTable};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Candidate, ConfigSource, InMemoryCatalog, NodeKind, OperationCatalog, Result,
        SearchConfig, SearchEngine, SearchError, SearchOptions,
    };
}
