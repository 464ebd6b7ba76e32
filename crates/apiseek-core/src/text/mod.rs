//! Text Module
//!
//! Tokenization and query expansion:
//! - Unicode-aware normalization and segmentation (Latin + CJK)
//! - Symmetric synonym expansion with CJK compound handling
//! - Stop-word detection for content-free queries

mod stopwords;
mod synonyms;
mod tokenizer;

pub use tokenizer::{has_non_latin, identifier_form, is_non_latin, normalize, normalize_all};

pub use synonyms::{synonym_table, Intent, QueryContext, SynonymTable, SYNONYM_GROUPS};

pub use stopwords::{is_all_stopwords, is_stopword};
