//! Stop-word detection for queries
//!
//! Stop words are never removed from a query; they only decide whether a
//! query carries any content at all. "how do I" has no content and returns
//! no candidates, "create a todo" is scored with all three tokens.

use std::collections::HashSet;
use std::sync::LazyLock;

const STOPWORDS: &[&str] = &[
    // English
    "a", "an", "and", "any", "are", "as", "at", "be", "by", "can", "could", "do", "does", "for",
    "from", "how", "i", "in", "into", "is", "it", "its", "me", "my", "of", "on", "or", "please",
    "should", "so", "that", "the", "their", "them", "then", "there", "these", "this", "to", "want",
    "was", "we", "what", "when", "where", "which", "who", "why", "will", "with", "would", "you",
    "your",
    // Japanese particles and auxiliaries
    "の", "を", "に", "は", "が", "で", "と", "て", "です", "ます", "する", "したい", "ください",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Whether a normalized token is a stop word
pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

/// Whether every token is a stop word (vacuously true for no tokens)
pub fn is_all_stopwords(tokens: &[String]) -> bool {
    tokens.iter().all(|t| is_stopword(t))
}
