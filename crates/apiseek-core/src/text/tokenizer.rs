//! Tokenizer / Normalizer
//!
//! Turns raw text (queries, summaries, schema dumps, identifiers) into an
//! ordered sequence of normalized tokens:
//!
//! 1. NFKC compatibility normalization (full-width letters, ligatures, ...)
//! 2. camelCase boundary splitting (`createTodo` → `create Todo`)
//! 3. underscores, hyphens and quote characters become spaces
//! 4. lowercasing
//! 5. segmentation into maximal runs of Han/Hiragana/Katakana characters or
//!    maximal runs of ASCII letters/digits; everything else separates
//!
//! The function is pure and total: any input yields a (possibly empty)
//! token list and never an empty token.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// PATTERNS
// ============================================================================

/// Lowercase letter or digit followed by an uppercase letter
static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\p{Ll}\p{Nd}])(\p{Lu})").expect("valid camelCase pattern"));

/// Token segments. The prolonged sound mark (U+30FC) is script Common but
/// belongs inside katakana words.
static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Han}\p{Hiragana}\p{Katakana}\x{30FC}]+|[a-z0-9]+").expect("valid segment pattern")
});

/// Characters replaced by a space before segmentation
const SEPARATOR_CHARS: &[char] = &[
    '_', '-', '\'', '"', '`', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
];

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Normalize text into search tokens
pub fn normalize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let composed: String = text.nfkc().collect();
    let split = CAMEL_BOUNDARY.replace_all(&composed, "$1 $2");
    let spaced: String = split
        .chars()
        .map(|c| if SEPARATOR_CHARS.contains(&c) { ' ' } else { c })
        .collect();
    let lowered = spaced.to_lowercase();

    SEGMENT
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Normalize a list of fragments and concatenate the results in order
pub fn normalize_all<'a, I>(fragments: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    fragments.into_iter().flat_map(normalize).collect()
}

/// Identifier form of a name: alphanumerics only, lowercased
///
/// `due_date`, `dueDate` and `due-date` all become `duedate`, so a query
/// typed as one word still hits a multi-word property name.
pub fn identifier_form(name: &str) -> Option<String> {
    let ident: String = name
        .nfkc()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if ident.is_empty() { None } else { Some(ident) }
}

/// Whether a token carries characters outside the Latin script
///
/// Tokens are either ASCII alphanumeric runs or CJK runs, so anything
/// non-ASCII is a CJK character.
pub fn is_non_latin(c: char) -> bool {
    !c.is_ascii()
}

/// Whether a token contains at least one non-Latin character
pub fn has_non_latin(token: &str) -> bool {
    token.chars().any(is_non_latin)
}

// ============================================================================
// TESTS
// ============================================================================
