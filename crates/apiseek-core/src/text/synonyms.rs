//! Synonym Engine
//!
//! A fixed table of intent groups (creation verbs, retrieval verbs, ...) is
//! expanded once into a symmetric relation: every term maps to every other
//! term of every group it belongs to. Queries are expanded through that
//! relation into a weighted term multiset.
//!
//! Japanese compounds such as `タスク作成` have no whitespace to split on,
//! so non-Latin tokens are additionally broken into 2-3 character n-grams
//! and checked for embedded roots (`作成`), letting a compound trigger the
//! same expansion as the root alone.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use super::tokenizer::{has_non_latin, is_non_latin, normalize};

// ============================================================================
// SYNONYM GROUPS
// ============================================================================

/// Intent carried by a synonym group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Intent {
    Create,
    Retrieve,
    Update,
    Delete,
    List,
    Status,
    /// Domain nouns (the resources most catalogs are about)
    Domain,
}

/// The static synonym groups
pub const SYNONYM_GROUPS: &[(Intent, &[&str])] = &[
    (
        Intent::Create,
        &[
            "create", "add", "new", "post", "insert", "register", "make", "作成", "追加", "登録",
            "新規",
        ],
    ),
    (
        Intent::Retrieve,
        &[
            "get", "fetch", "retrieve", "read", "show", "find", "lookup", "detail", "view",
            "取得", "参照", "詳細", "表示",
        ],
    ),
    (
        Intent::Update,
        &[
            "update", "edit", "modify", "change", "put", "patch", "更新", "編集", "変更",
        ],
    ),
    (
        Intent::Delete,
        &["delete", "remove", "destroy", "erase", "削除", "消去"],
    ),
    (
        Intent::List,
        &[
            "list", "all", "search", "enumerate", "browse", "一覧", "検索", "リスト",
        ],
    ),
    (
        Intent::Status,
        &["status", "state", "health", "progress", "状態", "ステータス", "進捗"],
    ),
    (
        Intent::Domain,
        &["todo", "todos", "task", "tasks", "item", "items", "タスク", "やること"],
    ),
];

// ============================================================================
// SYNONYM TABLE
// ============================================================================

/// Symmetric synonym relation built from [`SYNONYM_GROUPS`]
#[derive(Debug, Clone)]
pub struct SynonymTable {
    relations: HashMap<String, Vec<String>>,
    intents: HashMap<Intent, BTreeSet<String>>,
    non_latin_roots: Vec<String>,
}

static TABLE: LazyLock<SynonymTable> = LazyLock::new(|| SynonymTable::from_groups(SYNONYM_GROUPS));

/// The process-wide synonym table
pub fn synonym_table() -> &'static SynonymTable {
    &TABLE
}

/// Key form of a table term: its normalized tokens concatenated
fn term_key(term: &str) -> Option<String> {
    let key: String = normalize(term).concat();
    if key.is_empty() { None } else { Some(key) }
}

impl SynonymTable {
    /// Expand groups into the symmetric relation
    pub fn from_groups(groups: &[(Intent, &[&str])]) -> Self {
        let mut relations: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut intents: HashMap<Intent, BTreeSet<String>> = HashMap::new();

        for (intent, terms) in groups {
            let keys: Vec<String> = terms.iter().filter_map(|t| term_key(t)).collect();
            intents.entry(*intent).or_default().extend(keys.iter().cloned());

            for key in &keys {
                let entry = relations.entry(key.clone()).or_default();
                for other in &keys {
                    if other != key {
                        entry.insert(other.clone());
                    }
                }
            }
        }

        let mut non_latin_roots: Vec<String> = relations
            .keys()
            .filter(|k| has_non_latin(k))
            .cloned()
            .collect();
        non_latin_roots.sort();

        Self {
            relations: relations
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().collect()))
                .collect(),
            intents,
            non_latin_roots,
        }
    }

    /// Direct synonyms of a normalized term (never includes the term itself)
    pub fn synonyms(&self, term: &str) -> &[String] {
        self.relations.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All normalized terms of one intent
    pub fn intent_terms(&self, intent: Intent) -> impl Iterator<Item = &str> {
        self.intents
            .get(&intent)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Table roots containing non-Latin characters, sorted
    pub fn non_latin_roots(&self) -> &[String] {
        &self.non_latin_roots
    }

    /// Expand query tokens into a weighted term multiset
    pub fn build_query_context(&self, tokens: &[String]) -> QueryContext {
        let mut context = QueryContext::default();

        for token in tokens {
            context.add(token);
            context.add_all(self.synonyms(token));

            if has_non_latin(token) {
                for gram in non_latin_ngrams(token) {
                    context.add(&gram);
                    context.add_all(self.synonyms(&gram));
                }
            }

            for root in &self.non_latin_roots {
                if token.contains(root.as_str()) {
                    context.add(root);
                    context.add_all(self.synonyms(root));
                }
            }
        }

        context
    }
}

/// Character n-grams of length 2 and 3 made only of non-Latin characters
fn non_latin_ngrams(token: &str) -> Vec<String> {
    let chars: Vec<char> = token.chars().collect();
    let mut grams = Vec::new();
    for n in 2..=3 {
        for window in chars.windows(n) {
            if window.iter().all(|c| is_non_latin(*c)) {
                grams.push(window.iter().collect());
            }
        }
    }
    grams
}

// ============================================================================
// QUERY CONTEXT
// ============================================================================

/// Expanded query: weighted term multiset plus its term set
///
/// Both maps are ordered so that scoring sums over terms in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContext {
    /// Term → cumulative weight
    pub term_freq: BTreeMap<String, u32>,
    /// Distinct terms
    pub terms: BTreeSet<String>,
}

impl QueryContext {
    fn add(&mut self, term: &str) {
        *self.term_freq.entry(term.to_string()).or_insert(0) += 1;
        self.terms.insert(term.to_string());
    }

    fn add_all(&mut self, terms: &[String]) {
        for term in terms {
            self.add(term);
        }
    }

    /// Whether the expansion produced no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Cumulative weight of a term (0 when absent)
    pub fn weight(&self, term: &str) -> u32 {
        self.term_freq.get(term).copied().unwrap_or(0)
    }
}

// ============================================================================
// TESTS
// ============================================================================
