//! Search configuration
//!
//! Thresholds, result limits and fusion settings. Values come either from a
//! fixed struct or from `APISEEK_*` environment variables; malformed values
//! silently fall back to their defaults.

use serde::{Deserialize, Serialize};

// ============================================================================
// DEFAULTS
// ============================================================================

/// Minimum fused score a candidate needs
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.2;

/// Maximum candidates returned
pub const DEFAULT_TOP_K: usize = 3;

/// Lead over the runner-up required to auto-accept the top candidate
pub const DEFAULT_MIN_MARGIN: f64 = 0.05;

/// Share of the cosine term in the fused score
pub const DEFAULT_EMBEDDING_WEIGHT: f64 = 0.4;

pub const ENV_SCORE_THRESHOLD: &str = "APISEEK_SCORE_THRESHOLD";
pub const ENV_TOP_K: &str = "APISEEK_TOP_K";
pub const ENV_MIN_MARGIN: &str = "APISEEK_MIN_MARGIN";
pub const ENV_EMBEDDINGS: &str = "APISEEK_EMBEDDINGS";
pub const ENV_EMBEDDING_WEIGHT: &str = "APISEEK_EMBEDDING_WEIGHT";
pub const ENV_BIAS_AFTER_FUSION: &str = "APISEEK_BIAS_AFTER_FUSION";

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for one search call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Candidates scoring below this are dropped
    pub score_threshold: f64,
    /// Maximum candidates returned (at least 1)
    pub top_k: usize,
    /// Used by callers deciding whether to auto-accept, not by ranking
    pub min_margin: f64,
    /// Fuse BM25 with hashed-embedding cosine similarity
    pub embeddings_enabled: bool,
    /// Cosine share of the fused score, in [0, 1]
    pub embedding_weight: f64,
    /// Add the method bias after fusion instead of discarding it
    pub bias_after_fusion: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            min_margin: DEFAULT_MIN_MARGIN,
            embeddings_enabled: false,
            embedding_weight: DEFAULT_EMBEDDING_WEIGHT,
            bias_after_fusion: false,
        }
    }
}

impl SearchConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            score_threshold: lookup(ENV_SCORE_THRESHOLD)
                .and_then(|v| parse_non_negative(&v))
                .unwrap_or(defaults.score_threshold),
            top_k: lookup(ENV_TOP_K)
                .and_then(|v| parse_top_k(&v))
                .unwrap_or(defaults.top_k),
            min_margin: lookup(ENV_MIN_MARGIN)
                .and_then(|v| parse_non_negative(&v))
                .unwrap_or(defaults.min_margin),
            embeddings_enabled: lookup(ENV_EMBEDDINGS)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.embeddings_enabled),
            embedding_weight: lookup(ENV_EMBEDDING_WEIGHT)
                .and_then(|v| parse_finite(&v))
                .map(|w| w.clamp(0.0, 1.0))
                .unwrap_or(defaults.embedding_weight),
            bias_after_fusion: lookup(ENV_BIAS_AFTER_FUSION)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.bias_after_fusion),
        }
    }

    /// Apply the clamping rules to values set directly on the struct
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let non_negative = |v: f64, default: f64| if v.is_finite() && v >= 0.0 { v } else { default };
        Self {
            score_threshold: non_negative(self.score_threshold, defaults.score_threshold),
            top_k: self.top_k.max(1),
            min_margin: non_negative(self.min_margin, defaults.min_margin),
            embeddings_enabled: self.embeddings_enabled,
            embedding_weight: if self.embedding_weight.is_finite() {
                self.embedding_weight.clamp(0.0, 1.0)
            } else {
                defaults.embedding_weight
            },
            bias_after_fusion: self.bias_after_fusion,
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_non_negative(raw: &str) -> Option<f64> {
    parse_finite(raw).filter(|v| *v >= 0.0)
}

/// Negative or non-numeric → default; 0 floors to 1
fn parse_top_k(raw: &str) -> Option<usize> {
    let value = raw.trim().parse::<i64>().ok().filter(|v| *v >= 0)?;
    Some(usize::try_from(value).unwrap_or(usize::MAX).max(1))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ============================================================================
// CONFIG SOURCE
// ============================================================================

/// Where the engine reads its configuration from on every call
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Fixed(SearchConfig),
    Environment,
}

impl Default for ConfigSource {
    fn default() -> Self {
        ConfigSource::Fixed(SearchConfig::default())
    }
}

impl ConfigSource {
    /// Current, sanitized configuration
    pub fn load(&self) -> SearchConfig {
        match self {
            ConfigSource::Fixed(config) => config.clone().sanitized(),
            ConfigSource::Environment => SearchConfig::from_env(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
