//! Hashed Pseudo-Embeddings
//!
//! Deterministic, fully local "embeddings": every token is hashed with
//! 32-bit FNV-1a into one of [`EMBEDDING_DIMENSIONS`] buckets, with a sign
//! and a small magnitude taken from the same hash. Colliding tokens simply
//! add up. No model, no network, identical output on every platform.

// ============================================================================
// CONSTANTS
// ============================================================================

/// Width of every hashed embedding
pub const EMBEDDING_DIMENSIONS: usize = 256;

/// FNV-1a 32-bit offset basis
pub const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a 32-bit prime
pub const FNV_PRIME: u32 = 0x0100_0193;

// ============================================================================
// HASHING
// ============================================================================

/// 32-bit FNV-1a over the UTF-8 bytes of a token
pub fn fnv1a_32(token: &str) -> u32 {
    token.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Signed contribution of one token hash: ±(1.0..=1.875)
fn contribution(hash: u32) -> f32 {
    let sign = if hash % 2 == 0 { 1.0 } else { -1.0 };
    let magnitude = 1.0 + ((hash >> 1) & 7) as f32 / 8.0;
    sign * magnitude
}

// ============================================================================
// EMBEDDING TYPE
// ============================================================================

/// A hashed embedding vector with its precomputed Euclidean norm
#[derive(Debug, Clone, PartialEq)]
pub struct HashedEmbedding {
    vector: Vec<f32>,
    norm: f32,
}

impl HashedEmbedding {
    /// Embed a token multiset; `None` when there are no tokens
    pub fn from_tokens<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vector = vec![0.0f32; EMBEDDING_DIMENSIONS];
        let mut seen_any = false;

        for token in tokens {
            let hash = fnv1a_32(token.as_ref());
            let bucket = hash as usize % EMBEDDING_DIMENSIONS;
            vector[bucket] += contribution(hash);
            seen_any = true;
        }

        if !seen_any {
            return None;
        }
        Some(Self::from_vector(vector))
    }

    /// Wrap an existing vector, computing its norm
    pub fn from_vector(vector: Vec<f32>) -> Self {
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        Self { vector, norm }
    }

    /// The raw vector
    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    /// Stored Euclidean norm
    pub fn norm(&self) -> f32 {
        self.norm
    }

    /// Number of dimensions
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }

    /// Cosine similarity using the stored norms
    ///
    /// Vectors of different widths are compared over their common prefix.
    /// Returns 0 when either norm is 0.
    pub fn cosine_similarity(&self, other: &HashedEmbedding) -> f32 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        dot_product(&self.vector, &other.vector) / (self.norm * other.norm)
    }
}

/// Dot product over the overlapping prefix of two vectors
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine similarity of two raw vectors over their overlapping prefix
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product(a, b) / (norm_a * norm_b)
}

// ============================================================================
// TESTS
// ============================================================================
