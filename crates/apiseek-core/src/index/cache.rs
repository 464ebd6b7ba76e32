//! Index Cache
//!
//! The index is built lazily on first use and memoized. Concurrent callers
//! arriving before it exists share a single in-flight build: the slot holds
//! a [`Shared`] future that every caller clones and awaits.
//!
//! Invalidation empties the slot and bumps a generation counter. Builds that
//! were already running finish for the callers awaiting them, but since the
//! slot only ever holds the future created after the latest invalidation, a
//! stale build can never be installed as the cached index.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};

use super::SearchIndex;
use crate::catalog::OperationCatalog;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Engine error type
#[non_exhaustive]
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The background index build did not complete
    #[error("Index build failed: {0}")]
    IndexBuild(String),
    /// A cache lock was poisoned by a panicking holder
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Engine result type
pub type Result<T> = std::result::Result<T, SearchError>;

/// A build every caller can await
pub type BuildFuture = Shared<BoxFuture<'static, Result<Arc<SearchIndex>>>>;

// ============================================================================
// CACHE
// ============================================================================

#[derive(Default)]
struct CacheSlot {
    generation: u64,
    pending: Option<BuildFuture>,
}

/// Memoized, invalidatable index
#[derive(Default)]
pub struct IndexCache {
    slot: Mutex<CacheSlot>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheSlot>> {
        self.slot
            .lock()
            .map_err(|_| SearchError::LockPoisoned("Index cache lock poisoned".to_string()))
    }

    /// The current build, starting one from `catalog` if none exists
    ///
    /// Returns the future together with the generation it belongs to.
    pub fn get_or_build(&self, catalog: Arc<dyn OperationCatalog>) -> Result<(BuildFuture, u64)> {
        let mut slot = self.lock()?;
        if let Some(pending) = &slot.pending {
            return Ok((pending.clone(), slot.generation));
        }

        let generation = slot.generation;
        tracing::debug!(generation, "Starting index build");
        let build = async move {
            tokio::task::spawn_blocking(move || SearchIndex::build(catalog.as_ref()))
                .await
                .map(Arc::new)
                .map_err(|e| SearchError::IndexBuild(e.to_string()))
        }
        .boxed()
        .shared();

        slot.pending = Some(build.clone());
        Ok((build, generation))
    }

    /// Discard the cached index (or in-flight build)
    pub fn invalidate(&self) {
        // A poisoned slot is still reset; the data is only an Option
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.generation += 1;
        slot.pending = None;
        tracing::debug!(generation = slot.generation, "Index cache invalidated");
    }

    /// Drop a failed build so the next call retries
    ///
    /// No-op when the cache was invalidated since `generation` was handed out.
    pub fn discard_failed(&self, generation: u64) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.generation == generation {
            slot.pending = None;
        }
    }

    /// Invalidation counter
    pub fn generation(&self) -> u64 {
        self.slot.lock().map(|slot| slot.generation).unwrap_or_default()
    }

    /// Whether the cache holds a finished index
    pub fn is_ready(&self) -> bool {
        self.slot
            .lock()
            .map(|slot| {
                slot.pending
                    .as_ref()
                    .and_then(|f| f.peek())
                    .is_some_and(|result| result.is_ok())
            })
            .unwrap_or(false)
    }
}

// ============================================================================
// RESET HANDLE
// ============================================================================

/// Cloneable hook for the document source to signal "documents changed"
#[derive(Clone)]
pub struct ResetHandle {
    cache: Arc<IndexCache>,
}

impl ResetHandle {
    pub fn new(cache: Arc<IndexCache>) -> Self {
        Self { cache }
    }

    /// Invalidate the index; the next search rebuilds it
    pub fn reset(&self) {
        self.cache.invalidate();
    }
}

// ============================================================================
// TESTS
// ============================================================================
