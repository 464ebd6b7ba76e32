//! Spec directory watcher
//!
//! Bridges `notify` events into tokio. Bursts of events (editors often write
//! a file in several steps) are coalesced into one change notification.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::loader::is_spec_file;

/// Quiet period that ends a burst of events
const DEBOUNCE: Duration = Duration::from_millis(250);

/// Whether an event touches a spec file in a way that needs a reload
pub fn is_relevant(event: &Event) -> bool {
    let kind = &event.kind;
    (kind.is_create() || kind.is_modify() || kind.is_remove())
        && event.paths.iter().any(|path| is_spec_file(path))
}

/// Watches one directory for spec file changes
pub struct SpecWatcher {
    // Dropping the watcher stops event delivery
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<()>,
}

impl SpecWatcher {
    pub fn new(dir: &Path) -> anyhow::Result<Self> {
        let (tx, events) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) if is_relevant(&event) => {
                    // Receiver gone means the REPL is shutting down
                    let _ = tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Watch error: {}", e),
            }
        })
        .context("failed to create file watcher")?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", dir.display()))?;
        tracing::info!("Watching {} for changes", dir.display());

        Ok(Self {
            _watcher: watcher,
            events,
        })
    }

    /// Wait for the next burst of changes
    ///
    /// Returns `None` once the watcher has stopped.
    pub async fn changed(&mut self) -> Option<()> {
        self.events.recv().await?;
        while let Ok(Some(())) = tokio::time::timeout(DEBOUNCE, self.events.recv()).await {}
        Some(())
    }
}
