//! Temporary Spec Directory
//!
//! A scratch directory of API description files that is removed on drop.
//! Journeys write documents into it, load it with the CLI loader and then
//! rewrite files to exercise reloads.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use apiseek_cli::{load_directory, LoadSummary};
use apiseek_core::{ConfigSource, SearchEngine};
use serde_json::Value;
use tempfile::TempDir;

/// A spec directory that lives as long as the value
pub struct SpecDir {
    dir: TempDir,
}

impl SpecDir {
    /// Create an empty directory
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Create a directory holding the given `(name, document)` pairs
    pub fn with_documents<'a, I>(documents: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let dir = Self::new()?;
        for (name, document) in documents {
            dir.write(name, &document)?;
        }
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `<name>.json`, replacing any previous content
    pub fn write(&self, name: &str, document: &Value) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(document)?;
        fs::write(self.file(name), text)?;
        Ok(())
    }

    /// Write raw text under an exact file name
    pub fn write_raw(&self, file_name: &str, content: &str) -> anyhow::Result<()> {
        fs::write(self.path().join(file_name), content)?;
        Ok(())
    }

    /// Remove `<name>.json`
    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        fs::remove_file(self.file(name))?;
        Ok(())
    }

    /// Load the directory into a fresh engine
    pub fn engine(&self, config: ConfigSource) -> anyhow::Result<(SearchEngine, LoadSummary)> {
        let loaded = load_directory(self.path())?;
        Ok((
            SearchEngine::with_config(Arc::new(loaded.catalog), config),
            loaded.summary,
        ))
    }

    fn file(&self, name: &str) -> std::path::PathBuf {
        self.path().join(format!("{}.json", name))
    }
}
