//! Spec Directory Loader
//!
//! Reads every `*.json` file of a directory (sorted by file name) into an
//! [`InMemoryCatalog`]. The document name is the file stem. Files that cannot
//! be read or parsed are logged and skipped; only an unreadable directory is
//! an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use apiseek_core::{CatalogError, InMemoryCatalog, OperationCatalog, SearchEngine};
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Why a single file was skipped
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} has no usable file name")]
    BadName { path: PathBuf },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// ============================================================================
// LOADING
// ============================================================================

/// Outcome of loading a directory, without the catalog itself
#[derive(Debug, Default, Serialize)]
pub struct LoadSummary {
    /// Document names, in load order
    pub loaded: Vec<String>,
    /// Human-readable reasons for skipped files
    pub skipped: Vec<String>,
    /// Operations across all loaded documents
    pub operations: usize,
}

/// A loaded catalog with its summary
#[derive(Debug)]
pub struct LoadedDirectory {
    pub catalog: InMemoryCatalog,
    pub summary: LoadSummary,
}

/// `*.json` files directly inside `dir`, sorted by file name
pub fn spec_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read spec directory {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_spec_file(path))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Whether a path looks like an API description document
pub fn is_spec_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_document(path: &Path) -> Result<(String, Value), LoadError> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| LoadError::BadName {
            path: path.to_path_buf(),
        })?
        .to_string();

    let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((name, document))
}

/// Load every spec file of `dir` into a fresh catalog
pub fn load_directory(dir: &Path) -> anyhow::Result<LoadedDirectory> {
    let mut catalog = InMemoryCatalog::new();
    let mut summary = LoadSummary::default();

    for path in spec_files(dir)? {
        let result = read_document(&path).and_then(|(name, document)| {
            catalog.add_document(name.clone(), document)?;
            Ok(name)
        });

        match result {
            Ok(name) => summary.loaded.push(name),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                summary.skipped.push(e.to_string());
            }
        }
    }

    summary.operations = catalog.operations().len();
    tracing::info!(
        documents = summary.loaded.len(),
        skipped = summary.skipped.len(),
        operations = summary.operations,
        "Spec directory loaded"
    );

    Ok(LoadedDirectory { catalog, summary })
}

/// Load `dir` and swap the result into `engine`
pub fn reload(engine: &SearchEngine, dir: &Path) -> anyhow::Result<LoadSummary> {
    let LoadedDirectory { catalog, summary } = load_directory(dir)?;
    engine
        .replace_catalog(Arc::new(catalog))
        .context("failed to install reloaded catalog")?;
    Ok(summary)
}

// ============================================================================
// TESTS
// ============================================================================
