//! apiseek CLI library
//!
//! The document-loading side of apiseek: reads API description files from a
//! directory into a catalog, watches the directory for changes and renders
//! results for the terminal. The binary in `main.rs` is a thin clap layer
//! over these modules.

pub mod loader;
pub mod output;
pub mod watch;

pub use loader::{load_directory, reload, LoadError, LoadSummary, LoadedDirectory};
