//! apiseek end-to-end test support
//!
//! - `mocks::fixtures`: API description documents and catalogs used across
//!   the journey and law tests
//! - `harness`: temporary spec directories on disk

pub mod harness;
pub mod mocks;

pub use harness::SpecDir;
pub use mocks::fixtures;
