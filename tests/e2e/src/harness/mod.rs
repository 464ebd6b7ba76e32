//! Test harness

mod spec_dir;

pub use spec_dir::SpecDir;
