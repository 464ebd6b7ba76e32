//! Test fixtures

pub mod fixtures;
