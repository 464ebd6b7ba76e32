//! Schema Module
//!
//! Recursive, cycle-safe extraction of property descriptors from
//! request and response schemas.

mod walker;

pub use walker::{PropertyAccumulator, PropertyDescriptor, SchemaWalker, VisitedSet};
