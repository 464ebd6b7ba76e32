//! Schema Property Walker
//!
//! Depth-first traversal of a request/response schema that emits one
//! [`PropertyDescriptor`] per nested property. Each descriptor carries the
//! tokens of its ancestors (operation, body/response role, parent property
//! names) plus its own name, title, description, type, format and enum
//! tokens.
//!
//! A schema is skipped while it is already on the current chain of
//! ancestors, keyed by the address of the resolved `Value`, so
//! self-referential and mutually-referential components terminate while a
//! component shared by sibling properties is expanded under each of them. Composite members (`allOf`/`anyOf`/`oneOf`)
//! contribute their properties at the composite's own depth.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::Value;

use crate::catalog::{ref_of, OperationCatalog};
use crate::text::{identifier_form, normalize};

const COMPOSITE_KEYWORDS: [&str; 3] = ["allOf", "anyOf", "oneOf"];

// ============================================================================
// PROPERTY DESCRIPTORS
// ============================================================================

/// One nested property discovered in a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Segments from the role root, e.g. `["requestBody", "owner", "name"]`
    pub path: Vec<String>,
    /// Inherited plus own tokens
    pub tokens: BTreeSet<String>,
}

impl PropertyDescriptor {
    /// Dotted form of the path (`requestBody.owner.name`)
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Descriptors keyed by path, in first-seen order
///
/// Re-encountering a path unions the token sets instead of adding a node.
#[derive(Debug, Default, Clone)]
pub struct PropertyAccumulator {
    descriptors: Vec<PropertyDescriptor>,
    positions: HashMap<Vec<String>, usize>,
}

impl PropertyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor or merge tokens into the existing one
    pub fn merge(&mut self, path: Vec<String>, tokens: &BTreeSet<String>) {
        match self.positions.get(&path) {
            Some(&i) => self.descriptors[i].tokens.extend(tokens.iter().cloned()),
            None => {
                self.positions.insert(path.clone(), self.descriptors.len());
                self.descriptors.push(PropertyDescriptor {
                    path,
                    tokens: tokens.clone(),
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, path: &[String]) -> Option<&PropertyDescriptor> {
        self.positions.get(path).map(|&i| &self.descriptors[i])
    }

    pub fn into_descriptors(self) -> Vec<PropertyDescriptor> {
        self.descriptors
    }
}

/// Identity-keyed set of the schemas on the current ancestor chain
pub type VisitedSet = HashSet<*const Value>;

// ============================================================================
// WALKER
// ============================================================================

/// Walks schemas of one document, resolving `$ref`s through the catalog
pub struct SchemaWalker<'a> {
    catalog: &'a dyn OperationCatalog,
    spec_name: &'a str,
}

impl<'a> SchemaWalker<'a> {
    pub fn new(catalog: &'a dyn OperationCatalog, spec_name: &'a str) -> Self {
        Self { catalog, spec_name }
    }

    /// Follow `$ref` chains to a concrete schema
    ///
    /// Unresolvable references and reference loops yield `None`.
    pub fn resolve(&self, schema: &'a Value) -> Option<&'a Value> {
        let mut current = schema;
        let mut followed: Vec<&str> = Vec::new();

        while let Some(reference) = ref_of(current) {
            if followed.contains(&reference) {
                tracing::debug!(reference, spec = self.spec_name, "Reference loop in schema");
                return None;
            }
            followed.push(reference);

            match self.catalog.resolve(self.spec_name, reference) {
                Some(target) => current = target,
                None => {
                    tracing::debug!(reference, spec = self.spec_name, "Unresolved schema reference");
                    return None;
                }
            }
        }

        Some(current)
    }

    /// Walk a schema, emitting descriptors below `base_path`
    pub fn walk(
        &self,
        schema: &'a Value,
        base_path: &[String],
        base_tokens: &BTreeSet<String>,
        acc: &mut PropertyAccumulator,
        visited: &mut VisitedSet,
    ) {
        let Some(resolved) = self.resolve(schema) else {
            return;
        };
        if !visited.insert(resolved as *const Value) {
            return;
        }

        for keyword in COMPOSITE_KEYWORDS {
            if let Some(members) = resolved.get(keyword).and_then(Value::as_array) {
                for member in members {
                    self.walk(member, base_path, base_tokens, acc, visited);
                }
            }
        }

        if let Some(properties) = resolved.get("properties").and_then(Value::as_object) {
            for (name, property_schema) in properties {
                let path = extend_path(base_path, name);

                let mut tokens = base_tokens.clone();
                tokens.extend(self.property_tokens(name, property_schema));
                acc.merge(path.clone(), &tokens);

                self.walk(property_schema, &path, &tokens, acc, visited);
            }
        }

        if let Some(additional) = resolved.get("additionalProperties").filter(|v| v.is_object()) {
            let path = extend_path(base_path, "additionalProperties");
            let mut tokens = base_tokens.clone();
            tokens.insert("additional".to_string());
            tokens.insert("properties".to_string());
            self.walk(additional, &path, &tokens, acc, visited);
        }

        match resolved.get("items") {
            Some(Value::Array(members)) => {
                for (index, member) in members.iter().enumerate() {
                    let path = extend_path(base_path, &format!("items{}", index));
                    self.walk(member, &path, base_tokens, acc, visited);
                }
            }
            Some(items @ Value::Object(_)) => {
                let path = extend_path(base_path, "items");
                self.walk(items, &path, base_tokens, acc, visited);
            }
            _ => {}
        }

        // Only ancestors stay marked, so sibling references expand fully
        visited.remove(&(resolved as *const Value));
    }

    /// Own tokens of a property: name, identifier form, and schema annotations
    fn property_tokens(&self, name: &str, property_schema: &'a Value) -> BTreeSet<String> {
        let mut tokens: BTreeSet<String> = normalize(name).into_iter().collect();
        if let Some(ident) = identifier_form(name) {
            tokens.insert(ident);
        }

        let Some(resolved) = self.resolve(property_schema) else {
            return tokens;
        };

        for key in ["title", "description", "format"] {
            if let Some(text) = resolved.get(key).and_then(Value::as_str) {
                tokens.extend(normalize(text));
            }
        }

        match resolved.get("type") {
            Some(Value::String(kind)) => tokens.extend(normalize(kind)),
            Some(Value::Array(kinds)) => {
                for kind in kinds.iter().filter_map(Value::as_str) {
                    tokens.extend(normalize(kind));
                }
            }
            _ => {}
        }

        if let Some(variants) = resolved.get("enum").and_then(Value::as_array) {
            for variant in variants {
                match variant {
                    Value::String(text) => tokens.extend(normalize(text)),
                    other => tokens.extend(normalize(&other.to_string())),
                }
            }
        }

        tokens
    }
}

fn extend_path(base: &[String], segment: &str) -> Vec<String> {
    let mut path = base.to_vec();
    path.push(segment.to_string());
    path
}

// ============================================================================
// TESTS
// ============================================================================
