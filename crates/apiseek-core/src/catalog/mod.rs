//! Catalog Module
//!
//! The engine's view of the API-description documents it searches:
//! - `OperationDescriptor`: one HTTP method bound to one path
//! - `OperationCatalog`: enumerable operations + same-document `$ref` resolution
//! - `InMemoryCatalog`: a catalog over parsed OpenAPI / Swagger JSON values
//!
//! Loading documents from disk is the caller's job; the catalog only sees
//! already-parsed `serde_json::Value`s.

mod pointer;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

pub use pointer::{ref_of, resolve_local_ref};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Path-item keys enumerated as operations, in enumeration order
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

static PATH_TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}/]*\}").expect("valid path template pattern"));

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Catalog construction errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Document root is not a JSON object
    #[error("Document '{0}' is not a JSON object")]
    NotAnObject(String),
    /// A document with this name is already loaded
    #[error("Document '{0}' is already loaded")]
    DuplicateDocument(String),
}

// ============================================================================
// OPERATION DESCRIPTOR
// ============================================================================

/// One operation of one API description document
///
/// Identity is `(method, path)`. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    /// Uppercase HTTP method
    pub method: String,
    /// Path exactly as written in the document
    pub path: String,
    /// Path after [`normalize_path`]
    pub normalized_path: String,
    /// Name of the owning document
    pub spec_name: String,
    /// Raw operation object (path-level parameters already merged in)
    pub operation: Value,
}

impl OperationDescriptor {
    /// Create a descriptor, normalizing method and path
    pub fn new(
        method: impl AsRef<str>,
        path: impl Into<String>,
        spec_name: impl Into<String>,
        operation: Value,
    ) -> Self {
        let path = path.into();
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            normalized_path: normalize_path(&path),
            path,
            spec_name: spec_name.into(),
            operation,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.operation.get(key).and_then(Value::as_str)
    }

    pub fn summary(&self) -> Option<&str> {
        self.str_field("summary")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.str_field("operationId")
    }

    pub fn tags(&self) -> Vec<&str> {
        self.operation
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn parameters(&self) -> &[Value] {
        self.operation
            .get("parameters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn request_body(&self) -> Option<&Value> {
        self.operation.get("requestBody")
    }

    pub fn responses(&self) -> Option<&Map<String, Value>> {
        self.operation.get("responses").and_then(Value::as_object)
    }

    /// Whether this descriptor answers a direct `METHOD /path` lookup
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method.eq_ignore_ascii_case(method) && self.normalized_path == normalize_path(path)
    }
}

/// Canonical path form used for matching
///
/// Lowercases, collapses repeated slashes, drops a trailing slash and
/// rewrites every `{param}` template to `{}`.
pub fn normalize_path(path: &str) -> String {
    let lowered = path.trim().to_lowercase();
    let templated = PATH_TEMPLATE.replace_all(&lowered, "{}");
    let segments: Vec<&str> = templated.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

// ============================================================================
// CATALOG TRAIT
// ============================================================================

/// Source of operations for one index build
pub trait OperationCatalog: Send + Sync {
    /// All operations, in a fixed order
    fn operations(&self) -> &[Arc<OperationDescriptor>];

    /// Resolve a reference within the named document
    ///
    /// Only same-document pointers resolve; a reference to itself does not.
    fn resolve(&self, spec_name: &str, reference: &str) -> Option<&Value>;
}

// ============================================================================
// IN-MEMORY CATALOG
// ============================================================================

/// Catalog over parsed OpenAPI 3 / Swagger 2 documents
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    documents: Vec<(String, Value)>,
    by_name: HashMap<String, usize>,
    operations: Vec<Arc<OperationDescriptor>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(name, document)` pairs, in order
    pub fn from_documents<I, S>(documents: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut catalog = Self::new();
        for (name, document) in documents {
            catalog.add_document(name, document)?;
        }
        Ok(catalog)
    }

    /// Add one document and enumerate its operations
    pub fn add_document(
        &mut self,
        name: impl Into<String>,
        document: Value,
    ) -> Result<(), CatalogError> {
        let name = name.into();
        if !document.is_object() {
            return Err(CatalogError::NotAnObject(name));
        }
        if self.by_name.contains_key(&name) {
            return Err(CatalogError::DuplicateDocument(name));
        }

        let found = enumerate_operations(&name, &document);
        tracing::debug!(document = %name, operations = found.len(), "Catalog document added");

        self.operations.extend(found.into_iter().map(Arc::new));
        self.by_name.insert(name.clone(), self.documents.len());
        self.documents.push((name, document));
        Ok(())
    }

    /// Names of loaded documents, in load order
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|(name, _)| name.as_str())
    }

    /// Root value of a loaded document
    pub fn document(&self, name: &str) -> Option<&Value> {
        self.by_name.get(name).map(|&i| &self.documents[i].1)
    }

    /// Number of loaded documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl OperationCatalog for InMemoryCatalog {
    fn operations(&self) -> &[Arc<OperationDescriptor>] {
        &self.operations
    }

    fn resolve(&self, spec_name: &str, reference: &str) -> Option<&Value> {
        let root = self.document(spec_name)?;
        resolve_local_ref(root, reference)
    }
}

/// Enumerate `paths.<path>.<method>` of one document
fn enumerate_operations(name: &str, root: &Value) -> Vec<OperationDescriptor> {
    let Some(paths) = root.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut operations = Vec::new();
    for (path, item) in paths {
        let item = match ref_of(item) {
            Some(reference) => match resolve_local_ref(root, reference) {
                Some(resolved) => resolved,
                None => continue,
            },
            None => item,
        };

        let shared_params = item.get("parameters").and_then(Value::as_array);

        for method in HTTP_METHODS {
            let Some(operation) = item.get(method).filter(|op| op.is_object()) else {
                continue;
            };
            let mut operation = operation.clone();
            if let Some(shared) = shared_params {
                merge_parameters(root, &mut operation, shared);
            }
            operations.push(OperationDescriptor::new(method, path.as_str(), name, operation));
        }
    }
    operations
}

/// Merge path-level parameters into an operation; the operation wins on `(name, in)`
fn merge_parameters(root: &Value, operation: &mut Value, shared: &[Value]) {
    let key_of = |param: &Value| -> Option<(String, String)> {
        let resolved = match ref_of(param) {
            Some(reference) => resolve_local_ref(root, reference)?,
            None => param,
        };
        Some((
            resolved.get("name")?.as_str()?.to_string(),
            resolved.get("in")?.as_str()?.to_string(),
        ))
    };

    let mut merged: Vec<Value> = operation
        .get("parameters")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let existing: HashSet<(String, String)> = merged.iter().filter_map(key_of).collect();

    for param in shared {
        match key_of(param) {
            Some(key) if existing.contains(&key) => {}
            _ => merged.push(param.clone()),
        }
    }

    if let Some(object) = operation.as_object_mut() {
        if !merged.is_empty() {
            object.insert("parameters".to_string(), Value::Array(merged));
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
