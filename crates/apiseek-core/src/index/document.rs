//! Document Builder
//!
//! Turns every operation of a catalog into indexable nodes:
//! - one operation node with tokens from method, paths, identifiers, tags,
//!   summary, description, parameters, request body and responses
//! - one property node per distinct schema property path found by the
//!   schema walker in the request body and in each response

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{OperationCatalog, OperationDescriptor};
use crate::embeddings::HashedEmbedding;
use crate::schema::{PropertyAccumulator, SchemaWalker, VisitedSet};
use crate::text::normalize;

/// Path segment rooting request-body properties
pub const REQUEST_BODY_SEGMENT: &str = "requestBody";

/// Path segment rooting response properties
pub const RESPONSE_SEGMENT: &str = "response";

// ============================================================================
// DOCUMENT NODES
// ============================================================================

/// Kind of an indexed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Operation,
    Property,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Operation => write!(f, "operation"),
            NodeKind::Property => write!(f, "property"),
        }
    }
}

/// The indexable unit
#[derive(Debug, Clone)]
pub struct DocumentNode {
    pub kind: NodeKind,
    /// Owning operation
    pub operation: Arc<OperationDescriptor>,
    /// Property path segments (property nodes only)
    pub property_path: Option<Vec<String>>,
    /// Non-empty tokens
    pub tokens: Vec<String>,
    /// Token → occurrences
    pub term_freq: HashMap<String, u32>,
    /// Token count
    pub length: usize,
    /// Absent when there are no tokens
    pub embedding: Option<HashedEmbedding>,
}

impl DocumentNode {
    pub fn new(
        kind: NodeKind,
        operation: Arc<OperationDescriptor>,
        property_path: Option<Vec<String>>,
        tokens: Vec<String>,
    ) -> Self {
        let tokens: Vec<String> = tokens.into_iter().filter(|t| !t.is_empty()).collect();

        let mut term_freq: HashMap<String, u32> = HashMap::new();
        for token in &tokens {
            *term_freq.entry(token.clone()).or_insert(0) += 1;
        }

        let embedding = HashedEmbedding::from_tokens(&tokens);

        Self {
            kind,
            operation,
            property_path,
            length: tokens.len(),
            tokens,
            term_freq,
            embedding,
        }
    }

    /// Identity of the node: `(method, path, propertyPath)`
    pub fn key(&self) -> (&str, &str, Option<String>) {
        (
            &self.operation.method,
            &self.operation.path,
            self.matched_property_path(),
        )
    }

    /// Dotted property path for property nodes
    pub fn matched_property_path(&self) -> Option<String> {
        self.property_path.as_ref().map(|path| path.join("."))
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Build operation and property nodes for every operation in the catalog
///
/// Nodes come out grouped per operation: the operation node first, then its
/// property nodes in discovery order. Nodes without tokens are kept here and
/// dropped by the index.
pub fn build_nodes(catalog: &dyn OperationCatalog) -> Vec<DocumentNode> {
    let mut nodes = Vec::new();

    for operation in catalog.operations() {
        let walker = SchemaWalker::new(catalog, &operation.spec_name);

        nodes.push(DocumentNode::new(
            NodeKind::Operation,
            Arc::clone(operation),
            None,
            operation_tokens(&walker, operation),
        ));

        for property in property_descriptors(&walker, operation).into_descriptors() {
            nodes.push(DocumentNode::new(
                NodeKind::Property,
                Arc::clone(operation),
                Some(property.path),
                property.tokens.into_iter().collect(),
            ));
        }
    }

    nodes
}

/// Request body: description plus the selected schema
struct BodyPart<'a> {
    description: Option<&'a str>,
    schema: Option<&'a Value>,
}

/// Locate the request body (OpenAPI 3 `requestBody` or Swagger 2 `in: body`)
fn request_body<'a>(
    walker: &SchemaWalker<'a>,
    operation: &'a OperationDescriptor,
) -> Option<BodyPart<'a>> {
    if let Some(body) = operation.request_body() {
        let body = walker.resolve(body)?;
        return Some(BodyPart {
            description: body.get("description").and_then(Value::as_str),
            schema: media_schema(body),
        });
    }

    operation
        .parameters()
        .iter()
        .filter_map(|param| walker.resolve(param))
        .find(|param| param.get("in").and_then(Value::as_str) == Some("body"))
        .map(|param| BodyPart {
            // Already tokenized with the parameters
            description: None,
            schema: param.get("schema"),
        })
}

/// Schema of a body/response: `application/json` media type, else the first
/// media type, else a Swagger 2 `schema`
fn media_schema(container: &Value) -> Option<&Value> {
    if let Some(content) = container.get("content").and_then(Value::as_object) {
        let media = content
            .get("application/json")
            .or_else(|| content.values().next())?;
        return media.get("schema");
    }
    container.get("schema")
}

/// Tokens of a schema's canonical JSON serialization
fn schema_tokens<'a>(walker: &SchemaWalker<'a>, schema: &'a Value) -> Vec<String> {
    let Some(resolved) = walker.resolve(schema) else {
        return Vec::new();
    };
    match serde_json::to_string(resolved) {
        Ok(json) => normalize(&json),
        Err(e) => {
            tracing::debug!("Schema serialization failed, tokenizing raw text: {}", e);
            normalize(&format!("{:?}", schema))
        }
    }
}

/// Raw token list of the operation node
fn operation_tokens<'a>(walker: &SchemaWalker<'a>, operation: &'a OperationDescriptor) -> Vec<String> {
    let mut tokens = Vec::new();

    tokens.extend(normalize(&operation.method));
    tokens.extend(normalize(&operation.path));
    tokens.extend(normalize(&operation.normalized_path));
    if let Some(id) = operation.operation_id() {
        tokens.extend(normalize(id));
    }
    for tag in operation.tags() {
        tokens.extend(normalize(tag));
    }
    if let Some(summary) = operation.summary() {
        tokens.extend(normalize(summary));
    }
    if let Some(description) = operation.description() {
        tokens.extend(normalize(description));
    }

    for param in operation.parameters() {
        let Some(param) = walker.resolve(param) else {
            continue;
        };
        for key in ["name", "in", "description"] {
            if let Some(text) = param.get(key).and_then(Value::as_str) {
                tokens.extend(normalize(text));
            }
        }
    }

    if let Some(body) = request_body(walker, operation) {
        if let Some(description) = body.description {
            tokens.extend(normalize(description));
        }
        if let Some(schema) = body.schema {
            tokens.extend(schema_tokens(walker, schema));
        }
    }

    if let Some(responses) = operation.responses() {
        for (status, response) in responses {
            tokens.extend(normalize(status));
            let Some(response) = walker.resolve(response) else {
                continue;
            };
            if let Some(description) = response.get("description").and_then(Value::as_str) {
                tokens.extend(normalize(description));
            }
            if let Some(schema) = media_schema(response) {
                tokens.extend(schema_tokens(walker, schema));
            }
        }
    }

    tokens.retain(|t| !t.is_empty());
    tokens
}

/// Tokens every property of an operation inherits: method and path
fn operation_context(operation: &OperationDescriptor) -> BTreeSet<String> {
    normalize(&operation.method)
        .into_iter()
        .chain(normalize(&operation.path))
        .collect()
}

/// Walk request body and responses, each with a fresh visited set
fn property_descriptors<'a>(
    walker: &SchemaWalker<'a>,
    operation: &'a OperationDescriptor,
) -> PropertyAccumulator {
    let mut acc = PropertyAccumulator::new();
    let context = operation_context(operation);

    if let Some(schema) = request_body(walker, operation).and_then(|body| body.schema) {
        let mut base_tokens = context.clone();
        base_tokens.extend(normalize("request body"));
        let mut visited = VisitedSet::new();
        walker.walk(
            schema,
            &[REQUEST_BODY_SEGMENT.to_string()],
            &base_tokens,
            &mut acc,
            &mut visited,
        );
    }

    if let Some(responses) = operation.responses() {
        for (status, response) in responses {
            let Some(schema) = walker.resolve(response).and_then(media_schema) else {
                continue;
            };
            let mut base_tokens = context.clone();
            base_tokens.extend(normalize(RESPONSE_SEGMENT));
            base_tokens.extend(normalize(status));
            let mut visited = VisitedSet::new();
            walker.walk(
                schema,
                &[RESPONSE_SEGMENT.to_string(), status.clone()],
                &base_tokens,
                &mut acc,
                &mut visited,
            );
        }
    }

    acc
}

// ============================================================================
// TESTS
// ============================================================================
