//! Same-document `$ref` resolution
//!
//! Only fragment references (`#/components/schemas/Todo`) are followed.
//! External files and URLs resolve to nothing, as does a reference whose
//! target is the reference itself.

use serde_json::Value;

/// Resolve a same-document JSON pointer reference against a document root
pub fn resolve_local_ref<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;

    let target = if pointer.is_empty() {
        root
    } else {
        root.pointer(pointer)?
    };

    if ref_of(target) == Some(reference) {
        tracing::debug!(reference, "Refusing self-referencing $ref");
        return None;
    }

    Some(target)
}

/// The `$ref` string of a schema-like value, if any
pub fn ref_of(value: &Value) -> Option<&str> {
    value.get("$ref").and_then(Value::as_str)
}
