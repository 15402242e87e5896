//! Structural skeleton reconciliation.
//!
//! Answer-format templates must describe the *shape* of an answer without
//! leaking its literal content. [`reconcile`] merges a stored template
//! against a richer target value and produces a value with exactly the
//! target's shape, every leaf erased to [`PLACEHOLDER`].
//!
//! One rule here is deliberate and easy to "fix" by mistake: literal
//! content survives only when the whole template equals the whole target.
//! Equal nested primitives are still erased. The output is a content-free
//! shape template, not a diff.

use serde_json::{Map, Value};

/// Sentinel leaf denoting "structurally present, content erased".
pub const PLACEHOLDER: &str = "_";

/// Merges `template` against `target`, producing a shape-matching skeleton.
///
/// Pure and total: there is no failure case. The result always has the
/// target's exact shape - same array lengths, same object keys in the
/// same order - with every leaf either carried over verbatim (only when
/// `template == target`) or erased to [`PLACEHOLDER`].
///
/// # Examples
///
/// ```
/// use jsonsalvage::reconcile::reconcile;
/// use serde_json::json;
///
/// // Identical values pass through unchanged.
/// let v = json!({"a": [1, 2]});
/// assert_eq!(reconcile(&v, &v), v);
///
/// // Anything else is erased to the target's shape.
/// let template = json!({"a": 1});
/// let target = json!({"a": 1, "b": [true, "x"]});
/// assert_eq!(reconcile(&template, &target), json!({"a": "_", "b": ["_", "_"]}));
/// ```
pub fn reconcile(template: &Value, target: &Value) -> Value {
    // The whole-value shortcut applies only here, at the top. The
    // recursive descent never re-checks equality, so equal nested
    // primitives still get erased.
    if template == target {
        return template.clone();
    }
    merge_shape(template, target)
}

fn merge_shape(template: &Value, target: &Value) -> Value {
    if is_empty_shell(template) {
        return placeholder_of(target);
    }

    match (template, target) {
        (Value::Array(tmpl), Value::Array(tgt)) => Value::Array(
            tgt.iter()
                .enumerate()
                .map(|(i, item)| match tmpl.get(i) {
                    Some(t) => merge_shape(t, item),
                    // Target longer than template: no shape to follow.
                    None => placeholder_of(item),
                })
                .collect(),
        ),
        (Value::Object(tmpl), Value::Object(tgt)) => {
            let mut merged = Map::new();
            for (key, item) in tgt {
                let value = match tmpl.get(key) {
                    Some(t) => merge_shape(t, item),
                    None => placeholder_of(item),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        // Scalar vs scalar, scalar vs structure, or container mismatch:
        // no template shape to follow, erase to the target's shape.
        _ => placeholder_of(target),
    }
}

/// Deep copy of `value` with every scalar leaf replaced by
/// [`PLACEHOLDER`]; arrays and objects keep their shape and nesting.
pub fn placeholder_of(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(placeholder_of).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), placeholder_of(v)))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Value::String(PLACEHOLDER.to_string())
        }
    }
}

/// `true` for the "empty" templates that request a full skeleton of the
/// target: empty array, empty object, or the absence-of-value marker.
fn is_empty_shell(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => false,
    }
}
