//! Structural and type validation of block data against a rule map.
//!
//! Validation is fail-fast: the first violation aborts the walk and is returned
//! with the path of the offending value. Checks run per container level in this
//! order: required fields, undeclared fields, then every value in document order.
//!
//! License: MIT OR APACHE 2.0

use log::trace;
use serde_json::{Map, Value};

use crate::config::DEFAULT_MAX_DEPTH;
use crate::errors::{FieldPath, ValidationError, ValidationReason};
use crate::rules::{FieldType, RuleMap, RuleNode};

/// Validates `data` against `rules` with the default nesting limit.
pub fn validate(rules: &RuleMap, data: &Value) -> Result<(), ValidationError> {
    validate_with_limit(rules, data, DEFAULT_MAX_DEPTH)
}

/// Validates `data` against `rules`, rejecting containers nested deeper than `max_depth`.
pub fn validate_with_limit(rules: &RuleMap, data: &Value, max_depth: usize) -> Result<(), ValidationError> {
    check_container(rules, data, &FieldPath::root(), 0, max_depth)
}

fn check_container(
    rules: &RuleMap,
    data: &Value,
    path: &FieldPath,
    depth: usize,
    max_depth: usize,
) -> Result<(), ValidationError> {
    if depth > max_depth {
        return Err(ValidationError::new(
            path.clone(),
            ValidationReason::DepthLimitExceeded { limit: max_depth },
        ));
    }

    match data {
        Value::Object(map) => check_map(rules, map, path, depth, max_depth),
        Value::Array(items) => check_list(rules, items, path, depth, max_depth),
        other => Err(ValidationError::new(
            path.clone(),
            ValidationReason::TypeMismatch {
                expected: FieldType::Array,
                found: json_kind(other),
            },
        )),
    }
}

fn check_map(
    rules: &RuleMap,
    map: &Map<String, Value>,
    path: &FieldPath,
    depth: usize,
    max_depth: usize,
) -> Result<(), ValidationError> {
    for (key, node) in rules.fields() {
        if node.required && !map.contains_key(key) {
            return Err(ValidationError::new(path.child_key(key), ValidationReason::MissingField));
        }
    }

    for key in map.keys() {
        if rules.field(key).is_none() {
            return Err(ValidationError::new(path.child_key(key), ValidationReason::UnexpectedField));
        }
    }

    for (key, value) in map {
        let field_path = path.child_key(key);
        let node = rules
            .field(key)
            .ok_or_else(|| ValidationError::new(field_path.clone(), ValidationReason::UnexpectedField))?;
        check_value(node, value, &field_path, depth, max_depth)?;
    }

    Ok(())
}

fn check_list(
    rules: &RuleMap,
    items: &[Value],
    path: &FieldPath,
    depth: usize,
    max_depth: usize,
) -> Result<(), ValidationError> {
    // A list has no named keys, so every required field is absent.
    if let Some((key, _)) = rules.fields().find(|(_, node)| node.required) {
        return Err(ValidationError::new(path.child_key(key), ValidationReason::MissingField));
    }

    for (index, value) in items.iter().enumerate() {
        let element_path = path.child_index(index);
        let node = rules
            .wildcard()
            .ok_or_else(|| ValidationError::new(element_path.clone(), ValidationReason::UnexpectedElement))?;
        check_value(node, value, &element_path, depth, max_depth)?;
    }

    Ok(())
}

fn check_value(
    node: &RuleNode,
    value: &Value,
    path: &FieldPath,
    depth: usize,
    max_depth: usize,
) -> Result<(), ValidationError> {
    trace!("Checking `{}` against `{}` rule.", path, node.type_tag);

    // An enumeration is the only constraint on its value.
    if let Some(allowed) = &node.can_be_only {
        if allowed.iter().any(|literal| literal == value) {
            return Ok(());
        }
        return Err(ValidationError::new(
            path.clone(),
            ValidationReason::NotAllowed {
                value: value.to_string(),
                allowed: allowed.iter().map(Value::to_string).collect(),
            },
        ));
    }

    if node.skips_null() && value.is_null() {
        return Ok(());
    }

    let Some(field_type) = node.field_type() else {
        return Err(ValidationError::new(
            path.clone(),
            ValidationReason::UnhandledType(node.type_tag.clone()),
        ));
    };

    let matches = match field_type {
        FieldType::String => value.is_string(),
        FieldType::Integer => value.is_i64() || value.is_u64(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Array => {
            if value.is_array() || value.is_object() {
                let empty = RuleMap::default();
                let nested = node.nested.as_ref().unwrap_or(&empty);
                return check_container(nested, value, path, depth + 1, max_depth);
            }
            false
        }
    };

    if matches {
        Ok(())
    } else {
        Err(ValidationError::new(
            path.clone(),
            ValidationReason::TypeMismatch {
                expected: field_type,
                found: json_kind(value),
            },
        ))
    }
}

/// Human-readable name of a JSON value's kind, used in error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
