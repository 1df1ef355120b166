//! Structure-preserving sanitization of block data.
//!
//! The sanitizer trusts that the data already passed [`validate`](crate::validator::validate)
//! against the same rule map. It never re-checks types and never fails: values it
//! cannot match to a rule are copied through untouched. The output always has the
//! same keys, in the same order, as the input.
//!
//! License: MIT OR APACHE 2.0

use log::trace;
use serde_json::{Map, Value};

use crate::policy::SanitizationPolicy;
use crate::rules::{FieldType, RuleMap, RuleNode};

/// Returns a sanitized copy of `data`. String leaves are cleaned by `policy`
/// according to their rule's tag allowlist; nested containers are walked
/// with their nested rule map.
pub fn sanitize(rules: &RuleMap, data: &Value, policy: &dyn SanitizationPolicy) -> Value {
    match data {
        Value::Object(map) => Value::Object(sanitize_map(rules, map, policy)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match rules.wildcard() {
                    Some(node) => sanitize_value(node, item, policy),
                    None => item.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

fn sanitize_map(rules: &RuleMap, map: &Map<String, Value>, policy: &dyn SanitizationPolicy) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let cleaned = match rules.field(key) {
                Some(node) => sanitize_value(node, value, policy),
                None => value.clone(),
            };
            (key.clone(), cleaned)
        })
        .collect()
}

/// Sanitizes one value under its rule node.
pub fn sanitize_value(node: &RuleNode, value: &Value, policy: &dyn SanitizationPolicy) -> Value {
    match (node.field_type(), value) {
        (Some(FieldType::String), Value::String(text)) => {
            if node.passes_markup_through() {
                return value.clone();
            }
            trace!("Purifying string with allowed tags '{}'.", node.allowed_tags());
            Value::String(policy.purify(text, node.allowed_tags()))
        }
        (Some(FieldType::Array), Value::Object(_) | Value::Array(_)) => match &node.nested {
            Some(nested) => sanitize(nested, value, policy),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Upper-cases text and records every allowlist it was asked to apply.
    #[derive(Default)]
    struct RecordingPolicy {
        allowlists: Mutex<Vec<String>>,
    }

    impl SanitizationPolicy for RecordingPolicy {
        fn purify(&self, html: &str, allowed_tags: &str) -> String {
            self.allowlists.lock().unwrap().push(allowed_tags.to_string());
            html.to_uppercase()
        }
    }

    fn rules(value: Value) -> RuleMap {
        match value {
            Value::Object(map) => RuleMap::compile(&map).unwrap(),
            _ => panic!("rules fixture must be an object"),
        }
    }

    #[test]
    fn test_string_leaves_are_purified_with_their_allowlist() {
        let policy = RecordingPolicy::default();
        let rules = rules(json!({"text": {"type": "string", "allowedTags": "b,i"}, "caption": "string"}));
        let out = sanitize(&rules, &json!({"text": "a", "caption": "b"}), &policy);
        assert_eq!(out, json!({"text": "A", "caption": "B"}));
        assert_eq!(*policy.allowlists.lock().unwrap(), vec!["b,i".to_string(), String::new()]);
    }

    #[test]
    fn test_allow_all_markup_is_identity() {
        let policy = RecordingPolicy::default();
        let rules = rules(json!({"html": {"type": "string", "allowedTags": "*"}}));
        let data = json!({"html": "<script>x</script>"});
        assert_eq!(sanitize(&rules, &data, &policy), data);
        assert!(policy.allowlists.lock().unwrap().is_empty());
    }

    #[test]
    fn test_non_string_leaves_are_untouched() {
        let policy = RecordingPolicy::default();
        let rules = rules(json!({
            "level": "int",
            "stretched": "bool",
            "align": ["left", "right"],
            "url": {"type": "string", "required": false, "allow_null": true}
        }));
        let data = json!({"level": 2, "stretched": true, "align": "left", "url": null});
        assert_eq!(sanitize(&rules, &data, &policy), data);
    }

    #[test]
    fn test_nested_lists_and_maps_keep_shape_and_order() {
        let policy = RecordingPolicy::default();
        let rules = rules(json!({
            "style": "string",
            "items": {"type": "array", "data": {"-": {"type": "array", "data": {
                "content": "string",
                "meta": {"type": "array", "data": {"-": "int"}}
            }}}}
        }));
        let data = json!({
            "items": [{"meta": [1, 2], "content": "x"}, {"content": "y", "meta": []}],
            "style": "ordered"
        });
        let out = sanitize(&rules, &data, &policy);
        assert_eq!(
            out,
            json!({
                "items": [{"meta": [1, 2], "content": "X"}, {"content": "Y", "meta": []}],
                "style": "ORDERED"
            })
        );
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["items", "style"]);
        let inner: Vec<_> = out["items"][0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(inner, vec!["meta", "content"]);
    }

    #[test]
    fn test_input_is_not_modified() {
        let policy = RecordingPolicy::default();
        let rules = rules(json!({"text": "string"}));
        let data = json!({"text": "lower"});
        let _ = sanitize(&rules, &data, &policy);
        assert_eq!(data, json!({"text": "lower"}));
    }

    #[test]
    fn test_unmatched_values_are_copied() {
        let policy = RecordingPolicy::default();
        let rules = rules(json!({"text": "string", "items": {"type": "array", "data": {"x": "string"}}}));
        let data = json!({"text": 5, "items": ["no", "wildcard"], "extra": "kept"});
        assert_eq!(sanitize(&rules, &data, &policy), data);
    }
}
