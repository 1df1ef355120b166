// blockclean-core/tests/validation_tests.rs
use anyhow::Result;
use serde_json::{json, Value};
use test_log::test;

use blockclean_core::{
    validate, BlockEngine, BlockSchema, BlockcleanError, EngineOptions, PathSegment, RuleMap, ValidationReason,
};

fn rules(value: Value) -> RuleMap {
    match value {
        Value::Object(map) => RuleMap::compile(&map).expect("rule fixture compiles"),
        _ => panic!("rule fixture must be an object"),
    }
}

#[test]
fn test_conformant_editor_blocks_pass() -> Result<()> {
    let rules = rules(json!({
        "style": ["ordered", "unordered"],
        "items": {"type": "array", "data": {"-": {"type": "string", "allowedTags": "b"}}},
        "meta": {"type": "array", "required": false, "data": {"counter": "int", "visible": "bool"}}
    }));
    validate(&rules, &json!({"style": "ordered", "items": ["one", "<b>two</b>"]}))?;
    validate(&rules, &json!({"style": "unordered", "items": [], "meta": {"counter": 1, "visible": true}}))?;
    Ok(())
}

#[test]
fn test_enumeration_rejects_unlisted_value() {
    let rules = rules(json!({"align": ["left", "center", "right"]}));
    let err = validate(&rules, &json!({"align": "up"})).unwrap_err();
    assert_eq!(err.path.to_string(), "align");
    assert!(matches!(err.reason, ValidationReason::NotAllowed { ref value, .. } if value == "\"up\""));
    assert!(err.to_string().contains("align"));
}

#[test]
fn test_enumeration_accepts_exactly_its_literals() {
    let rules = rules(json!({"kind": {"canBeOnly": ["a", "b"]}}));
    assert!(validate(&rules, &json!({"kind": "a"})).is_ok());
    assert!(validate(&rules, &json!({"kind": "b"})).is_ok());
    assert!(validate(&rules, &json!({"kind": "c"})).is_err());
    assert!(validate(&rules, &json!({"kind": "A"})).is_err());
}

#[test]
fn test_nullable_optional_string() {
    let rules = rules(json!({"caption": {"type": "string", "required": false, "allowNull": true}}));
    assert!(validate(&rules, &json!({})).is_ok());
    assert!(validate(&rules, &json!({"caption": null})).is_ok());
    assert!(validate(&rules, &json!({"caption": "text"})).is_ok());
    assert!(validate(&rules, &json!({"caption": 5})).is_err());
    assert!(validate(&rules, &json!({"caption": ["x"]})).is_err());
}

#[test]
fn test_list_element_failure_names_its_position() {
    let rules = rules(json!({"items": {"type": "array", "data": {"-": {"type": "string"}}}}));
    let err = validate(&rules, &json!({"items": ["a", "b", 3]})).unwrap_err();
    assert_eq!(
        err.path.segments(),
        &[PathSegment::Key("items".to_string()), PathSegment::Index(2)]
    );
    assert_eq!(err.path.to_string(), "items[2]");
}

#[test]
fn test_required_fields_inside_list_data_are_missing() {
    let rules = rules(json!({"file": {"type": "array", "data": {"url": "string"}}}));
    let err = validate(&rules, &json!({"file": ["https://example.com/a.png"]})).unwrap_err();
    assert_eq!(err.reason, ValidationReason::MissingField);
    assert_eq!(err.path.to_string(), "file.url");
}

#[test]
fn test_engine_validates_through_the_schema() -> Result<()> {
    let engine = BlockEngine::from_json_str(
        r#"{"tools": {"header": {"text": "string", "level": "int"}, "delimiter": {}}}"#,
    )?;
    engine.validate_block("header", &json!({"text": "Title", "level": 1}))?;
    engine.validate_block("delimiter", &json!({}))?;
    engine.validate_block("delimiter", &json!([]))?;

    let err = engine.validate_block("delimiter", &json!({"x": 1})).unwrap_err();
    assert_eq!(err.to_string(), "validation error: block `delimiter`: unexpected field `x`");
    Ok(())
}

#[test]
fn test_adversarial_nesting_is_a_depth_failure() -> Result<()> {
    let schema = BlockSchema::from_json_str(
        r#"{"tools": {"tree": {"node": {"type": "array", "data": {"-": {"type": "array", "data": {"-": {"type": "array", "data": {"-": "string"}}}}}}}}}"#,
    )?;
    let engine = BlockEngine::with_options(schema, EngineOptions { max_depth: 2 });

    assert!(engine.validate_block("tree", &json!({"node": [[]]})).is_ok());
    let err = engine.validate_block("tree", &json!({"node": [[["x"]]]})).unwrap_err();
    match err {
        BlockcleanError::Validation(e) => {
            assert_eq!(e.reason, ValidationReason::DepthLimitExceeded { limit: 2 });
            assert_eq!(e.path.to_string(), "node[0][0]");
        }
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}
