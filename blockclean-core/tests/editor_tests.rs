// blockclean-core/tests/editor_tests.rs
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use std::thread;
use test_log::test;

use blockclean_core::{
    headless_clean_document, BlockEngine, BlockcleanError, ConfigurationError, DocumentError, Editor,
};

const SCHEMA: &str = r#"{
    "tools": {
        "paragraph": {"text": {"type": "string", "allowedTags": "b,i,a[href],mark"}},
        "header": {"text": "string", "level": {"type": "int", "canBeOnly": [1, 2, 3]}},
        "checklist": {"items": {"type": "array", "data": {"-": {"type": "array", "data": {
            "text": {"type": "string", "allowedTags": "b"},
            "checked": "bool"
        }}}}}
    }
}"#;

const DOCUMENT: &str = r#"{
    "time": 1700000000000,
    "blocks": [
        {"id": "h1", "type": "header", "data": {"text": "<b>Title</b>", "level": 2}},
        {"id": "p1", "type": "paragraph", "data": {"text": "Read <a href=\"https://example.com\" onclick=\"x()\">this</a> <mark>now</mark>"}, "tunes": {"align": "left"}},
        {"id": "c1", "type": "checklist", "data": {"items": [
            {"text": "<b>done</b><u>!</u>", "checked": true},
            {"text": "todo", "checked": false}
        ]}}
    ],
    "version": "2.28.0"
}"#;

#[test]
fn test_editor_cleans_a_full_document() -> Result<()> {
    let editor = Editor::new(DOCUMENT, SCHEMA)?;
    let blocks = editor.sanitized_blocks()?;

    let types: Vec<_> = blocks.iter().map(|b| b.block_type.as_str()).collect();
    assert_eq!(types, vec!["header", "paragraph", "checklist"]);

    assert_eq!(blocks[0].data["text"], "Title");
    assert_eq!(blocks[0].data["level"], 2);
    assert!(blocks[0].tunes.is_empty());

    let paragraph = blocks[1].data["text"].as_str().unwrap_or_default();
    assert!(paragraph.starts_with("Read <a "), "got {}", paragraph);
    assert!(!paragraph.contains("onclick"), "got {}", paragraph);
    assert!(paragraph.ends_with("<mark>now</mark>"), "got {}", paragraph);
    assert_eq!(blocks[1].tunes.get("align"), Some(&json!("left")));

    assert_eq!(
        blocks[2].data,
        json!({"items": [{"text": "<b>done</b>!", "checked": true}, {"text": "todo", "checked": false}]})
    );
    Ok(())
}

#[test]
fn test_unknown_tool_rejects_the_document() {
    let err = Editor::new(r#"{"blocks": [{"type": "quote", "data": {"text": "x"}}]}"#, SCHEMA).unwrap_err();
    assert!(matches!(err, BlockcleanError::Configuration(ConfigurationError::ToolNotFound(ref t)) if t == "quote"));
    assert_eq!(err.to_string(), "configuration error: tool `quote` not found in the configuration");
}

#[test]
fn test_one_bad_block_rejects_the_document() {
    let document = r#"{"blocks": [
        {"type": "paragraph", "data": {"text": "fine"}},
        {"type": "header", "data": {"text": "T", "level": 7}}
    ]}"#;
    let err = Editor::new(document, SCHEMA).unwrap_err();
    assert!(matches!(err, BlockcleanError::Validation(ref e) if e.path.to_string() == "level"));
}

#[test]
fn test_document_envelope_errors() {
    let cases: [(&str, fn(&DocumentError) -> bool); 5] = [
        ("  ", |e| matches!(e, DocumentError::Empty)),
        ("{\"blocks\": [", |e| matches!(e, DocumentError::Parse(_))),
        ("{}", |e| matches!(e, DocumentError::EmptyCollection)),
        ("{\"time\": 1}", |e| matches!(e, DocumentError::MissingBlocks)),
        ("{\"blocks\": {}}", |e| matches!(e, DocumentError::BlocksNotAList)),
    ];
    for (input, check) in cases {
        match Editor::new(input, SCHEMA) {
            Err(BlockcleanError::Document(ref e)) if check(e) => {}
            other => panic!("unexpected result for {:?}: {:?}", input, other.map(|_| ())),
        }
    }
}

#[test]
fn test_engine_is_shared_across_threads() -> Result<()> {
    let engine = Arc::new(BlockEngine::from_json_str(SCHEMA)?);
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || -> Result<String, BlockcleanError> {
                let document = format!(
                    r#"{{"blocks": [{{"type": "paragraph", "data": {{"text": "<script>x</script><i>{}</i>"}}}}]}}"#,
                    n
                );
                let editor = Editor::with_engine(engine, &document)?;
                let blocks = editor.sanitized_blocks()?;
                Ok(blocks[0].data["text"].as_str().unwrap_or_default().to_string())
            })
        })
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let text = handle.join().expect("worker panicked")?;
        assert_eq!(text, format!("<i>{}</i>", n));
    }
    Ok(())
}

#[test]
fn test_headless_serializes_blocks() -> Result<()> {
    let blocks = headless_clean_document(SCHEMA, DOCUMENT)?;
    let value = serde_json::to_value(&blocks)?;
    assert_eq!(value[1]["tunes"], json!({"align": "left"}));
    assert_eq!(value[2]["type"], "checklist");
    Ok(())
}
