// blockclean-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for cleaning a whole document in one call (non-UI).
//!
//! These collapse the error taxonomy into `anyhow::Error` with context, for
//! callers that only need a message to show or log.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::{BlockSchema, EngineOptions};
use crate::document::SanitizedBlock;
use crate::editor::Editor;
use crate::engine::BlockEngine;

/// Validates and sanitizes a document against a schema, both given as JSON text.
///
/// # Arguments
///
/// * `schema_json` - The `{ "tools": { ... } }` schema source.
/// * `document_json` - The `{ "blocks": [ ... ] }` document.
pub fn headless_clean_document(schema_json: &str, document_json: &str) -> Result<Vec<SanitizedBlock>> {
    headless_clean_document_with_options(schema_json, document_json, EngineOptions::default())
}

/// Same as [`headless_clean_document`], with explicit engine options.
pub fn headless_clean_document_with_options(
    schema_json: &str,
    document_json: &str,
    options: EngineOptions,
) -> Result<Vec<SanitizedBlock>> {
    let schema = BlockSchema::from_json_str(schema_json).context("Invalid block schema")?;
    let engine = Arc::new(BlockEngine::with_options(schema, options));
    let editor = Editor::with_engine(engine, document_json).context("Document rejected")?;
    let blocks = editor.sanitized_blocks().context("Sanitization failed")?;
    Ok(blocks)
}
