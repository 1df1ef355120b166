// blockclean-core/src/lib.rs
//! # BlockClean Core Library
//!
//! `blockclean-core` checks block documents (Editor.js-style block lists) against
//! a schema and rewrites their string content so that only permitted markup
//! survives. It compiles a schema's rules once, validates each block's data
//! against its tool's rule map, and produces sanitized copies of identical shape.
//!
//! The library is pure: it performs no I/O beyond the optional file-loading
//! helpers and keeps no process-wide state.
//!
//! ## Modules
//!
//! * `config`: Loads the `BlockSchema` and the `EngineOptions`.
//! * `rules`: Expands schema rules into `RuleNode`s and `RuleMap`s.
//! * `validator`: Fail-fast structural and type validation of block data.
//! * `sanitizer`: Structure-preserving rewriting of string leaves.
//! * `policy`: Defines the `SanitizationPolicy` trait.
//! * `policies`: Concrete policies, such as the ammonia-backed `AmmoniaPolicy`.
//! * `sanitizers`: Compilation and caching of tag allowlists.
//! * `document`: Parses the document envelope into `Block`s.
//! * `engine`: `BlockEngine`, which resolves tools and runs validation and sanitization.
//! * `editor`: `Editor`, the document-level facade.
//! * `headless`: One-shot helpers for non-interactive use.
//! * `errors`: The error taxonomy.
//!
//! ## Usage Example
//!
//! ```rust
//! use blockclean_core::Editor;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let schema = r#"{"tools": {"paragraph": {"text": {"type": "string", "allowedTags": "b,i"}}}}"#;
//!     let document = r#"{"blocks": [{"type": "paragraph", "data": {"text": "<script>x</script><b>ok</b>"}}]}"#;
//!
//!     let editor = Editor::new(document, schema)?;
//!     let blocks = editor.sanitized_blocks()?;
//!     assert_eq!(blocks[0].data["text"], "<b>ok</b>");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Schema problems are `ConfigurationError`s, envelope problems are
//! `DocumentError`s and rule violations are `ValidationError`s carrying the
//! path of the offending value. `BlockcleanError` wraps all three. The
//! `headless` helpers collapse them into `anyhow::Error`.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod document;
pub mod editor;
pub mod engine;
pub mod errors;
pub mod headless;
pub mod policies;
pub mod policy;
pub mod rules;
pub mod sanitizer;
pub mod sanitizers;
pub mod validator;

/// Re-exports the schema and option types.
pub use config::{BlockSchema, EngineOptions, DEFAULT_MAX_DEPTH};

/// Re-exports the error taxonomy.
pub use errors::{
    BlockcleanError, ConfigurationError, DocumentError, FieldPath, PathSegment, ValidationError,
    ValidationReason,
};

/// Re-exports the rule model.
pub use rules::{expand, FieldType, RuleMap, RuleNode, ALLOW_ALL_MARKUP, WILDCARD_KEY};

pub use validator::{validate, validate_with_limit};
pub use sanitizer::{sanitize, sanitize_value};

/// Re-exports the policy trait and its default implementation.
pub use policy::SanitizationPolicy;
pub use policies::ammonia_policy::AmmoniaPolicy;

pub use document::{Block, Document, SanitizedBlock};
pub use engine::BlockEngine;
pub use editor::Editor;

/// Re-exports functions for one-shot, non-interactive use.
pub use headless::{headless_clean_document, headless_clean_document_with_options};

pub use sanitizers::compiler::{compile_allowed_tags, CompiledMarkup, MarkupCache};
