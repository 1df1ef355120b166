//! errors.rs - Custom error types for the blockclean-core library.
//!
//! Three failure categories are kept apart all the way to the presentation
//! boundary: problems with the schema (`ConfigurationError`), problems with the
//! document envelope (`DocumentError`), and block data that does not match its
//! rule map (`ValidationError`). `BlockcleanError` wraps all three for callers
//! that only want a single error type.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use thiserror::Error;

use crate::rules::FieldType;

/// One step of a [`FieldPath`]: a named map key or a list position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a block's data, e.g. `items[2].text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The path of the block data itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child_key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// The schema is missing, malformed, or names the same tool twice.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[error("configuration data is empty")]
    Empty,

    #[error("configuration is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("tools not found in configuration")]
    MissingTools,

    #[error("duplicate tool `{0}` in configuration")]
    DuplicateTool(String),

    #[error("tool `{0}` not found in the configuration")]
    ToolNotFound(String),

    #[error("invalid rule at `{location}`: {reason}")]
    InvalidRule { location: String, reason: String },

    #[error("rule map at `{location}` mixes the wildcard `-` with named fields")]
    WildcardCollision { location: String },

    #[error("invalid engine options: {0}")]
    InvalidOptions(String),
}

/// The top-level document envelope is malformed.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("JSON is empty")]
    Empty,

    #[error("wrong JSON format: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("input is null")]
    Null,

    #[error("input is empty")]
    EmptyCollection,

    #[error("field `blocks` is missing")]
    MissingBlocks,

    #[error("`blocks` is not an array")]
    BlocksNotAList,

    #[error("block {index} must be an object")]
    BlockNotAContainer { index: usize },

    #[error("block {index} is malformed: {reason}")]
    InvalidBlock { index: usize, reason: String },
}

/// Why a value was rejected by the validator.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ValidationReason {
    MissingField,
    UnexpectedField,
    /// A list element was found but the rule map declares no wildcard rule.
    UnexpectedElement,
    NotAllowed { value: String, allowed: Vec<String> },
    TypeMismatch { expected: FieldType, found: &'static str },
    UnhandledType(String),
    DepthLimitExceeded { limit: usize },
}

/// Block data violates its rule map. Carries the path of the offending value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub tool: Option<String>,
    pub path: FieldPath,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(path: FieldPath, reason: ValidationReason) -> Self {
        Self { tool: None, path, reason }
    }

    /// Attaches the name of the tool whose rule map was being checked.
    pub fn for_tool(mut self, tool: &str) -> Self {
        self.tool = Some(tool.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tool) = &self.tool {
            write!(f, "block `{}`: ", tool)?;
        }
        let path = &self.path;
        match &self.reason {
            ValidationReason::MissingField => write!(f, "missing required field `{}`", path),
            ValidationReason::UnexpectedField => write!(f, "unexpected field `{}`", path),
            ValidationReason::UnexpectedElement => {
                write!(f, "unexpected element `{}`: no wildcard rule covers list positions", path)
            }
            ValidationReason::NotAllowed { value, allowed } => write!(
                f,
                "field `{}` has invalid value `{}`; allowed values: {}",
                path,
                value,
                allowed.join(", ")
            ),
            ValidationReason::TypeMismatch { expected: FieldType::Array, found } => {
                write!(f, "field `{}` must be an array or object, found {}", path, found)
            }
            ValidationReason::TypeMismatch { expected, found } => {
                write!(f, "field `{}` must be {}, found {}", path, expected, found)
            }
            ValidationReason::UnhandledType(tag) => {
                write!(f, "field `{}` has unhandled type `{}`", path, tag)
            }
            ValidationReason::DepthLimitExceeded { limit } => {
                write!(f, "field `{}` exceeds the maximum nesting depth of {}", path, limit)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// This enum represents all possible error types in the `blockclean-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BlockcleanError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}
