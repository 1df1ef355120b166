// blockclean-core/src/engine.rs
//! Defines `BlockEngine`, which ties a compiled schema to a sanitization policy.
//!
//! The engine resolves a block's rule map by its tool name, validates the block's
//! data against it, and produces sanitized copies. It holds no per-call state, so
//! one engine can be shared through an `Arc` and used from many threads at once.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::config::{BlockSchema, EngineOptions};
use crate::document::{Block, SanitizedBlock};
use crate::errors::{BlockcleanError, ConfigurationError};
use crate::policies::ammonia_policy::AmmoniaPolicy;
use crate::policy::SanitizationPolicy;
use crate::rules::RuleMap;
use crate::sanitizer;
use crate::validator;

pub struct BlockEngine {
    schema: BlockSchema,
    policy: Arc<dyn SanitizationPolicy>,
    options: EngineOptions,
}

impl fmt::Debug for BlockEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockEngine")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl BlockEngine {
    /// Creates an engine with the default options and the ammonia-backed policy.
    pub fn new(schema: BlockSchema) -> Self {
        Self::with_options(schema, EngineOptions::default())
    }

    pub fn with_options(schema: BlockSchema, options: EngineOptions) -> Self {
        Self::with_policy(schema, options, Arc::new(AmmoniaPolicy::new()))
    }

    /// Creates an engine that cleans strings with a caller-supplied policy.
    pub fn with_policy(schema: BlockSchema, options: EngineOptions, policy: Arc<dyn SanitizationPolicy>) -> Self {
        debug!(
            "BlockEngine created with {} tools and max depth {}.",
            schema.len(),
            options.max_depth
        );
        Self { schema, policy, options }
    }

    /// Parses a schema from JSON and builds an engine with default settings.
    pub fn from_json_str(schema_json: &str) -> Result<Self, ConfigurationError> {
        Ok(Self::new(BlockSchema::from_json_str(schema_json)?))
    }

    fn rules_for(&self, tool: &str) -> Result<&RuleMap, ConfigurationError> {
        self.schema
            .rules_for(tool)
            .ok_or_else(|| ConfigurationError::ToolNotFound(tool.to_string()))
    }

    /// Validates one block's data against the rules of `tool`.
    ///
    /// An unknown tool is a configuration error; a rule violation is a
    /// validation error tagged with the tool name.
    pub fn validate_block(&self, tool: &str, data: &Value) -> Result<(), BlockcleanError> {
        let rules = self.rules_for(tool)?;
        validator::validate_with_limit(rules, data, self.options.max_depth)
            .map_err(|e| e.for_tool(tool))?;
        debug!("Block `{}` passed validation.", tool);
        Ok(())
    }

    /// Returns a sanitized copy of one block. The data should already have
    /// passed [`validate_block`](Self::validate_block).
    pub fn sanitize_block(
        &self,
        tool: &str,
        data: &Value,
        tunes: Option<&Map<String, Value>>,
    ) -> Result<SanitizedBlock, ConfigurationError> {
        let rules = self.rules_for(tool)?;
        Ok(SanitizedBlock {
            block_type: tool.to_string(),
            data: sanitizer::sanitize(rules, data, self.policy.as_ref()),
            tunes: tunes.cloned().unwrap_or_default(),
        })
    }

    pub fn validate(&self, block: &Block) -> Result<(), BlockcleanError> {
        self.validate_block(&block.block_type, &block.data)
    }

    /// Validates and then sanitizes a block.
    pub fn sanitize(&self, block: &Block) -> Result<SanitizedBlock, BlockcleanError> {
        self.validate(block)?;
        Ok(self.sanitize_block(&block.block_type, &block.data, block.tunes.as_ref())?)
    }

    pub fn schema(&self) -> &BlockSchema {
        &self.schema
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}
