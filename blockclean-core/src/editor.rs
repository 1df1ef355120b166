//! Document-level facade: parse a document, validate every block, hand out
//! sanitized blocks.
//!
//! Construction fails on the first problem found, so an `Editor` that exists
//! always holds a fully validated document.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info};
use std::sync::Arc;

use crate::document::{Block, Document, SanitizedBlock};
use crate::engine::BlockEngine;
use crate::errors::BlockcleanError;

#[derive(Debug, Clone)]
pub struct Editor {
    engine: Arc<BlockEngine>,
    blocks: Vec<Block>,
}

impl Editor {
    /// Builds an engine from `schema_json`, then parses and validates `document_json`.
    ///
    /// The schema is loaded first, so a broken schema is reported even when the
    /// document is broken too.
    pub fn new(document_json: &str, schema_json: &str) -> Result<Self, BlockcleanError> {
        let engine = BlockEngine::from_json_str(schema_json)?;
        Self::with_engine(Arc::new(engine), document_json)
    }

    /// Parses and validates `document_json` with an existing engine.
    pub fn with_engine(engine: Arc<BlockEngine>, document_json: &str) -> Result<Self, BlockcleanError> {
        let blocks = Document::parse(document_json)?.into_blocks();
        for (index, block) in blocks.iter().enumerate() {
            debug!("Validating block {} (`{}`).", index, block.block_type);
            engine.validate(block)?;
        }
        info!("Validated {} blocks.", blocks.len());
        Ok(Self { engine, blocks })
    }

    /// The validated blocks as they appeared in the document.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Sanitized copies of every block, in document order.
    pub fn sanitized_blocks(&self) -> Result<Vec<SanitizedBlock>, BlockcleanError> {
        self.blocks
            .iter()
            .map(|block| {
                self.engine
                    .sanitize_block(&block.block_type, &block.data, block.tunes.as_ref())
                    .map_err(BlockcleanError::from)
            })
            .collect()
    }

    pub fn engine(&self) -> &BlockEngine {
        &self.engine
    }
}
