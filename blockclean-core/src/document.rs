//! Parsing and envelope checks for block documents.
//!
//! A document is `{ "blocks": [ { "type": ..., "data": ..., "tunes"?: ... }, ... ] }`.
//! The envelope is checked in a fixed order so that the first problem found is
//! always the one reported: emptiness, JSON syntax, null, empty collection,
//! missing `blocks`, `blocks` not a list, then each entry.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::DocumentError;

/// One unit of a document: a tool type, its data and optional presentation tunes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub block_type: String,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunes: Option<Map<String, Value>>,
}

/// A block after sanitization. `tunes` is always present, empty when the
/// source block had none.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SanitizedBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub data: Value,
    pub tunes: Map<String, Value>,
}

/// A parsed document whose envelope and blocks are well-formed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Parses a document from its JSON text.
    pub fn parse(json: &str) -> Result<Self, DocumentError> {
        if json.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        let value: Value = serde_json::from_str(json).map_err(DocumentError::Parse)?;
        Self::from_value(value)
    }

    /// Checks an already decoded document.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let mut envelope = match value {
            Value::Null => return Err(DocumentError::Null),
            Value::Object(map) if map.is_empty() => return Err(DocumentError::EmptyCollection),
            Value::Array(items) if items.is_empty() => return Err(DocumentError::EmptyCollection),
            Value::Object(map) => map,
            _ => return Err(DocumentError::MissingBlocks),
        };

        let entries = match envelope.remove("blocks") {
            None | Some(Value::Null) => return Err(DocumentError::MissingBlocks),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(DocumentError::BlocksNotAList),
        };

        // Every entry must be a container before any of them is decoded.
        if let Some(index) = entries.iter().position(|entry| !(entry.is_object() || entry.is_array())) {
            return Err(DocumentError::BlockNotAContainer { index });
        }

        let blocks = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| decode_block(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Parsed document with {} blocks.", blocks.len());
        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn decode_block(index: usize, entry: Value) -> Result<Block, DocumentError> {
    let invalid = |reason: &str| DocumentError::InvalidBlock {
        index,
        reason: reason.to_string(),
    };

    let Value::Object(mut fields) = entry else {
        return Err(invalid("a block must be an object, not a list"));
    };

    let block_type = match fields.remove("type") {
        Some(Value::String(name)) => name,
        Some(_) => return Err(invalid("`type` must be a string")),
        None => return Err(invalid("field `type` is missing")),
    };

    let data = match fields.remove("data") {
        Some(data @ (Value::Object(_) | Value::Array(_))) => data,
        Some(_) => return Err(invalid("`data` must be an object or a list")),
        None => return Err(invalid("field `data` is missing")),
    };

    let tunes = match fields.remove("tunes") {
        None | Some(Value::Null) => None,
        Some(Value::Object(tunes)) => Some(tunes),
        Some(_) => return Err(invalid("`tunes` must be an object")),
    };

    Ok(Block { block_type, data, tunes })
}
