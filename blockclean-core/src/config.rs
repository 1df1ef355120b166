//! Configuration management for `blockclean-core`.
//!
//! This module loads the block schema (`{ "tools": { "<blockType>": { ... } } }`),
//! compiling every tool's rule map once, and the engine options that tune how
//! documents are checked. Schemas are JSON; engine options are YAML.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::errors::ConfigurationError;
use crate::rules::RuleMap;

/// Default limit on how deeply block data containers may nest.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Settings for a [`BlockEngine`](crate::engine::BlockEngine).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Deepest container nesting accepted in block data.
    pub max_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineOptions {
    /// Parses engine options from YAML. Missing fields keep their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigurationError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: EngineOptions =
            serde_yml::from_str(text).map_err(|e| ConfigurationError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Loads engine options from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading engine options from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?;
        let options = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse options file {}", path.display()))?;
        debug!("Engine options: {:?}", options);
        Ok(options)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_depth == 0 {
            return Err(ConfigurationError::InvalidOptions(
                "`max_depth` must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Compiled rule maps for every known tool. Built once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockSchema {
    tools: BTreeMap<String, RuleMap>,
}

impl BlockSchema {
    /// Parses and compiles a schema from its JSON source.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigurationError> {
        if text.trim().is_empty() {
            return Err(ConfigurationError::Empty);
        }
        let source: SchemaSource = serde_json::from_str(text).map_err(ConfigurationError::Parse)?;
        let tools = source.tools.ok_or(ConfigurationError::MissingTools)?;
        Self::from_tools(tools)
    }

    /// Loads a schema from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading block schema from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file {}", path.display()))?;
        let schema = Self::from_json_str(&text)
            .with_context(|| format!("Failed to load schema file {}", path.display()))?;
        Ok(schema)
    }

    /// Compiles a ready mapping of tool name to raw rule map.
    ///
    /// Entries are taken in order; a name seen twice is a configuration error.
    pub fn from_tools<I, K>(tools: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut compiled = BTreeMap::new();

        for (name, raw) in tools {
            let name = name.into();
            if compiled.contains_key(&name) {
                return Err(ConfigurationError::DuplicateTool(name));
            }
            let Value::Object(rules) = raw else {
                return Err(ConfigurationError::InvalidRule {
                    location: name,
                    reason: "a tool's rules must be an object".to_string(),
                });
            };
            debug!("Compiling rules for tool '{}' ({} entries).", name, rules.len());
            let rule_map = RuleMap::compile_tool(&name, &rules)?;
            compiled.insert(name, rule_map);
        }

        if compiled.is_empty() {
            warn!("Schema declares no tools; every block will be rejected.");
        }
        info!("Loaded {} tools into the block schema.", compiled.len());

        Ok(Self { tools: compiled })
    }

    pub fn rules_for(&self, tool: &str) -> Option<&RuleMap> {
        self.tools.get(tool)
    }

    pub fn contains(&self, tool: &str) -> bool {
        self.tools.contains_key(tool)
    }

    /// Tool names in sorted order.
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// The parts of the schema document we read. `tools` keeps every entry, in
/// order and including repeats, so duplicates can be reported; a decoded JSON
/// map would silently keep only the last one.
struct SchemaSource {
    tools: Option<Vec<(String, Value)>>,
}

impl<'de> Deserialize<'de> for SchemaSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SourceVisitor;

        impl<'de> Visitor<'de> for SourceVisitor {
            type Value = SchemaSource;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a schema object with a `tools` map")
            }

            fn visit_unit<E: de::Error>(self) -> Result<SchemaSource, E> {
                Ok(SchemaSource { tools: None })
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SchemaSource, A::Error> {
                let mut tools = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "tools" {
                        tools = map.next_value::<Option<ToolEntries>>()?.map(|entries| entries.0);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(SchemaSource { tools })
            }
        }

        deserializer.deserialize_any(SourceVisitor)
    }
}

struct ToolEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for ToolEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = ToolEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of tool names to rule maps")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ToolEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, rules)) = map.next_entry::<String, Value>()? {
                    entries.push((name, rules));
                }
                Ok(ToolEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
