//! rules.rs - Canonical rule descriptors and the rule expander.
//!
//! A schema may describe a field in three ways:
//!
//! * a bare type name: `"text": "string"`
//! * a list of literals, read as an enumeration of strings: `"align": ["left", "right"]`
//! * a full descriptor: `"text": { "type": "string", "allowedTags": "b,i" }`
//!
//! [`expand`] turns any of them into a [`RuleNode`]. Rule maps are expanded once,
//! when the schema is loaded, so shape errors surface before any document is seen.
//!
//! License: MIT OR APACHE 2.0

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::ConfigurationError;

/// Reserved rule-map key holding the rule for every element of a list.
pub const WILDCARD_KEY: &str = "-";

/// Allowed-tags value that disables sanitization of a string field.
pub const ALLOW_ALL_MARKUP: &str = "*";

/// Deepest rule nesting accepted when compiling a schema.
pub const MAX_RULE_DEPTH: usize = 64;

/// The value types a rule can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
    Boolean,
    Array,
}

impl FieldType {
    /// Maps a schema type tag onto a field type. Unrecognized tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::String),
            "integer" | "int" => Some(Self::Integer),
            "boolean" | "bool" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single expanded rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleNode {
    /// The type tag as written in the schema. Kept verbatim so that an unknown
    /// tag can be reported as such when a value reaches it.
    pub type_tag: String,
    pub required: bool,
    pub allow_null: bool,
    pub can_be_only: Option<Vec<Value>>,
    pub allowed_tags: Option<String>,
    pub nested: Option<RuleMap>,
}

impl RuleNode {
    /// A rule with the given type tag and default settings.
    pub fn of_type(tag: impl Into<String>) -> Self {
        Self {
            type_tag: tag.into(),
            required: true,
            allow_null: false,
            can_be_only: None,
            allowed_tags: None,
            nested: None,
        }
    }

    /// A string rule restricted to the given literals.
    pub fn enumeration(literals: Vec<Value>) -> Self {
        Self {
            can_be_only: Some(literals),
            ..Self::of_type(FieldType::String.as_str())
        }
    }

    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_tag(&self.type_tag)
    }

    /// True when a null value must be accepted without any type check.
    pub fn skips_null(&self) -> bool {
        !self.required && self.allow_null
    }

    /// The tag allowlist handed to the sanitization policy. Absent means
    /// "no markup at all".
    pub fn allowed_tags(&self) -> &str {
        self.allowed_tags.as_deref().unwrap_or("")
    }

    pub fn passes_markup_through(&self) -> bool {
        self.allowed_tags.as_deref() == Some(ALLOW_ALL_MARKUP)
    }
}

/// The rules for one level of block data: named fields, in schema order, plus
/// an optional wildcard rule for list elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleMap {
    fields: Vec<(String, RuleNode)>,
    wildcard: Option<Box<RuleNode>>,
}

impl RuleMap {
    /// Compiles the top-level rule map of a tool.
    pub fn compile_tool(tool: &str, raw: &Map<String, Value>) -> Result<Self, ConfigurationError> {
        Self::compile_at(raw, tool, 0)
    }

    /// Compiles a rule map that is not attached to any tool.
    pub fn compile(raw: &Map<String, Value>) -> Result<Self, ConfigurationError> {
        Self::compile_at(raw, "(rules)", 0)
    }

    fn compile_at(raw: &Map<String, Value>, location: &str, depth: usize) -> Result<Self, ConfigurationError> {
        if depth > MAX_RULE_DEPTH {
            return Err(ConfigurationError::InvalidRule {
                location: location.to_string(),
                reason: format!("rule nesting exceeds {} levels", MAX_RULE_DEPTH),
            });
        }

        let mut fields = Vec::with_capacity(raw.len());
        let mut wildcard = None;

        for (key, rule) in raw {
            let node = expand_at(rule, &format!("{}.{}", location, key), depth)?;
            if key == WILDCARD_KEY {
                wildcard = Some(Box::new(node));
            } else {
                fields.push((key.clone(), node));
            }
        }

        if wildcard.is_some() && !fields.is_empty() {
            return Err(ConfigurationError::WildcardCollision {
                location: location.to_string(),
            });
        }

        Ok(Self { fields, wildcard })
    }

    pub fn field(&self, key: &str) -> Option<&RuleNode> {
        self.fields.iter().find(|(name, _)| name == key).map(|(_, node)| node)
    }

    /// Named fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &RuleNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn wildcard(&self) -> Option<&RuleNode> {
        self.wildcard.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.wildcard.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The keyed descriptor form of a rule.
#[derive(Debug, Deserialize)]
struct RuleDescriptor {
    #[serde(rename = "type")]
    type_tag: Option<String>,
    #[serde(default = "default_required")]
    required: bool,
    #[serde(default, alias = "allowNull")]
    allow_null: bool,
    #[serde(default, rename = "canBeOnly")]
    can_be_only: Option<Value>,
    #[serde(default, rename = "allowedTags")]
    allowed_tags: Option<String>,
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

fn default_required() -> bool {
    true
}

/// Normalizes one schema rule into a [`RuleNode`].
///
/// Fails with [`ConfigurationError::InvalidRule`] when the rule is neither a
/// type name, a list of literals, nor a well-formed descriptor.
pub fn expand(rule: &Value) -> Result<RuleNode, ConfigurationError> {
    expand_at(rule, "(rule)", 0)
}

fn expand_at(rule: &Value, location: &str, depth: usize) -> Result<RuleNode, ConfigurationError> {
    match rule {
        Value::String(tag) => {
            warn_if_unhandled(tag, location);
            Ok(RuleNode::of_type(tag.as_str()))
        }
        Value::Array(literals) => Ok(RuleNode::enumeration(literals.clone())),
        Value::Object(map) => match list_shaped(map) {
            Some(literals) => Ok(RuleNode::enumeration(literals)),
            None => expand_descriptor(map, location, depth),
        },
        other => Err(ConfigurationError::InvalidRule {
            location: location.to_string(),
            reason: format!("cannot determine element type of the rule `{}`", other),
        }),
    }
}

fn expand_descriptor(map: &Map<String, Value>, location: &str, depth: usize) -> Result<RuleNode, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidRule {
        location: location.to_string(),
        reason,
    };

    let descriptor: RuleDescriptor =
        serde_json::from_value(Value::Object(map.clone())).map_err(|e| invalid(e.to_string()))?;

    let can_be_only = match descriptor.can_be_only {
        None => None,
        Some(Value::Array(literals)) => Some(literals),
        Some(Value::Object(literals)) => Some(
            list_shaped(&literals).ok_or_else(|| invalid("`canBeOnly` must be a list of literals".to_string()))?,
        ),
        Some(_) => return Err(invalid("`canBeOnly` must be a list of literals".to_string())),
    };

    let type_tag = match (descriptor.type_tag, &can_be_only) {
        (Some(tag), _) => tag,
        (None, Some(_)) => FieldType::String.as_str().to_string(),
        (None, None) => return Err(invalid("missing `type`".to_string())),
    };
    warn_if_unhandled(&type_tag, location);

    let field_type = FieldType::from_tag(&type_tag);
    let nested = match descriptor.data {
        Some(data) if field_type == Some(FieldType::Array) => Some(RuleMap::compile_at(&data, location, depth + 1)?),
        Some(_) => {
            warn!("Rule at `{}` declares `data` for non-array type `{}`; ignoring it.", location, type_tag);
            None
        }
        None => None,
    };

    if field_type == Some(FieldType::Array) && nested.is_none() && can_be_only.is_none() {
        return Err(invalid("array rule requires a `data` rule map".to_string()));
    }

    Ok(RuleNode {
        type_tag,
        required: descriptor.required,
        allow_null: descriptor.allow_null,
        can_be_only,
        allowed_tags: descriptor.allowed_tags,
        nested,
    })
}

/// Returns the values in key order when the map's keys are exactly `"0".."n-1"`.
fn list_shaped(map: &Map<String, Value>) -> Option<Vec<Value>> {
    if map.is_empty() {
        return None;
    }
    (0..map.len()).map(|index| map.get(&index.to_string()).cloned()).collect()
}

fn warn_if_unhandled(tag: &str, location: &str) {
    if FieldType::from_tag(tag).is_none() {
        warn!("Rule at `{}` declares unhandled type `{}`; values reaching it will be rejected.", location, tag);
    }
}
