//! Property Node Model
//!
//! The recursive in-memory representation of one schema element, together
//! with the closed [`Kind`] discriminant derived from node structure.
//! Custom wrappers absorb the two polymorphic fields of the source dialect:
//! `type` may be a string or a list, and `items` may be a single schema or
//! a fixed-size tuple of schemas.

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Canonical type kind of a schema node, computed by fixed precedence:
/// explicit `allOf`/`oneOf` wins over explicit `$ref`, which wins over an
/// explicit `type`, which wins over inferred-object (non-empty
/// `properties`), else `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Primitive,
    Array,
    Object,
    Reference,
    Union,
    Unknown,
}

/// Wrapper for the schema `type` field, which is either a single tag string
/// or a list of tags (the "multiple" scalar fallback). Any other JSON shape
/// is a parse error carrying the offending fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Single(String),
    Multiple,
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Single(s) => s.as_str(),
            TypeTag::Multiple => "multiple",
        }
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(TypeTag::Single(s)),
            serde_json::Value::Array(_) => Ok(TypeTag::Multiple),
            other => Err(de::Error::custom(format!(
                "unrecognized `type` value: {other}"
            ))),
        }
    }
}

/// Wrapper for the schema `items` field: a single child schema, or a
/// fixed-size tuple of child schemas.
#[derive(Debug, Clone)]
pub enum Items {
    Single(Box<PropertyNode>),
    Tuple(Vec<PropertyNode>),
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.is_array() {
            let nodes = Vec::<PropertyNode>::deserialize(value).map_err(de::Error::custom)?;
            Ok(Items::Tuple(nodes))
        } else {
            let node = PropertyNode::deserialize(value).map_err(de::Error::custom)?;
            Ok(Items::Single(Box::new(node)))
        }
    }
}

/// One schema element. Top-level entries of a document's `definitions`
/// table are nodes too; nesting happens through `properties`, `items` and
/// the union branch lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyNode {
    #[serde(rename = "type", default)]
    pub type_tag: Option<TypeTag>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "allOf", default)]
    pub all_of: Vec<PropertyNode>,

    #[serde(rename = "oneOf", default)]
    pub one_of: Vec<PropertyNode>,

    #[serde(default)]
    pub properties: IndexMap<String, PropertyNode>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "enum_names", alias = "enumNames", default)]
    pub enum_names: Vec<String>,

    #[serde(default)]
    pub items: Option<Items>,

    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
}

impl PropertyNode {
    /// Derive the canonical kind of this node. Pure: depends on node
    /// structure alone.
    pub fn kind(&self) -> Kind {
        if !self.all_of.is_empty() || !self.one_of.is_empty() {
            return Kind::Union;
        }

        if self.reference.is_some() {
            return Kind::Reference;
        }

        if let Some(tag) = &self.type_tag {
            return match tag.as_str() {
                "array" => Kind::Array,
                "object" => Kind::Object,
                _ => Kind::Primitive,
            };
        }

        if !self.properties.is_empty() {
            return Kind::Object;
        }

        Kind::Unknown
    }

    /// Union branches in declaration order: `allOf` when present, otherwise
    /// `oneOf`. Empty for non-union nodes.
    pub fn union_branches(&self) -> &[PropertyNode] {
        if !self.all_of.is_empty() {
            &self.all_of
        } else {
            &self.one_of
        }
    }
}
