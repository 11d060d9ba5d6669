//! Schema Documents
//!
//! Parsed representations of the three source documents (objects,
//! responses, methods) plus the recursive property node model, the type
//! resolver and the cross-reference index. Parsing goes through
//! `serde_path_to_error` so a malformed fragment reports the JSON path it
//! sits at.

pub mod index;
pub mod method;
pub mod node;
pub mod resolve;

pub use index::RefIndex;
pub use method::{ApiError, Method, MethodItem, MethodResponses};
pub use node::{Items, Kind, PropertyNode, TypeTag};
pub use resolve::{ResolveCtx, DYNAMIC_TYPE, NO_DESCRIPTION};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{GenError, Result};

/// Which source document a definition set came from. Determines the output
/// directory, the canonical category-key function and the resolution
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKind {
    Objects,
    Responses,
    Methods,
}

impl DocKind {
    /// Output directory (and generated module) name for this document.
    pub fn dir_name(&self) -> &'static str {
        match self {
            DocKind::Objects => "objects",
            DocKind::Responses => "responses",
            DocKind::Methods => "methods",
        }
    }

    /// The canonical category key of a definition name. Used by both the
    /// classification pass and the dispatch loop; these must never diverge.
    pub fn category_key<'a>(&self, name: &'a str) -> &'a str {
        match self {
            DocKind::Methods => crate::naming::method_category(name),
            _ => crate::naming::object_category(name),
        }
    }

    /// Resolution context for this document pass.
    pub fn resolve_ctx(&self) -> ResolveCtx<'static> {
        match self {
            DocKind::Objects => ResolveCtx::objects(),
            DocKind::Responses => ResolveCtx::responses(),
            DocKind::Methods => ResolveCtx::methods(),
        }
    }
}

/// An objects or responses document: a titled table of named definitions.
#[derive(Debug, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub definitions: IndexMap<String, PropertyNode>,
}

impl SchemaDocument {
    /// Parse a document from already-loaded bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        parse_document(bytes)
    }
}

/// The methods document: error constants plus the method list.
#[derive(Debug, Deserialize)]
pub struct MethodsDocument {
    #[serde(default)]
    pub errors: Vec<ApiError>,

    #[serde(default)]
    pub methods: Vec<Method>,
}

impl MethodsDocument {
    /// Parse the methods document from already-loaded bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        parse_document(bytes)
    }
}

fn parse_document<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        let path = e.path().to_string();
        GenError::SchemaParse {
            path,
            source: e.into_inner(),
        }
    })
}
