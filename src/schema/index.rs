//! Cross-Reference Index
//!
//! A frozen name-to-definition lookup built from the objects document in a
//! single pass, before any concurrent phase starts. The responses pass
//! consumes it read-only to inline the properties of referenced objects
//! into union nodes whose branches are bare references.

use indexmap::IndexMap;

use super::node::{Kind, PropertyNode};
use super::resolve::{self, ResolveCtx};
use crate::error::{GenError, Result};

/// Properties and required-field names gathered while inlining through the
/// index. The required list spans the union node itself, its branches, and
/// every inlined definition.
pub type InlinedSchema = (IndexMap<String, PropertyNode>, Vec<String>);

/// Read-only lookup from definition name to objects-document definition.
///
/// Built once, frozen before responses resolution begins, never mutated
/// afterwards; workers in the emission phase share it by reference.
#[derive(Debug, Default)]
pub struct RefIndex {
    definitions: IndexMap<String, PropertyNode>,
}

impl RefIndex {
    /// Build the index from the objects document's definitions table.
    pub fn build(definitions: &IndexMap<String, PropertyNode>) -> Self {
        Self {
            definitions: definitions.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a definition by name. A missing name is a
    /// [`GenError::ReferenceResolution`] and aborts the run for the
    /// document being resolved.
    pub fn lookup(&self, name: &str) -> Result<&PropertyNode> {
        self.definitions
            .get(name)
            .ok_or_else(|| GenError::ReferenceResolution(name.to_string()))
    }

    /// The definition name a `$ref` string points at (its last `/`
    /// segment).
    pub fn ref_target(reference: &str) -> &str {
        reference.rsplit('/').next().unwrap_or(reference)
    }

    /// Resolved properties and required names of the named definition,
    /// inlining through one extra level when the definition is itself a
    /// union of references whose own property map comes back empty.
    pub fn definition_schema(&self, name: &str) -> Result<InlinedSchema> {
        let definition = self.lookup(name)?;
        let ctx = ResolveCtx::objects();
        let props = resolve::properties(definition, &ctx);
        let mut required = resolve::required_names(definition);

        // An object definition (or a union that already flattened into
        // fields) is done. A union of bare references resolves to synthetic
        // placeholder fields only; expand those through the index once.
        if definition.kind() != Kind::Union {
            return Ok((props, required));
        }

        let mut merged = IndexMap::new();

        for branch in definition.union_branches() {
            match branch.kind() {
                Kind::Reference => {
                    if let Some(r) = &branch.reference {
                        let target = Self::ref_target(r);
                        let inner = self.lookup(target)?;
                        for (k, v) in resolve::properties(inner, &ctx) {
                            merged.insert(k, v);
                        }
                        required.extend(resolve::required_names(inner));
                    }
                }
                Kind::Object | Kind::Union => {
                    for (k, v) in resolve::properties(branch, &ctx) {
                        merged.insert(k, v);
                    }
                }
                _ => {}
            }
        }

        Ok((merged, required))
    }

    /// Merged properties and required names of a union node under `ctx`,
    /// with reference branches inlined from the index instead of
    /// contributing synthetic placeholder fields. Non-union nodes fall back
    /// to the plain resolver.
    pub fn inlined_schema(&self, node: &PropertyNode, ctx: &ResolveCtx) -> Result<InlinedSchema> {
        if node.kind() != Kind::Union {
            return Ok((resolve::properties(node, ctx), resolve::required_names(node)));
        }

        let mut merged = IndexMap::new();
        let mut required = resolve::required_names(node);

        for branch in node.union_branches() {
            match branch.kind() {
                Kind::Reference => {
                    if let Some(r) = &branch.reference {
                        let target = Self::ref_target(r);
                        let (props, req) = self.definition_schema(target)?;
                        for (k, v) in props {
                            merged.insert(k, v);
                        }
                        required.extend(req);
                    }
                }
                Kind::Object | Kind::Union => {
                    for (k, v) in resolve::properties(branch, ctx) {
                        merged.insert(k, v);
                    }
                }
                _ => {}
            }
        }

        Ok((merged, required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions(json: &str) -> IndexMap<String, PropertyNode> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_lookup_missing_is_error() {
        let index = RefIndex::build(&definitions(r#"{}"#));
        let err = index.lookup("base_error").unwrap_err();
        assert!(matches!(err, GenError::ReferenceResolution(name) if name == "base_error"));
    }

    #[test]
    fn test_inline_reference_branch() {
        let index = RefIndex::build(&definitions(
            r#"{
                "base_error": {
                    "type": "object",
                    "properties": {
                        "error_code": {"type": "integer"},
                        "error_msg": {"type": "string"}
                    }
                }
            }"#,
        ));

        let union: PropertyNode = serde_json::from_str(
            r##"{"allOf": [
                {"$ref": "objects.json#/definitions/base_error"},
                {"type": "object", "properties": {"count": {"type": "integer"}}}
            ]}"##,
        )
        .unwrap();

        let (props, _) = index
            .inlined_schema(&union, &ResolveCtx::responses())
            .unwrap();

        assert!(props.contains_key("error_code"));
        assert!(props.contains_key("error_msg"));
        assert!(props.contains_key("count"));
        assert!(!props.contains_key("BaseError"), "placeholder must be inlined");
    }

    #[test]
    fn test_inline_carries_required_names() {
        // The referenced object's own required list survives inlining.
        let index = RefIndex::build(&definitions(
            r#"{
                "base_error": {
                    "type": "object",
                    "properties": {
                        "error_code": {"type": "integer"},
                        "error_msg": {"type": "string"}
                    },
                    "required": ["error_code"]
                }
            }"#,
        ));

        let union: PropertyNode = serde_json::from_str(
            r##"{"allOf": [
                {"$ref": "objects.json#/definitions/base_error"},
                {"type": "object", "properties": {"count": {"type": "integer"}}, "required": ["count"]}
            ]}"##,
        )
        .unwrap();

        let (_, required) = index
            .inlined_schema(&union, &ResolveCtx::responses())
            .unwrap();

        assert!(required.iter().any(|r| r == "error_code"));
        assert!(required.iter().any(|r| r == "count"));
        assert!(!required.iter().any(|r| r == "error_msg"));
    }

    #[test]
    fn test_inline_recurses_one_level() {
        // base_all is itself a union of references: resolving its properties
        // directly yields placeholders, so inlining must go one level deeper.
        let index = RefIndex::build(&definitions(
            r##"{
                "base_error": {
                    "type": "object",
                    "properties": {"error_code": {"type": "integer"}},
                    "required": ["error_code"]
                },
                "base_all": {
                    "allOf": [{"$ref": "#/definitions/base_error"}]
                }
            }"##,
        ));

        let union: PropertyNode = serde_json::from_str(
            r##"{"allOf": [{"$ref": "objects.json#/definitions/base_all"}]}"##,
        )
        .unwrap();

        let (props, required) = index
            .inlined_schema(&union, &ResolveCtx::responses())
            .unwrap();

        assert!(props.contains_key("error_code"));
        assert!(required.iter().any(|r| r == "error_code"));
    }

    #[test]
    fn test_inline_dangling_ref_is_error() {
        let index = RefIndex::build(&definitions(r#"{}"#));

        let union: PropertyNode = serde_json::from_str(
            r##"{"allOf": [{"$ref": "objects.json#/definitions/missing_thing"}]}"##,
        )
        .unwrap();

        let err = index
            .inlined_schema(&union, &ResolveCtx::responses())
            .unwrap_err();
        assert!(matches!(err, GenError::ReferenceResolution(_)));
    }
}
