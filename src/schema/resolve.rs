//! Type Resolver
//!
//! Pure functions computing target type names, descriptions and merged
//! property maps from a node plus a resolution context. The context is an
//! immutable value constructed once per document pass and passed by
//! parameter; nothing here touches shared state.

use indexmap::IndexMap;

use super::node::{Items, Kind, PropertyNode};
use crate::naming::convert_name;

/// Sentinel used verbatim in generated doc comments when a schema node
/// carries no description.
pub const NO_DESCRIPTION: &str = "NO DESCRIPTION IN JSON SCHEMA";

/// The dynamic/any fallback type for nodes the dialect cannot express more
/// precisely (tuple items, bare objects used as field types, unknowns).
pub const DYNAMIC_TYPE: &str = "Value";

/// Resolution context for one document pass.
///
/// `strip_prefix` drops any document-qualifying prefix from resolved
/// reference names (used when generating the objects module itself, where
/// references are module-local). `add_prefix` qualifies bare references
/// that point into a different document than `current_doc`.
#[derive(Debug, Clone, Copy)]
pub struct ResolveCtx<'a> {
    pub strip_prefix: bool,
    pub add_prefix: Option<&'a str>,
    pub current_doc: &'a str,
}

impl<'a> ResolveCtx<'a> {
    /// Context for the objects document: references stay bare.
    pub fn objects() -> Self {
        Self {
            strip_prefix: true,
            add_prefix: None,
            current_doc: "objects",
        }
    }

    /// Context for the responses document: bare references point into the
    /// objects module and are qualified accordingly.
    pub fn responses() -> Self {
        Self {
            strip_prefix: false,
            add_prefix: Some("objects"),
            current_doc: "responses",
        }
    }

    /// Context for the methods document: references carry their source
    /// document in the `$ref` string and are qualified from it.
    pub fn methods() -> Self {
        Self {
            strip_prefix: false,
            add_prefix: None,
            current_doc: "methods",
        }
    }
}

/// Fixed mapping from primitive schema tags to target type names.
///
/// `number` maps to `f64` (held consistent crate-wide); a multi-type list
/// falls back to the scalar `String`; `interface` and anything unrecognized
/// fall back to the dynamic type.
pub fn scalar_type(tag: &str) -> &'static str {
    match tag {
        "integer" => "i64",
        "string" => "String",
        "boolean" => "bool",
        "number" => "f64",
        "multiple" => "String",
        _ => DYNAMIC_TYPE,
    }
}

/// The literal description of a node, or the [`NO_DESCRIPTION`] sentinel.
pub fn description(node: &PropertyNode) -> &str {
    match node.description.as_deref() {
        Some(d) if !d.is_empty() => d,
        _ => NO_DESCRIPTION,
    }
}

/// Resolve the target type names of a node.
///
/// Union nodes contribute one name per branch in order, without
/// deduplication; every other kind resolves to exactly one name.
pub fn target_types(node: &PropertyNode, ctx: &ResolveCtx) -> Vec<String> {
    match node.kind() {
        Kind::Union => node
            .union_branches()
            .iter()
            .flat_map(|branch| target_types(branch, ctx))
            .collect(),
        Kind::Reference => match &node.reference {
            Some(r) => vec![ref_type_name(r, ctx)],
            None => vec![DYNAMIC_TYPE.to_string()],
        },
        Kind::Array => vec![array_type(node, ctx)],
        Kind::Object => vec![DYNAMIC_TYPE.to_string()],
        Kind::Primitive => {
            let tag = node.type_tag.as_ref().map(|t| t.as_str()).unwrap_or("");
            vec![scalar_type(tag).to_string()]
        }
        Kind::Unknown => vec![DYNAMIC_TYPE.to_string()],
    }
}

/// Resolve a node to a single target type name. For unions this is the
/// concatenation of all branch names (documented behavior, not
/// deduplicated).
pub fn target_type(node: &PropertyNode, ctx: &ResolveCtx) -> String {
    target_types(node, ctx).concat()
}

/// The element type of an array node: the single `items` schema resolved
/// recursively, or the dynamic fallback for tuple items (and for arrays
/// without any `items` at all).
pub fn array_type(node: &PropertyNode, ctx: &ResolveCtx) -> String {
    let element = match &node.items {
        Some(Items::Single(item)) => target_type(item, ctx),
        Some(Items::Tuple(_)) | None => DYNAMIC_TYPE.to_string(),
    };

    format!("Vec<{element}>")
}

/// The bare (unqualified) type name a reference resolves to: the last `/`
/// segment of the ref converted to a PascalCase identifier.
pub fn base_ref_name(reference: &str) -> String {
    let last = reference.rsplit('/').next().unwrap_or(reference);
    convert_name(last)
}

/// The document prefix of a reference: the part before `#`, truncated at
/// its first `.` ("objects.json#/definitions/x" -> "objects"). Empty for
/// bare same-document refs.
pub fn ref_document(reference: &str) -> &str {
    let head = reference.split('#').next().unwrap_or("");
    head.split('.').next().unwrap_or("")
}

/// Resolve a reference string to a target type name under `ctx`.
///
/// With `strip_prefix` the name is always bare. Otherwise a document
/// prefix carried by the ref itself qualifies the name (unless it names
/// the current document), and a bare ref is qualified with `add_prefix`
/// when that differs from the current document.
pub fn ref_type_name(reference: &str, ctx: &ResolveCtx) -> String {
    let base = base_ref_name(reference);

    if ctx.strip_prefix {
        return base;
    }

    let doc = ref_document(reference);
    if !doc.is_empty() && doc != ctx.current_doc {
        return format!("{doc}::{base}");
    }

    if doc.is_empty() {
        if let Some(prefix) = ctx.add_prefix {
            if prefix != ctx.current_doc {
                return format!("{prefix}::{base}");
            }
        }
    }

    base
}

/// Resolved properties of a node.
///
/// Object kind: a shallow copy of `properties`. Union kind: branches are
/// merged in order — a Reference branch contributes one synthetic field
/// keyed by its resolved bare type name (value: the branch node itself),
/// an Object branch contributes its own resolved properties. Key
/// collisions are resolved last-write-wins; this is intentional, not a
/// defect. All other kinds resolve to an empty map.
pub fn properties(node: &PropertyNode, ctx: &ResolveCtx) -> IndexMap<String, PropertyNode> {
    match node.kind() {
        Kind::Object => node.properties.clone(),
        Kind::Union => {
            let mut merged = IndexMap::new();

            for branch in node.union_branches() {
                match branch.kind() {
                    Kind::Reference => {
                        if let Some(r) = &branch.reference {
                            merged.insert(base_ref_name(r), branch.clone());
                        }
                    }
                    Kind::Object | Kind::Union => {
                        for (name, child) in properties(branch, ctx) {
                            merged.insert(name, child);
                        }
                    }
                    _ => {}
                }
            }

            merged
        }
        _ => IndexMap::new(),
    }
}

/// Names required by a node, including the required lists of union
/// branches (the merged property map spans them).
pub fn required_names(node: &PropertyNode) -> Vec<String> {
    let mut names: Vec<String> = node.required.clone();

    for branch in node.union_branches() {
        names.extend(branch.required.iter().cloned());
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(json: &str) -> PropertyNode {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_scalar_mapping() {
        assert_eq!(scalar_type("integer"), "i64");
        assert_eq!(scalar_type("string"), "String");
        assert_eq!(scalar_type("boolean"), "bool");
        assert_eq!(scalar_type("number"), "f64");
        assert_eq!(scalar_type("interface"), DYNAMIC_TYPE);
    }

    #[test]
    fn test_multiple_type_scalar_fallback() {
        // A list-valued `type` resolves via the scalar fallback, never an error.
        let n = node(r#"{"type": ["string", "integer"]}"#);
        assert_eq!(target_type(&n, &ResolveCtx::objects()), "String");
    }

    #[test]
    fn test_tuple_items_dynamic_fallback() {
        let n = node(r#"{"type": "array", "items": [{"type": "string"}, {"type": "integer"}]}"#);
        assert_eq!(
            target_type(&n, &ResolveCtx::objects()),
            format!("Vec<{DYNAMIC_TYPE}>")
        );
    }

    #[test]
    fn test_ref_prefix_forms() {
        let ctx_strip = ResolveCtx {
            strip_prefix: true,
            add_prefix: Some("objects"),
            current_doc: "responses",
        };
        let ctx_keep = ResolveCtx {
            strip_prefix: false,
            add_prefix: Some("objects"),
            current_doc: "responses",
        };

        // Bare ref: add_prefix qualifies, strip_prefix drops it.
        assert_eq!(
            ref_type_name("#/definitions/base_error", &ctx_keep),
            "objects::BaseError"
        );
        assert_eq!(
            ref_type_name("#/definitions/base_error", &ctx_strip),
            "BaseError"
        );

        // Document-qualified ref.
        assert_eq!(
            ref_type_name("objects.json#/definitions/base_error", &ctx_keep),
            "objects::BaseError"
        );
        assert_eq!(
            ref_type_name("objects.json#/definitions/base_error", &ctx_strip),
            "BaseError"
        );
    }

    #[test]
    fn test_strip_prefix_toggles_only_prefix() {
        let refs = [
            "#/definitions/base_error",
            "objects.json#/definitions/photos_photo",
            "responses.json#/definitions/users_get_response",
        ];

        for r in refs {
            let stripped = ref_type_name(
                r,
                &ResolveCtx {
                    strip_prefix: true,
                    add_prefix: Some("objects"),
                    current_doc: "methods",
                },
            );
            let kept = ref_type_name(
                r,
                &ResolveCtx {
                    strip_prefix: false,
                    add_prefix: Some("objects"),
                    current_doc: "methods",
                },
            );

            // The qualified form always ends with the bare identifier.
            assert!(kept.ends_with(&stripped), "{kept} vs {stripped}");
        }
    }

    #[test]
    fn test_all_of_concatenates_branch_names() {
        let n = node(
            r##"{"allOf": [{"$ref": "#/definitions/base_error"}, {"$ref": "#/definitions/base_ok"}]}"##,
        );
        let names = target_types(&n, &ResolveCtx::objects());
        assert_eq!(names, vec!["BaseError", "BaseOk"]);
        assert_eq!(target_type(&n, &ResolveCtx::objects()), "BaseErrorBaseOk");
    }

    #[test]
    fn test_union_merge_last_write_wins() {
        let n = node(
            r#"{"allOf": [
                {"type": "object", "properties": {"x": {"type": "integer", "description": "from A"}}},
                {"type": "object", "properties": {"x": {"type": "string", "description": "from B"}}}
            ]}"#,
        );
        let props = properties(&n, &ResolveCtx::objects());
        assert_eq!(props.len(), 1);
        assert_eq!(props["x"].description.as_deref(), Some("from B"));
    }

    #[test]
    fn test_union_reference_branch_synthetic_field() {
        let n = node(
            r##"{"oneOf": [{"$ref": "#/definitions/base_error"}, {"type": "object", "properties": {"count": {"type": "integer"}}}]}"##,
        );
        let props = properties(&n, &ResolveCtx::objects());
        assert!(props.contains_key("BaseError"));
        assert!(props.contains_key("count"));
    }

    #[test]
    fn test_description_sentinel() {
        let n = node(r#"{"type": "integer"}"#);
        assert_eq!(description(&n), NO_DESCRIPTION);

        let n = node(r#"{"type": "integer", "description": "Object ID"}"#);
        assert_eq!(description(&n), "Object ID");
    }
}
