//! Partitioner & Import Analyzer
//!
//! Groups definitions by category key and computes, per category, the set
//! of cross-module imports its generated module header needs. Runs
//! single-threaded before the emission phase; the resulting partitions are
//! handed to workers as read-only inputs.
//!
//! Import analysis scans the same resolved type names the renderer prints:
//! the target type of every rendered field (inlined through the index for
//! the responses document), the alias target of non-struct definitions, and
//! every parameter and return type of a method. Scanning rendered names
//! instead of walking node structure keeps the import set in lockstep with
//! the emitted code, and never follows references, so self-referential
//! definitions terminate by construction.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use crate::error::Result;
use crate::schema::method::Method;
use crate::schema::node::{Kind, PropertyNode};
use crate::schema::resolve::{self, ResolveCtx, DYNAMIC_TYPE};
use crate::schema::{DocKind, RefIndex};

/// A cross-module import required by a generated module header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModuleImport {
    /// Types qualified `objects::` are used.
    Objects,
    /// Types qualified `responses::` are used.
    Responses,
    /// The dynamic `Value` fallback is used somewhere in the module.
    JsonValue,
}

impl ModuleImport {
    /// The `use` line this import renders to.
    pub fn use_line(&self) -> &'static str {
        match self {
            ModuleImport::Objects => "use crate::objects;",
            ModuleImport::Responses => "use crate::responses;",
            ModuleImport::JsonValue => "use serde_json::Value;",
        }
    }
}

/// One output unit: a category key, its import set, and its members in
/// deterministic (lexicographic) order.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub imports: BTreeSet<ModuleImport>,
    pub members: Vec<String>,
}

/// Partition a definitions table by the document's canonical category-key
/// function. The union of all member lists equals the input key set;
/// categories are pairwise disjoint by construction; members are sorted.
///
/// The responses pass supplies the cross-reference index so the import scan
/// sees the same inlined field set the renderer emits.
pub fn partition_definitions(
    doc: DocKind,
    definitions: &IndexMap<String, PropertyNode>,
    index: Option<&RefIndex>,
) -> Result<BTreeMap<String, Partition>> {
    let ctx = doc.resolve_ctx();
    let mut partitions: BTreeMap<String, Partition> = BTreeMap::new();

    for (name, node) in definitions {
        let key = doc.category_key(name).to_string();
        let partition = partitions.entry(key).or_default();
        partition.members.push(name.clone());
        definition_imports(node, &ctx, index, &mut partition.imports)?;
    }

    for partition in partitions.values_mut() {
        partition.members.sort();
    }

    Ok(partitions)
}

/// Partition the method list by the dotted-name prefix.
pub fn partition_methods(methods: &[Method]) -> BTreeMap<String, Partition> {
    let doc = DocKind::Methods;
    let ctx = doc.resolve_ctx();
    let mut partitions: BTreeMap<String, Partition> = BTreeMap::new();

    for method in methods {
        let key = doc.category_key(&method.name).to_string();
        let partition = partitions.entry(key).or_default();
        partition.members.push(method.name.clone());
        method_imports(method, &ctx, &mut partition.imports);
    }

    for partition in partitions.values_mut() {
        partition.members.sort();
    }

    partitions
}

/// Record the imports one definition's rendered declaration needs: the
/// target type of each field for struct kinds, the alias target otherwise.
fn definition_imports(
    node: &PropertyNode,
    ctx: &ResolveCtx,
    index: Option<&RefIndex>,
    imports: &mut BTreeSet<ModuleImport>,
) -> Result<()> {
    if matches!(node.kind(), Kind::Object | Kind::Union) {
        let props = match index {
            Some(index) => index.inlined_schema(node, ctx)?.0,
            None => resolve::properties(node, ctx),
        };
        for child in props.values() {
            record_type_name(&resolve::target_type(child, ctx), imports);
        }
    } else {
        record_type_name(&resolve::target_type(node, ctx), imports);
    }

    Ok(())
}

/// Record the imports one method's rendered stub needs: every parameter
/// type, the return type (dynamic fallback included), and the extended
/// return type when the stub is emitted.
fn method_imports(method: &Method, ctx: &ResolveCtx, imports: &mut BTreeSet<ModuleImport>) {
    for param in &method.parameters {
        record_type_name(&param.target_type(ctx), imports);
    }

    record_type_name(&method.return_type(ctx), imports);
    if method.is_extended() {
        record_type_name(&method.extended_return_type(ctx), imports);
    }
}

/// Classify one resolved type name. Module qualifiers can sit anywhere in
/// the name (inside `Vec<...>`, or mid-way through a concatenated union
/// name); the dynamic fallback is matched exactly after peeling `Vec`
/// wrappers so type names that merely contain "Value" do not count.
fn record_type_name(name: &str, imports: &mut BTreeSet<ModuleImport>) {
    if name.contains("objects::") {
        imports.insert(ModuleImport::Objects);
    }
    if name.contains("responses::") {
        imports.insert(ModuleImport::Responses);
    }

    let mut core = name;
    while let Some(inner) = core.strip_prefix("Vec<").and_then(|s| s.strip_suffix('>')) {
        core = inner;
    }
    if core == DYNAMIC_TYPE {
        imports.insert(ModuleImport::JsonValue);
    }
}
