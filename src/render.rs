//! Render Models
//!
//! The bridge between resolved schema nodes and the templates. All
//! resolution and index lookups happen here, single-threaded, before the
//! emission phase; workers receive finished [`serde_json::Value`] models
//! and only interpolate them. Field lists are sorted by JSON name so the
//! generated output is deterministic regardless of source ordering.

use serde::Serialize;
use serde_json::Value;

use crate::naming::{convert_name, field_ident, fn_ident, method_suffix};
use crate::partition::Partition;
use crate::schema::node::{Kind, PropertyNode};
use crate::schema::resolve::{self, ResolveCtx};
use crate::schema::{DocKind, Method, MethodItem, RefIndex};
use crate::error::Result;

/// One member ready for template rendering: its category key plus the
/// prepared template data.
#[derive(Debug, Clone)]
pub struct RenderItem {
    pub name: String,
    pub data: Value,
}

/// Header data for one generated module.
#[derive(Debug, Serialize)]
pub struct HeaderModel {
    pub category: String,
    pub imports: Vec<&'static str>,
    pub api_name: String,
}

impl HeaderModel {
    pub fn new(doc: DocKind, category: &str, partition: &Partition) -> Self {
        Self {
            category: category.to_string(),
            imports: partition.imports.iter().map(|i| i.use_line()).collect(),
            api_name: match doc {
                DocKind::Methods => format!("{}Api", convert_name(category)),
                _ => String::new(),
            },
        }
    }

    pub fn data(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Serialize)]
struct FieldModel {
    json_name: String,
    rust_name: String,
    rust_type: String,
    doc_lines: Vec<String>,
    required: bool,
    needs_rename: bool,
}

#[derive(Debug, Serialize)]
struct TypeModel {
    rust_name: String,
    doc_lines: Vec<String>,
    is_struct: bool,
    rust_type: String,
    fields: Vec<FieldModel>,
}

/// Split doc text into `///`-safe lines. Descriptions may span lines once
/// enum values are folded in.
fn doc_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Build the render model for one objects-document definition.
pub fn object_model(name: &str, node: &PropertyNode) -> Result<RenderItem> {
    let ctx = ResolveCtx::objects();
    definition_model(name, node, &ctx, None)
}

/// Build the render model for one responses-document definition. Union
/// definitions inline the fields of referenced objects through the index.
pub fn response_model(name: &str, node: &PropertyNode, index: &RefIndex) -> Result<RenderItem> {
    let ctx = ResolveCtx::responses();
    definition_model(name, node, &ctx, Some(index))
}

fn definition_model(
    name: &str,
    node: &PropertyNode,
    ctx: &ResolveCtx,
    index: Option<&RefIndex>,
) -> Result<RenderItem> {
    let is_struct = matches!(node.kind(), Kind::Object | Kind::Union);

    let model = if is_struct {
        let (props, required) = match index {
            Some(index) => index.inlined_schema(node, ctx)?,
            None => (resolve::properties(node, ctx), resolve::required_names(node)),
        };

        let mut fields: Vec<FieldModel> = props
            .iter()
            .map(|(json_name, child)| {
                field_model(json_name, child, ctx, required.iter().any(|r| r == json_name))
            })
            .collect();
        fields.sort_by(|a, b| a.json_name.cmp(&b.json_name));

        TypeModel {
            rust_name: convert_name(name),
            doc_lines: doc_lines(resolve::description(node)),
            is_struct: true,
            rust_type: String::new(),
            fields,
        }
    } else {
        TypeModel {
            rust_name: convert_name(name),
            doc_lines: doc_lines(resolve::description(node)),
            is_struct: false,
            rust_type: resolve::target_type(node, ctx),
            fields: Vec::new(),
        }
    };

    Ok(RenderItem {
        name: name.to_string(),
        data: serde_json::to_value(model)?,
    })
}

fn field_model(
    json_name: &str,
    node: &PropertyNode,
    ctx: &ResolveCtx,
    required: bool,
) -> FieldModel {
    let rust_name = field_ident(json_name);
    let rust_type = resolve::target_type(node, ctx);

    FieldModel {
        json_name: json_name.to_string(),
        // Renames compare against the raw-stripped identifier.
        needs_rename: rust_name.trim_start_matches("r#") != json_name,
        rust_name,
        rust_type,
        doc_lines: doc_lines(&field_description(node)),
        required,
    }
}

/// Field doc text: the description sentinel plus declared enum values and
/// their display names, folded into the comment since the type itself stays
/// scalar.
fn field_description(node: &PropertyNode) -> String {
    let mut text = resolve::description(node).to_string();

    if !node.enum_values.is_empty() {
        let values: Vec<String> = node
            .enum_values
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        text.push_str(&format!("\nPossible values: {}", values.join(", ")));
    }
    if !node.enum_names.is_empty() {
        text.push_str(&format!("\nValue names: {}", node.enum_names.join(", ")));
    }

    text
}

#[derive(Debug, Serialize)]
struct ParamModel {
    rust_name: String,
    rust_type: String,
}

#[derive(Debug, Serialize)]
struct MethodModel {
    api_name: String,
    fn_name: String,
    doc_lines: Vec<String>,
    params: Vec<ParamModel>,
    return_type: String,
    has_extended: bool,
    extended_fn_name: String,
    extended_return_type: String,
}

/// Build the render model for one API method. Parameter descriptions and
/// access-token notes land in the function doc comment; the signature
/// carries only names and types.
pub fn method_model(method: &Method) -> Result<RenderItem> {
    let ctx = ResolveCtx::methods();
    let category = DocKind::Methods.category_key(&method.name);
    let suffix = method_suffix(&method.name);

    let mut lines = doc_lines(method.description());
    if !method.access_token_types.is_empty() {
        lines.push(format!(
            "Access tokens: {}",
            method.access_token_types.join(", ")
        ));
    }
    for param in &method.parameters {
        lines.push(format!(
            "* `{}` - {}",
            field_ident(&param.name),
            param.description().replace('\n', " ")
        ));
    }

    let params: Vec<ParamModel> = method
        .parameters
        .iter()
        .map(|p| param_model(p, &ctx))
        .collect();

    let return_type = method.return_type(&ctx);
    let extended_return_type = method.extended_return_type(&ctx);

    let model = MethodModel {
        api_name: format!("{}Api", convert_name(category)),
        fn_name: fn_ident(suffix),
        doc_lines: lines,
        params,
        return_type,
        has_extended: method.is_extended(),
        extended_fn_name: format!("{}_extended", fn_ident(suffix)),
        extended_return_type,
    };

    Ok(RenderItem {
        name: method.name.clone(),
        data: serde_json::to_value(model)?,
    })
}

fn param_model(param: &MethodItem, ctx: &ResolveCtx) -> ParamModel {
    let base = param.target_type(ctx);
    let rust_type = if param.required {
        base
    } else {
        format!("Option<{base}>")
    };

    ParamModel {
        rust_name: field_ident(&param.name),
        rust_type,
    }
}
