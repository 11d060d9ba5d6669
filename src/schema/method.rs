//! Methods Document Model
//!
//! Parallel entities for the methods document: a [`Method`] has a dotted
//! name, a parameter list and one or two response references, each carried
//! by a [`MethodItem`] (the flat node flavor used inside methods.json).

use serde::Deserialize;

use super::node::Kind;
use super::resolve::{ref_type_name, scalar_type, ResolveCtx, DYNAMIC_TYPE, NO_DESCRIPTION};

/// One API error constant declared at the top of the methods document.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub name: String,
    pub code: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// A method parameter or response reference.
///
/// Unlike [`super::PropertyNode`], method items carry a plain string `type`
/// tag and a single optional `items` child; unions do not occur here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MethodItem {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub type_tag: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "enumNames", default)]
    pub enum_names: Vec<String>,

    #[serde(default)]
    pub items: Option<Box<MethodItem>>,

    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
}

impl MethodItem {
    /// Kind discriminant, same precedence as property nodes: a `$ref` wins
    /// over an explicit `type`.
    pub fn kind(&self) -> Kind {
        if self.reference.is_some() {
            return Kind::Reference;
        }

        match self.type_tag.as_deref() {
            Some("array") => Kind::Array,
            Some("object") => Kind::Object,
            Some(_) => Kind::Primitive,
            None => Kind::Unknown,
        }
    }

    /// Resolve this item to a target type name.
    pub fn target_type(&self, ctx: &ResolveCtx) -> String {
        if let Some(r) = &self.reference {
            return ref_type_name(r, ctx);
        }

        match self.type_tag.as_deref() {
            Some("array") => {
                let element = match &self.items {
                    Some(item) => item.target_type(ctx),
                    None => DYNAMIC_TYPE.to_string(),
                };
                format!("Vec<{element}>")
            }
            Some("object") | None => DYNAMIC_TYPE.to_string(),
            Some(tag) => scalar_type(tag).to_string(),
        }
    }

    pub fn description(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => NO_DESCRIPTION,
        }
    }
}

/// The pair of response references a method may declare.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MethodResponses {
    #[serde(default)]
    pub response: Option<MethodItem>,

    #[serde(rename = "extendedResponse", default)]
    pub extended_response: Option<MethodItem>,
}

/// One API method declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct Method {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "access_token_type", default)]
    pub access_token_types: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<MethodItem>,

    #[serde(default)]
    pub responses: MethodResponses,
}

impl Method {
    pub fn description(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => NO_DESCRIPTION,
        }
    }

    /// Whether the method declares an extended response variant.
    pub fn is_extended(&self) -> bool {
        self.responses.extended_response.is_some()
    }

    /// The generated return type: the declared response, or the dynamic
    /// fallback when the method declares none.
    pub fn return_type(&self, ctx: &ResolveCtx) -> String {
        match &self.responses.response {
            Some(item) => item.target_type(ctx),
            None => DYNAMIC_TYPE.to_string(),
        }
    }

    /// Return type of the extended variant, same fallback rule.
    pub fn extended_return_type(&self, ctx: &ResolveCtx) -> String {
        match &self.responses.extended_response {
            Some(item) => item.target_type(ctx),
            None => DYNAMIC_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(json: &str) -> MethodItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_item_kind_ref_wins() {
        let i = item(r##"{"name": "fields", "type": "string", "$ref": "objects.json#/definitions/users_fields"}"##);
        assert_eq!(i.kind(), Kind::Reference);
    }

    #[test]
    fn test_item_target_types() {
        let ctx = ResolveCtx::methods();

        let i = item(r#"{"name": "count", "type": "integer"}"#);
        assert_eq!(i.target_type(&ctx), "i64");

        let i = item(r#"{"name": "ids", "type": "array", "items": {"type": "integer"}}"#);
        assert_eq!(i.target_type(&ctx), "Vec<i64>");

        let i = item(r##"{"name": "fields", "$ref": "objects.json#/definitions/users_fields"}"##);
        assert_eq!(i.target_type(&ctx), "objects::UsersFields");
    }

    #[test]
    fn test_method_extended() {
        let m: Method = serde_json::from_str(
            r##"{
                "name": "users.get",
                "access_token_type": ["user"],
                "parameters": [],
                "responses": {
                    "response": {"$ref": "responses.json#/definitions/users_get_response"},
                    "extendedResponse": {"$ref": "responses.json#/definitions/users_get_extended_response"}
                }
            }"##,
        )
        .unwrap();

        assert!(m.is_extended());
        assert_eq!(m.description(), NO_DESCRIPTION);

        let ctx = ResolveCtx::methods();
        assert_eq!(m.return_type(&ctx), "responses::UsersGetResponse");
        assert_eq!(
            m.extended_return_type(&ctx),
            "responses::UsersGetExtendedResponse"
        );
    }

    #[test]
    fn test_return_types_fall_back_to_dynamic() {
        let m: Method = serde_json::from_str(
            r#"{"name": "storage.set", "responses": {}}"#,
        )
        .unwrap();

        let ctx = ResolveCtx::methods();
        assert_eq!(m.return_type(&ctx), DYNAMIC_TYPE);
        assert_eq!(m.extended_return_type(&ctx), DYNAMIC_TYPE);
    }
}
