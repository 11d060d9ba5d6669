//! Identifier Conversion
//!
//! Converts the snake_case / dotted names used by the VK schema documents
//! into Rust identifiers. One canonical category-key function exists per
//! document flavor (underscore-separated for objects/responses, dotted for
//! methods) and is used for both classification and dispatch-channel lookup.

/// Rust keywords that must not be used as raw field or parameter names.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const",
    "continue", "do", "dyn", "else", "enum", "extern", "false", "final",
    "fn", "for", "if", "impl", "in", "let", "loop", "macro", "match", "mod",
    "move", "mut", "override", "priv", "pub", "ref", "return", "static",
    "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be spelled as raw identifiers (`r#self` is invalid).
const UNRAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "extern"];

/// Convert an underscore-separated schema name into a PascalCase type name.
///
/// A leading segment starting with the digit `2` is spelled out as "two"
/// before capitalization ("2fa_required" -> "TwofaRequired") — identifiers
/// may not start with a digit in the target language. Inner camelCase in a
/// segment is preserved ("widgets_getPages" -> "WidgetsGetPages").
pub fn convert_name(json_name: &str) -> String {
    let mut out = String::with_capacity(json_name.len());

    for (i, segment) in json_name.split('_').enumerate() {
        if segment.is_empty() {
            continue;
        }

        let segment = if i == 0 && segment.starts_with('2') {
            segment.replacen('2', "two", 1)
        } else {
            segment.to_string()
        };

        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}

/// Category key for object/response definition names: the substring before
/// the first `_`, or the whole name when no separator is present.
pub fn object_category(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}

/// Category key for method names: the substring before the first `.`.
pub fn method_category(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// The method-local part of a dotted method name ("users.get" -> "get").
/// Falls back to the full name when there is no dot.
pub fn method_suffix(name: &str) -> &str {
    match name.split_once('.') {
        Some((_, suffix)) => suffix,
        None => name,
    }
}

/// Convert a camelCase method suffix into a snake_case function name,
/// escaping keywords ("getPages" -> "get_pages").
pub fn fn_ident(name: &str) -> String {
    escape_ident(&to_snake_case(name))
}

/// Convert a schema property or parameter name into a valid Rust field
/// identifier. Names are already snake_case in the source documents, so
/// this only handles keywords and leading digits.
pub fn field_ident(json_name: &str) -> String {
    let name = if json_name.starts_with('2') {
        json_name.replacen('2', "two_", 1)
    } else if json_name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("n{json_name}")
    } else {
        json_name.to_string()
    };

    escape_ident(&name)
}

/// Module identifier for a category key (used in generated `mod.rs`).
pub fn module_ident(category: &str) -> String {
    escape_ident(category)
}

fn escape_ident(name: &str) -> String {
    if UNRAW_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c == '-' || c == ' ' || c == '.' {
            result.push('_');
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_name_underscores() {
        assert_eq!(convert_name("base_error"), "BaseError");
        assert_eq!(convert_name("photos_photo"), "PhotosPhoto");
        assert_eq!(
            convert_name("widgets_getPages_response"),
            "WidgetsGetPagesResponse"
        );
    }

    #[test]
    fn test_convert_name_leading_digit() {
        assert_eq!(convert_name("2fa_required"), "TwofaRequired");
        // Only the leading occurrence is spelled out.
        assert_eq!(convert_name("v2_api"), "V2Api");
    }

    #[test]
    fn test_category_keys() {
        assert_eq!(object_category("photos_photo"), "photos");
        assert_eq!(object_category("account"), "account");
        assert_eq!(method_category("users.get"), "users");
        assert_eq!(method_suffix("users.get"), "get");
        assert_eq!(method_suffix("users.getFollowers"), "getFollowers");
    }

    #[test]
    fn test_field_ident_keywords() {
        assert_eq!(field_ident("type"), "r#type");
        assert_eq!(field_ident("ref"), "r#ref");
        assert_eq!(field_ident("owner_id"), "owner_id");
        assert_eq!(field_ident("2fa_required"), "two_fa_required");
    }

    #[test]
    fn test_fn_ident() {
        assert_eq!(fn_ident("getPages"), "get_pages");
        assert_eq!(fn_ident("get"), "get");
        assert_eq!(fn_ident("move"), "r#move");
    }
}
