//! Source Formatting
//!
//! Canonical formatting of an assembled module through `syn` and
//! `prettyplease`. Formatting failure is not fatal: the unformatted buffer
//! is still written so the run completes and the offending module can be
//! inspected.

use tracing::warn;

/// Format a complete Rust source file. On parse failure the input is
/// returned unchanged and a warning names the module.
pub fn format_source(label: &str, source: String) -> String {
    match syn::parse_file(&source) {
        Ok(file) => prettyplease::unparse(&file),
        Err(e) => {
            warn!(module = label, error = %e, "formatting failed, writing unformatted source");
            source
        }
    }
}
