//! Embedded Templates
//!
//! The `.hbs` sources are compiled into the binary with `include_dir`, so
//! the generator runs without a template directory on disk. One registry is
//! built up front and shared read-only by every emission worker.

use handlebars::{no_escape, Handlebars};
use include_dir::{include_dir, Dir};
use serde_json::Value;

use crate::error::{GenError, Result};
use crate::schema::DocKind;

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Compiled template registry. Escaping is disabled: the output is Rust
/// source, not HTML.
pub struct TemplateSet {
    registry: Handlebars<'static>,
}

impl TemplateSet {
    /// Compile every embedded `.hbs` file into a registry.
    pub fn load() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);

        for file in TEMPLATES.files() {
            let path = file.path();
            if path.extension().map(|e| e == "hbs") != Some(true) {
                continue;
            }

            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| GenError::MissingTemplate(path.display().to_string()))?;
            let source = file
                .contents_utf8()
                .ok_or_else(|| GenError::MissingTemplate(name.to_string()))?;

            registry
                .register_template_string(name, source)
                .map_err(|e| GenError::Template(Box::new(e)))?;
        }

        Ok(Self { registry })
    }

    fn render(&self, name: &str, data: &Value) -> Result<String> {
        if !self.registry.has_template(name) {
            return Err(GenError::MissingTemplate(name.to_string()));
        }
        Ok(self.registry.render(name, data)?)
    }

    /// Render the fixed header of one generated module.
    pub fn render_header(&self, doc: DocKind, data: &Value) -> Result<String> {
        self.render(&format!("{}_header", doc.dir_name()), data)
    }

    /// Render one member (type definition or method impl block).
    pub fn render_member(&self, doc: DocKind, data: &Value) -> Result<String> {
        self.render(doc.dir_name(), data)
    }
}
