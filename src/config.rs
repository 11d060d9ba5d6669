//! Generator Configuration
//!
//! Layered configuration: built-in defaults, then an optional `vkgen.toml`,
//! then `VKGEN_*` environment variables. The defaults point at the
//! published VK API schema documents, so a bare `vkgen` run works without
//! any file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

const SCHEMA_BASE: &str = "https://raw.githubusercontent.com/VKCOM/vk-api-schema/master";

/// Where each source document is loaded from. A location starting with
/// `http` is fetched over the network; anything else is a filesystem path.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaLocations {
    #[serde(default = "default_objects_url")]
    pub objects: String,

    #[serde(default = "default_responses_url")]
    pub responses: String,

    #[serde(default = "default_methods_url")]
    pub methods: String,
}

impl Default for SchemaLocations {
    fn default() -> Self {
        Self {
            objects: default_objects_url(),
            responses: default_responses_url(),
            methods: default_methods_url(),
        }
    }
}

/// Where generated modules are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_root")]
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
        }
    }
}

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenConfig {
    #[serde(default)]
    pub schemas: SchemaLocations,

    #[serde(default)]
    pub output: OutputConfig,
}

impl GenConfig {
    /// Load configuration: defaults, an optional TOML file, then
    /// environment overrides (`VKGEN_OUTPUT__ROOT` and friends).
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config_crate::Config::builder()
            .set_default("schemas.objects", default_objects_url())?
            .set_default("schemas.responses", default_responses_url())?
            .set_default("schemas.methods", default_methods_url())?
            .set_default("output.root", default_output_root().display().to_string())?;

        if let Some(path) = file {
            builder = builder.add_source(config_crate::File::from(path));
        } else {
            builder = builder.add_source(config_crate::File::with_name("vkgen").required(false));
        }

        builder = builder.add_source(config_crate::Environment::with_prefix("VKGEN").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }
}

fn default_objects_url() -> String {
    format!("{SCHEMA_BASE}/objects.json")
}

fn default_responses_url() -> String {
    format!("{SCHEMA_BASE}/responses.json")
}

fn default_methods_url() -> String {
    format!("{SCHEMA_BASE}/methods.json")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = GenConfig::default();
        assert!(cfg.schemas.objects.ends_with("objects.json"));
        assert!(cfg.schemas.objects.starts_with("http"));
        assert_eq!(cfg.output.root, PathBuf::from("output"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vkgen.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[schemas]\nobjects = \"schemas/objects.json\"").unwrap();
        writeln!(f, "[output]\nroot = \"generated\"").unwrap();

        let cfg = GenConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.schemas.objects, "schemas/objects.json");
        // Untouched keys keep their defaults.
        assert!(cfg.schemas.methods.ends_with("methods.json"));
        assert_eq!(cfg.output.root, PathBuf::from("generated"));
    }
}
