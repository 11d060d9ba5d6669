//! Error types for the generator

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GenError>;

/// Generator errors
#[derive(Error, Debug)]
pub enum GenError {
    /// A schema fragment could not be parsed (malformed `type` tag or
    /// otherwise unrecognized structure). Aborts the document run.
    #[error("schema parse error at `{path}`: {source}")]
    SchemaParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A `$ref` pointed at a name that is not defined in the objects
    /// document. Aborts the document run; no partial SDK is emitted.
    #[error("unresolved reference: `{0}` is not defined in the objects schema")]
    ReferenceResolution(String),

    /// The dispatch loop computed a category key for which no worker queue
    /// was registered. Classification and dispatch disagreed, which must
    /// never happen by construction.
    #[error("no emission worker registered for category `{category}` (definition `{name}`)")]
    PartitionRouting { category: String, name: String },

    #[error("template registration error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("template render error: {0}")]
    TemplateRender(#[from] handlebars::RenderError),

    #[error("embedded template missing: {0}")]
    MissingTemplate(String),

    /// A schema document could not be fetched from its URL.
    #[error("failed to fetch schema from `{location}`: {message}")]
    SchemaFetch { location: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] config_crate::ConfigError),

    /// Per-category failures captured after the emission join. Categories
    /// that did not fail have still been written in full.
    #[error("emission failed for {} of the categories: {}", .failures.len(), summarize(.failures))]
    Emission { failures: Vec<(String, String)> },
}

fn summarize(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(cat, err)| format!("{cat}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}
