//! # vkgen
//!
//! Generates a typed Rust SDK from the VK API JSON schema documents.
//!
//! The three source documents (objects, responses, methods) are parsed
//! into a recursive node model, resolved to Rust type names, partitioned
//! into per-category modules and written concurrently, one writer thread
//! per output file. Output is deterministic: identical inputs produce
//! byte-identical files regardless of scheduling.
//!
//! ## Pipeline
//!
//! 1. Load each document from a URL or local path ([`loader`]).
//! 2. Parse into [`schema::SchemaDocument`] / [`schema::MethodsDocument`].
//! 3. Build the cross-reference index from the objects definitions.
//! 4. Partition definitions by category and compute module imports
//!    ([`partition`]).
//! 5. Resolve every definition into a render model ([`render`]).
//! 6. Emit per-category modules through embedded templates ([`emit`]).

pub mod config;
pub mod emit;
pub mod error;
pub mod generate;
pub mod loader;
pub mod naming;
pub mod partition;
pub mod render;
pub mod schema;

pub use config::GenConfig;
pub use error::{GenError, Result};
pub use generate::{generate, GenerateSummary};
