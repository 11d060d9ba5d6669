//! Document Loading
//!
//! Fetches a schema document from a URL or reads it from disk, returning
//! raw bytes for the parser.

use std::fs;
use std::time::Duration;

use tracing::info;

use crate::error::{GenError, Result};

/// Load one schema document. Locations starting with `http` go over the
/// network, everything else is a filesystem path.
pub fn load_schema(location: &str) -> Result<Vec<u8>> {
    if location.starts_with("http") {
        info!(url = location, "fetching schema");
        let response = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| GenError::SchemaFetch {
                location: location.to_string(),
                message: e.to_string(),
            })?
            .get(location)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| GenError::SchemaFetch {
                location: location.to_string(),
                message: e.to_string(),
            })?;

        let bytes = response.bytes().map_err(|e| GenError::SchemaFetch {
            location: location.to_string(),
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    } else {
        info!(path = location, "reading schema");
        Ok(fs::read(location)?)
    }
}
