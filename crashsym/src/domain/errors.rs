//! Structured error types for crashsym
//!
//! Using thiserror for automatic Display implementation and error chaining.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to prepare an image for symbol lookups.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse object file: {0}")]
    Object(#[from] object::Error),

    #[error("Failed to parse method manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
