//! Error types for entity construction and cache access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while constructing an entity from the facility service.
#[derive(Debug, Error)]
pub enum EntityError {
    // Missing upstream entity (exit code 2)
    #[error("entity not available: {}", id.as_deref().unwrap_or("<no id in record>"))]
    NotFound { id: Option<String> },

    // IO errors (exit code 3)
    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON from {url}: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    // Configuration errors (exit code 2)
    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },
}

impl EntityError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            #[cfg(feature = "remote")]
            EntityError::Network { .. } => 3,
            _ => 2,
        }
    }

    /// Attach the requested id to a `NotFound` raised from a record that had none.
    pub(crate) fn with_requested_id(self, requested: &str) -> Self {
        match self {
            EntityError::NotFound { id: None } => EntityError::NotFound {
                id: Some(requested.to_string()),
            },
            other => other,
        }
    }
}

/// Errors reading the local sync cache.
///
/// The resolver never surfaces these; a failed read is treated as a missing value.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache database not found: {path}")]
    NotFound { path: PathBuf },

    #[error("cache query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("cached document {doc_id} is not valid JSON: {source}")]
    InvalidDocument {
        doc_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CacheError::NotFound { .. } | CacheError::Sqlite(_) => 3,
            CacheError::InvalidDocument { .. } => 2,
        }
    }
}
