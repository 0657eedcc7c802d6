// src/core/error.rs

//! Error types for the recon core.
//!
//! Only target validation, catalog lookups and report output can fail.
//! A failing external tool is never an error: the runner turns it into text.

use thiserror::Error;

/// Result type alias using the core `Error`.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Target is empty or invalid.")]
    InvalidTarget,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool catalog: {0}")]
    InvalidCatalog(String),

    #[error("Report rendering failed: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for the "unknown tool" condition the single-tool path maps to not-found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::UnknownTool(_))
    }
}
