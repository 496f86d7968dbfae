// src/error.rs
// =============================================================================
// Typed errors for the auditor's building blocks.
//
// Only setup problems end up here (missing root, bad ignore glob, a report
// that cannot be written). A broken link is never an error: it is a
// CheckResult with status "broken".
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Site root does not exist or is not a directory: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to enumerate files under {root}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid ignore pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;
