use std::path::PathBuf;

use thiserror::Error;

/// Error types for report conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{report}: invalid JSON report: {source}")]
    Json {
        report: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{report}: invalid plist report: {source}")]
    Plist {
        report: String,
        #[source]
        source: plist::Error,
    },

    #[error("{report}: malformed report: {reason}")]
    MalformedReport { report: String, reason: String },

    #[error("No converter for format '{0}'. Supported formats: plist, infer")]
    UnknownFormat(String),

    #[error("Project path {path} is not accessible: {source}")]
    ProjectRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;
