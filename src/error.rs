use std::path::PathBuf;

use oxc_span::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Illegal export \"{name}\" at {}..{}", span.start, span.end)]
    IllegalExportName { name: String, span: Span },

    #[error("Failed to determine source type for {}: {message}", path.display())]
    InvalidSourceType { path: PathBuf, message: String },

    #[error("Parsing failed: {0}")]
    ParseFailed(String),

    #[error("Semantic analysis failed: {0}")]
    Semantic(String),

    #[error("Invalid transform options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
