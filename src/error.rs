//! Error types for link graph construction and ranking.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for linkrank operations.
#[derive(Debug, Error)]
pub enum LinkRankError {
    /// A record in the edge list could not be interpreted.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Ranking was requested for a graph without pages.
    #[error("no graph: cannot rank a graph with zero pages")]
    EmptyGraph,

    /// A page was queried that was never registered while building the graph.
    #[error("unknown page: {0}")]
    UnknownPage(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    /// Configuration values are out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serde serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LinkRankError {
    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        LinkRankError::Io {
            source,
            path: path.into(),
        }
    }
}

// Writers and readers that are not backed by a named file.
impl From<std::io::Error> for LinkRankError {
    fn from(source: std::io::Error) -> Self {
        LinkRankError::Io {
            source,
            path: PathBuf::from("<stream>"),
        }
    }
}

/// Result type for linkrank operations.
pub type Result<T> = std::result::Result<T, LinkRankError>;
