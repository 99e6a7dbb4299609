//! Markdown export error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error when reading `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("IO error when writing `{0}`")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("`{path}`: {message}")]
    Metadata { path: PathBuf, message: String },

    #[error("invalid save-as pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}

impl ExportError {
    pub(crate) fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }
}
