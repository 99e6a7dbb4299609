//! Sprite builder error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a sprite build.
#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("cannot read input directory `{0}`")]
    InputDir(PathBuf, #[source] std::io::Error),

    #[error("IO error when reading `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("IO error when writing `{0}`")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("`{path}` is not well-formed markup (at byte {position}): {message}")]
    Parse {
        path: PathBuf,
        position: u64,
        message: String,
    },

    #[error("`{0}` is missing a viewBox attribute")]
    MissingViewBox(PathBuf),

    #[error("symbol id `{id}` is produced by both `{first}` and `{second}`")]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
}
