//! Text-art Error Types
//!
//! Structured errors using `exn` for location tracking and error trees.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A text-art error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for text-art operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No variant exists for the requested language; skip the item.
    #[display("no variant for language index {_0}")]
    NotFound(#[error(not(source))] usize),
    /// The picture file is empty, so it has no title line.
    #[display("picture has no title line")]
    MissingTitle,
    /// Identifier escapes the catalog root (directly or through a symlink) or
    /// is otherwise unusable.
    #[display("invalid picture path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// Catalog root or category could not be found.
    #[display("not found: {}", _0.display())]
    Missing(#[error(not(source))] PathBuf),
    /// Underlying I/O error.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
