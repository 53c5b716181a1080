//! Registry Error Types
//!
//! Errors are `exn` trees so the failing query and the SQLite error beneath it
//! both end up in the report. Nothing in this crate is swallowed: the caller
//! decides whether a failed write is worth surfacing.

use derive_more::{Display, Error};

/// A registry error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The database could not be opened, or its schema could not be created.
    #[display("registry storage unavailable")]
    StorageUnavailable,
    /// An insert, delete or commit did not go through.
    #[display("registry write failed")]
    WriteFailed,
    /// A query against an open database failed.
    #[display("registry read failed")]
    ReadFailed,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // SQLITE_BUSY ends up here once the busy timeout has elapsed.
        matches!(self, Self::WriteFailed | Self::ReadFailed)
    }
}
