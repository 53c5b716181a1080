//! Command-line Error Types
//!
//! Each variant wraps the `exn` tree of the crate that failed, so the printed
//! report goes all the way down to the I/O or SQLite error.

use derive_more::{Display, Error};

/// A command-line error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command execution.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not access the recents and favourites registry")]
    Registry,
    #[display("could not read the picture catalog")]
    Catalog,
    #[display("no picture with identifier: {_0}")]
    UnknownPicture(#[error(not(source))] String),
    #[display("could not write output")]
    Output,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
