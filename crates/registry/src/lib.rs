//! SQLite registry of recently viewed and favourite pictures.
//!
//! # Architecture
//! The database holds two independent tables, both keyed by an opaque picture
//! identifier (in practice a path into the text-art catalog):
//! - **recent**: a most-recently-used list capped at [`MAX_RECENT`] rows.
//! - **favourites**: a unique set, displayed newest first.
//!
//! Open the file with [`Database::connect`] (which creates any missing
//! tables), then wrap it in a [`Registry`] to read and write entries.

mod db;
pub mod error;
mod repo;
mod snapshot;

pub use crate::db::Database;
pub use crate::repo::{MAX_RECENT, Registry};
