//! Text-art pictures and the catalog they live in.
//!
//! A picture is a plain text file whose first line is a packed multilingual
//! title (`"Cat|Chat|Katze"`) and whose remaining lines are the art. The
//! catalog groups pictures into category directories; listing a category
//! localizes every title and leaves out pictures that have no translation for
//! the requested language.

mod art;
mod catalog;
pub mod error;
mod lang;
mod path;

pub use crate::art::TextArt;
pub use crate::catalog::{Catalog, CatalogEntry, Category};
pub use crate::lang::{DELIMITER, pick_variant};
pub use crate::path::{normalize as normalize_id, validate as validate_id};
