//! Packed multilingual strings.
//!
//! Picture titles carry every translation in one string, separated by `|` and
//! ordered by language index: `"Cat|Chat|Katze"`. There is no escaping, so a
//! translation can never itself contain a `|`.

use crate::error::{ErrorKind, Result};

/// Separator between language variants.
pub const DELIMITER: char = '|';

/// Select the variant for language `index` from a packed string.
///
/// Returns [`ErrorKind::NotFound`] when there are fewer variants than
/// `index + 1`, or when the selected variant is empty. An empty variant is how
/// a packed string says "no translation for this language". A string without
/// any delimiter is a single variant at index `0`.
///
/// # Examples
///
/// ```
/// use textpic_textart::pick_variant;
/// assert_eq!(pick_variant("Hello|Bonjour|Hallo", 1).unwrap(), "Bonjour");
/// assert_eq!(pick_variant("Hello", 0).unwrap(), "Hello");
/// assert!(pick_variant("|Bonjour|Hallo", 0).is_err());
/// assert!(pick_variant("Hello|Bonjour", 5).is_err());
/// ```
pub fn pick_variant(packed: &str, index: usize) -> Result<&str> {
    match packed.split(DELIMITER).nth(index) {
        Some(variant) if !variant.is_empty() => Ok(variant),
        _ => exn::bail!(ErrorKind::NotFound(index)),
    }
}
