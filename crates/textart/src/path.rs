//! Picture identifiers.
//!
//! Pictures are identified by their path relative to the catalog root, always
//! written with `/` separators so that identifiers stored in the registry stay
//! valid across platforms.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// Resolve an identifier into a normalized relative path.
///
/// `.` components and redundant separators are dropped and `..` is applied,
/// but the result may never leave the catalog root. Absolute paths, Windows
/// prefixes, NUL bytes and identifiers that resolve to nothing are rejected.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use textpic_textart::validate_id;
/// assert_eq!(validate_id("animals/./cat.txt").unwrap(), Path::new("animals/cat.txt"));
/// assert_eq!(validate_id("animals/../faces/smile.txt").unwrap(), Path::new("faces/smile.txt"));
/// assert!(validate_id("../secrets").is_err());
/// assert!(validate_id("/etc/passwd").is_err());
/// ```
pub fn validate(id: impl AsRef<Path>) -> Result<PathBuf> {
    let id = id.as_ref();
    let invalid = || ErrorKind::InvalidPath(id.to_path_buf());
    let mut resolved = Vec::new();
    for component in id.components() {
        match component {
            Component::Normal(part) if part.as_encoded_bytes().contains(&0) => exn::bail!(invalid()),
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {},
            Component::RootDir | Component::Prefix(_) => exn::bail!(invalid()),
            Component::ParentDir => {
                if resolved.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
        }
    }
    if resolved.is_empty() {
        exn::bail!(invalid());
    }
    Ok(resolved.into_iter().collect())
}

/// Validate an identifier and return its canonical `/`-separated form.
///
/// ```
/// use textpic_textart::normalize_id;
/// assert_eq!(normalize_id("./animals//cat.txt").unwrap(), "animals/cat.txt");
/// ```
pub fn normalize(id: &str) -> Result<String> {
    to_id(&validate(id)?)
}

/// Format a relative path as an identifier, using `/` on every platform.
///
/// Returns [`ErrorKind::InvalidPath`] for paths that aren't valid UTF-8.
pub fn to_id(relative: &Path) -> Result<String> {
    let parts = relative
        .components()
        .map(|component| component.as_os_str().to_str().ok_or_else(|| ErrorKind::InvalidPath(relative.to_path_buf())))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(parts.join("/"))
}
