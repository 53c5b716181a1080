use crate::error::{ErrorKind, Result};
use crate::lang::pick_variant;

/// A single text-art picture.
///
/// Picture files are plain text: the first line is the packed multilingual
/// title (see [`pick_variant`]), every following line is the art itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArt {
    /// Packed title, every translation separated by `|`.
    pub title: String,
    /// The art, verbatim. Whitespace is significant.
    pub body: String,
}
impl TextArt {
    /// Parse the contents of a picture file.
    ///
    /// Only the title line has its line ending (`\n` or `\r\n`) stripped; the
    /// body is kept exactly as written. Empty input has no title and is
    /// rejected with [`ErrorKind::MissingTitle`].
    pub fn parse(contents: &str) -> Result<Self> {
        if contents.is_empty() {
            exn::bail!(ErrorKind::MissingTitle);
        }
        let (title, body) = contents.split_once('\n').unwrap_or((contents, ""));
        Ok(Self {
            title: title.strip_suffix('\r').unwrap_or(title).to_string(),
            body: body.to_string(),
        })
    }

    /// The title in the given language.
    pub fn title(&self, language: usize) -> Result<&str> {
        pick_variant(&self.title, language)
    }
}
