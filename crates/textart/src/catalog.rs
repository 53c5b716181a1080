//! On-disk catalog of text-art pictures.
//!
//! ```text
//! <root>/
//!   animals/          <- category
//!     cat.txt         <- picture, identified as "animals/cat.txt"
//!     dog.txt
//!   faces/
//!     smile.txt
//! ```
//!
//! Listings only report real directories and regular files: symlinks and
//! special files are skipped. Pictures loaded by identifier may pass through
//! symlinks, but only while they resolve to somewhere inside the root.

use crate::art::TextArt;
use crate::error::{ErrorKind, Result};
use crate::path::{to_id, validate};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// A directory of pictures directly under the catalog root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Directory name, also used as the category's display name.
    pub name: String,
}

/// A picture as listed in a category, with its title already localized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Picture identifier, relative to the catalog root.
    pub id: String,
    pub title: String,
}

/// What a visible directory entry turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Directory,
    File,
}

/// Read-only view of a text-art library on the local filesystem.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}
impl Catalog {
    /// Create a catalog rooted at `root`, which must be an absolute path.
    ///
    /// The directory isn't required to exist yet; listing a missing root
    /// reports [`ErrorKind::Missing`].
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { root })
    }

    /// List all categories, sorted by name.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let mut categories = Vec::new();
        for (name, _, kind) in Self::read_dir(&self.root).await? {
            if kind == Kind::Directory {
                categories.push(Category { name });
            }
        }
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    /// List the pictures in `category` that have a title in `language`,
    /// sorted by identifier.
    ///
    /// Pictures without a translation for `language` are left out, as are files
    /// that can't be parsed as pictures.
    #[instrument(skip(self))]
    pub async fn entries(&self, category: &str, language: usize) -> Result<Vec<CatalogEntry>> {
        let relative = validate(category)?;
        let directory = self.root.join(&relative);
        let mut entries = Vec::new();
        for (name, path, kind) in Self::read_dir(&directory).await? {
            if kind != Kind::File {
                continue;
            }
            let id = to_id(&relative.join(&name))?;
            let art = match Self::read(&path).await? {
                Some(art) => art,
                None => {
                    tracing::warn!(id = %id, "Skipping unreadable picture file");
                    continue;
                },
            };
            match art.title(language) {
                Ok(title) => entries.push(CatalogEntry { id, title: title.to_string() }),
                Err(_) => tracing::debug!(id = %id, language, "Skipping picture without a translated title"),
            }
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    /// Load a single picture by identifier.
    #[instrument(skip(self))]
    pub async fn load(&self, id: &str) -> Result<TextArt> {
        let path = self.resolve(id).await?;
        let contents = fs::read(&path).await.map_err(|e| Self::map_io_error(e, &path))?;
        TextArt::parse(&String::from_utf8_lossy(&contents))
    }

    /// Whether `id` resolves to a picture file.
    pub async fn contains(&self, id: &str) -> bool {
        match self.resolve(id).await {
            Ok(path) => fs::metadata(path).await.is_ok_and(|meta| meta.is_file()),
            Err(_) => false,
        }
    }

    /// Turn an identifier into an absolute path with all symlinks resolved.
    ///
    /// The target must exist, and must still be inside the (equally resolved)
    /// catalog root.
    async fn resolve(&self, id: &str) -> Result<PathBuf> {
        let path = self.root.join(validate(id)?);
        let root = fs::canonicalize(&self.root).await.map_err(|e| Self::map_io_error(e, &self.root))?;
        let resolved = fs::canonicalize(&path).await.map_err(|e| Self::map_io_error(e, &path))?;
        if !resolved.starts_with(&root) {
            tracing::warn!(id = %id, target = %resolved.display(), "Picture resolves outside of the catalog");
            exn::bail!(ErrorKind::InvalidPath(path));
        }
        Ok(resolved)
    }

    /// Read and parse one file, returning `None` if it isn't a valid picture.
    async fn read(path: &Path) -> Result<Option<TextArt>> {
        let contents = fs::read(path).await.map_err(|e| Self::map_io_error(e, path))?;
        Ok(TextArt::parse(&String::from_utf8_lossy(&contents)).ok())
    }

    /// Visible directories and regular files as `(name, absolute path, kind)`.
    ///
    /// Hidden entries, names that aren't valid UTF-8, symlinks (including
    /// dangling ones) and special files are skipped.
    async fn read_dir(directory: &Path) -> Result<Vec<(String, PathBuf, Kind)>> {
        let mut reader = fs::read_dir(directory).await.map_err(|e| Self::map_io_error(e, directory))?;
        let mut found = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| Self::map_io_error(e, directory))? {
            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let path = entry.path();
            // Doesn't follow symlinks.
            let metadata = entry.metadata().await.map_err(|e| Self::map_io_error(e, &path))?;
            let kind = if metadata.is_dir() {
                Kind::Directory
            } else if metadata.is_file() {
                Kind::File
            } else {
                tracing::debug!(path = %path.display(), "Skipping symlink or special file");
                continue;
            };
            found.push((name, path, kind));
        }
        Ok(found)
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::Missing(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, id: &str, contents: &str) {
        let path = root.join(id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "animals/cat.txt", "Cat|Chat\n=^.^=\n");
        write(dir.path(), "animals/dog.txt", "Dog|\n U^ェ^U\n");
        write(dir.path(), "animals/fish.txt", "|Poisson\n><>\n");
        write(dir.path(), "animals/empty.txt", "");
        write(dir.path(), "animals/.hidden.txt", "Hidden|Caché\n...\n");
        write(dir.path(), "faces/smile.txt", "Smile|Sourire\n:-)\n");
        std::fs::create_dir_all(dir.path().join("animals/nested")).unwrap();
        write(dir.path(), ".git/HEAD", "ref: refs/heads/main\n");
        write(dir.path(), "README", "Not a category\n");
        let catalog = Catalog::new(dir.path()).unwrap();
        (dir, catalog)
    }

    #[test]
    fn test_new_requires_absolute_path() {
        assert!(Catalog::new("relative/catalog").is_err());
        assert!(Catalog::new(std::env::temp_dir()).is_ok());
    }

    #[tokio::test]
    async fn test_categories() {
        let (_dir, catalog) = fixture();
        let names: Vec<String> = catalog.categories().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["animals", "faces"]);
    }

    #[tokio::test]
    async fn test_categories_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(dir.path().join("nope")).unwrap();
        let err = catalog.categories().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Missing(_)));
    }

    #[tokio::test]
    async fn test_entries_skip_untranslated() {
        let (_dir, catalog) = fixture();
        let english = catalog.entries("animals", 0).await.unwrap();
        assert_eq!(
            english,
            vec![
                CatalogEntry { id: "animals/cat.txt".to_string(), title: "Cat".to_string() },
                CatalogEntry { id: "animals/dog.txt".to_string(), title: "Dog".to_string() },
            ]
        );
        let french = catalog.entries("animals", 1).await.unwrap();
        let ids: Vec<&str> = french.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["animals/cat.txt", "animals/fish.txt"]);
        assert_eq!(french[1].title, "Poisson");
    }

    #[tokio::test]
    async fn test_entries_unknown_category() {
        let (_dir, catalog) = fixture();
        let err = catalog.entries("plants", 0).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Missing(_)));
        let err = catalog.entries("../elsewhere", 0).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_load() {
        let (_dir, catalog) = fixture();
        let art = catalog.load("faces/smile.txt").await.unwrap();
        assert_eq!(art.title(1).unwrap(), "Sourire");
        assert_eq!(art.body, ":-)\n");
        assert!(catalog.load("faces/frown.txt").await.is_err());
        assert!(catalog.load("../../etc/passwd").await.is_err());
        assert!(catalog.load("animals/empty.txt").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlinks_are_skipped() {
        use std::os::unix::fs::symlink;
        let (dir, catalog) = fixture();
        symlink(dir.path().join("gone"), dir.path().join("broken")).unwrap();
        symlink(dir.path().join("animals/gone.txt"), dir.path().join("animals/broken.txt")).unwrap();

        let names: Vec<String> = catalog.categories().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["animals", "faces"]);
        let ids: Vec<String> = catalog.entries("animals", 0).await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["animals/cat.txt", "animals/dog.txt"]);
        assert!(!catalog.contains("animals/broken.txt").await);
        let err = catalog.load("animals/broken.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Missing(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_cannot_leave_the_root() {
        use std::os::unix::fs::symlink;
        let outside = tempfile::tempdir().unwrap();
        write(outside.path(), "secret.txt", "Secret|Secret
shh
");
        let (dir, catalog) = fixture();
        symlink(outside.path().join("secret.txt"), dir.path().join("animals/secret.txt")).unwrap();
        symlink(outside.path(), dir.path().join("outside")).unwrap();

        let err = catalog.load("animals/secret.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
        assert!(!catalog.contains("animals/secret.txt").await);
        let err = catalog.load("outside/secret.txt").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
        // Neither link shows up in listings.
        let ids: Vec<String> = catalog.entries("animals", 0).await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["animals/cat.txt", "animals/dog.txt"]);
        let names: Vec<String> = catalog.categories().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["animals", "faces"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_inside_the_root_still_load() {
        use std::os::unix::fs::symlink;
        let (dir, catalog) = fixture();
        symlink(dir.path().join("animals/cat.txt"), dir.path().join("faces/kitty.txt")).unwrap();
        assert!(catalog.contains("faces/kitty.txt").await);
        assert_eq!(catalog.load("faces/kitty.txt").await.unwrap().title(0).unwrap(), "Cat");
    }

    #[tokio::test]
    async fn test_contains() {
        let (_dir, catalog) = fixture();
        assert!(catalog.contains("animals/cat.txt").await);
        assert!(!catalog.contains("animals").await);
        assert!(!catalog.contains("animals/cow.txt").await);
        assert!(!catalog.contains("../animals/cat.txt").await);
    }
}
