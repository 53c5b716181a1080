//! Command execution against the catalog and the registry.

use crate::cli::{Command, FavouriteAction};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use textpic_config::Config;
use textpic_registry::{Database, Registry};
use textpic_textart::{Catalog, normalize_id};

pub struct App {
    catalog: Catalog,
    database: Database,
    registry: Registry,
    language: usize,
}

impl App {
    /// Open the catalog and registry described by `config`.
    ///
    /// A relative catalog path is resolved against the working directory.
    pub async fn open(config: &Config) -> Result<Self> {
        let root = std::path::absolute(&config.catalog).or_raise(|| ErrorKind::Catalog)?;
        let catalog = Catalog::new(root).or_raise(|| ErrorKind::Catalog)?;
        let database = Database::connect(&config.database).await.or_raise(|| ErrorKind::Registry)?;
        let registry = Registry::from(&database);
        Ok(Self { catalog, database, registry, language: config.language })
    }

    pub async fn close(self) {
        self.database.close().await;
    }

    pub async fn run(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Categories => self.categories(out).await,
            Command::List { category } => self.list(&category, out).await,
            Command::Show { id } => self.show(&id, out).await,
            Command::Recent => {
                let ids = self.registry.get_recent().await.or_raise(|| ErrorKind::Registry)?;
                self.print_ids(&ids, out).await
            },
            Command::Favourites => {
                let ids = self.registry.get_favourites().await.or_raise(|| ErrorKind::Registry)?;
                self.print_ids(&ids, out).await
            },
            Command::Favourite(FavouriteAction::Add { id }) => {
                let id = normalize_id(&id).or_raise(|| ErrorKind::UnknownPicture(id.clone()))?;
                if !self.catalog.contains(&id).await {
                    exn::bail!(ErrorKind::UnknownPicture(id));
                }
                self.registry.add_favourite(&id).await.or_raise(|| ErrorKind::Registry)
            },
            Command::Favourite(FavouriteAction::Remove { id }) => {
                // Stale identifiers must stay removable after their file is gone.
                let id = normalize_id(&id).unwrap_or(id);
                self.registry.remove_favourite(&id).await.or_raise(|| ErrorKind::Registry)
            },
        }
    }

    async fn categories(&self, out: &mut impl Write) -> Result<()> {
        for category in self.catalog.categories().await.or_raise(|| ErrorKind::Catalog)? {
            writeln!(out, "{}", category.name).or_raise(|| ErrorKind::Output)?;
        }
        Ok(())
    }

    async fn list(&self, category: &str, out: &mut impl Write) -> Result<()> {
        let entries = self.catalog.entries(category, self.language).await.or_raise(|| ErrorKind::Catalog)?;
        for entry in entries {
            let marker = match self.registry.is_favourite(&entry.id).await.or_raise(|| ErrorKind::Registry)? {
                true => '*',
                false => ' ',
            };
            writeln!(out, "{marker} {}\t{}", entry.id, entry.title).or_raise(|| ErrorKind::Output)?;
        }
        Ok(())
    }

    async fn show(&mut self, id: &str, out: &mut impl Write) -> Result<()> {
        let id = normalize_id(id).or_raise(|| ErrorKind::UnknownPicture(id.to_string()))?;
        let art = self.catalog.load(&id).await.or_raise(|| ErrorKind::UnknownPicture(id.clone()))?;
        let title = art.title(self.language).unwrap_or(id.as_str());
        writeln!(out, "{title}\n").or_raise(|| ErrorKind::Output)?;
        write!(out, "{}", art.body).or_raise(|| ErrorKind::Output)?;
        if !art.body.is_empty() && !art.body.ends_with('\n') {
            writeln!(out).or_raise(|| ErrorKind::Output)?;
        }
        self.registry.add_recent(&id).await.or_raise(|| ErrorKind::Registry)
    }

    /// Print stored identifiers with their localized titles.
    ///
    /// Identifiers whose picture has since disappeared are still printed.
    async fn print_ids(&self, ids: &[String], out: &mut impl Write) -> Result<()> {
        for id in ids {
            let title = match self.catalog.load(id).await {
                Ok(art) => art.title(self.language).map(str::to_string).unwrap_or_default(),
                Err(err) => {
                    tracing::warn!(id = %id, error = ?err, "Stored picture could not be loaded");
                    String::from("(missing)")
                },
            };
            writeln!(out, "{id}\t{title}").or_raise(|| ErrorKind::Output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(root: &Path, id: &str, contents: &str) {
        let path = root.join(id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    async fn app(dir: &Path) -> App {
        let catalog = dir.join("catalog");
        write(&catalog, "animals/cat.txt", "Cat|Chat\n=^.^=\n");
        write(&catalog, "animals/fish.txt", "|Poisson\n><>");
        write(&catalog, "faces/smile.txt", "Smile|Sourire\n:-)\n");
        let config = Config { database: dir.join("registry.sqlite"), catalog, language: 0 };
        App::open(&config).await.unwrap()
    }

    async fn run(app: &mut App, command: Command) -> String {
        let mut out = Vec::new();
        app.run(command, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    fn show(id: &str) -> Command {
        Command::Show { id: id.to_string() }
    }

    fn favourite(action: fn(String) -> FavouriteAction, id: &str) -> Command {
        Command::Favourite(action(id.to_string()))
    }

    fn add(id: String) -> FavouriteAction {
        FavouriteAction::Add { id }
    }

    fn remove(id: String) -> FavouriteAction {
        FavouriteAction::Remove { id }
    }

    #[tokio::test]
    async fn test_categories() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path()).await;
        assert_eq!(run(&mut app, Command::Categories).await, "animals\nfaces\n");
        app.close().await;
    }

    #[tokio::test]
    async fn test_show_records_recent() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path()).await;
        assert_eq!(run(&mut app, show("./animals/cat.txt")).await, "Cat\n\n=^.^=\n");
        // Untranslated title falls back to the identifier, body without a trailing newline gets one.
        assert_eq!(run(&mut app, show("animals/fish.txt")).await, "animals/fish.txt\n\n><>\n");
        run(&mut app, show("animals/cat.txt")).await;
        assert_eq!(run(&mut app, Command::Recent).await, "animals/cat.txt\tCat\nanimals/fish.txt\t\n");
        app.close().await;
    }

    #[tokio::test]
    async fn test_show_unknown_picture() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path()).await;
        let err = app.run(show("animals/cow.txt"), &mut Vec::<u8>::new()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnknownPicture(_)));
        assert_eq!(run(&mut app, Command::Recent).await, "");
        app.close().await;
    }

    #[tokio::test]
    async fn test_favourites() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path()).await;
        run(&mut app, favourite(add, "animals/cat.txt")).await;
        run(&mut app, favourite(add, "faces/smile.txt")).await;
        run(&mut app, favourite(add, "animals/cat.txt")).await;
        assert_eq!(run(&mut app, Command::Favourites).await, "faces/smile.txt\tSmile\nanimals/cat.txt\tCat\n");
        assert_eq!(
            run(&mut app, Command::List { category: "animals".to_string() }).await,
            "* animals/cat.txt\tCat\n"
        );
        run(&mut app, favourite(remove, "animals/cat.txt")).await;
        assert_eq!(run(&mut app, Command::Favourites).await, "faces/smile.txt\tSmile\n");
        app.close().await;
    }

    #[tokio::test]
    async fn test_favourite_unknown_picture() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path()).await;
        let err = app.run(favourite(add, "animals/cow.txt"), &mut Vec::<u8>::new()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnknownPicture(_)));
        app.close().await;
    }

    #[tokio::test]
    async fn test_missing_pictures_are_still_listed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path()).await;
        run(&mut app, favourite(add, "faces/smile.txt")).await;
        std::fs::remove_file(dir.path().join("catalog/faces/smile.txt")).unwrap();
        assert_eq!(run(&mut app, Command::Favourites).await, "faces/smile.txt\t(missing)\n");
        run(&mut app, favourite(remove, "faces/smile.txt")).await;
        assert_eq!(run(&mut app, Command::Favourites).await, "");
        app.close().await;
    }

    #[tokio::test]
    async fn test_list_in_other_language() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog");
        write(&catalog, "animals/cat.txt", "Cat|Chat\n=^.^=\n");
        write(&catalog, "animals/fish.txt", "|Poisson\n><>");
        let config = Config { database: dir.path().join("registry.sqlite"), catalog, language: 1 };
        let mut app = App::open(&config).await.unwrap();
        assert_eq!(
            run(&mut app, Command::List { category: "animals".to_string() }).await,
            "  animals/cat.txt\tChat\n  animals/fish.txt\tPoisson\n"
        );
        app.close().await;
    }
}
