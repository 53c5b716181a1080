use clap::{Parser, Subcommand};
use std::path::PathBuf;
use textpic_config::Config;

#[derive(Debug, Parser)]
#[command(name = "textpic")]
#[command(about = "Browse text-art pictures and keep track of recents and favourites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (toml, yaml or json)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Registry database file (overrides configuration)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Catalog root directory (overrides configuration)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Language index into packed titles (overrides configuration)
    #[arg(short = 'L', long, global = true)]
    pub language: Option<usize>,

    /// Enable debug logging (RUST_LOG is honoured otherwise)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(catalog) = &self.catalog {
            config.catalog = catalog.clone();
        }
        if let Some(language) = self.language {
            config.language = language;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List catalog categories
    Categories,
    /// List the pictures in a category
    List { category: String },
    /// Print a picture and add it to the recents
    Show { id: String },
    /// List recently viewed pictures, newest first
    Recent,
    /// List favourite pictures, newest first
    Favourites,
    /// Add or remove a favourite
    #[command(subcommand)]
    Favourite(FavouriteAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum FavouriteAction {
    /// Mark a picture as a favourite
    Add { id: String },
    /// Remove a picture from the favourites
    Remove { id: String },
}
