//! Layered configuration for textpic.
//!
//! Values are merged from, lowest precedence first:
//! 1. built-in defaults (platform data directory, language `0`),
//! 2. an optional configuration file (`.toml`, `.yaml`/`.yml` or `.json`),
//! 3. `TEXTPIC_*` environment variables (e.g. `TEXTPIC_LANGUAGE=1`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "TEXTPIC_";
const DATABASE_FILENAME: &str = "registry.sqlite";
const CATALOG_DIRNAME: &str = "catalog";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file holding recents and favourites.
    pub database: PathBuf,
    /// Root directory of the text-art catalog.
    pub catalog: PathBuf,
    /// Position of the active language in packed titles.
    pub language: usize,
}

impl Config {
    /// Defaults rooted in the platform's data directory.
    pub fn defaults() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "textpic").ok_or_raise(|| ErrorKind::NoHomeDirectory)?;
        Ok(Self::defaults_in(dirs.data_dir()))
    }

    fn defaults_in(data_dir: &Path) -> Self {
        Self {
            database: data_dir.join(DATABASE_FILENAME),
            catalog: data_dir.join(CATALOG_DIRNAME),
            language: 0,
        }
    }

    /// Load configuration, optionally merging in the file at `path`.
    ///
    /// A file that was explicitly asked for must exist.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(Self::defaults()?, path)?.extract().or_raise(|| ErrorKind::Invalid)?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Build the layered figment on top of the given defaults.
    pub fn figment(defaults: Self, path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(defaults));
        if let Some(path) = path {
            if !path.is_file() {
                exn::bail!(ErrorKind::Missing(path.to_path_buf()));
            }
            let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }
}
