//! Database connection and schema management.

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::snapshot::Snapshots;

/// Embedded migrations that create the `recent` and `favourites` tables.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
// Only ever driven from one thread; a second connection would just sit idle.
const MAX_CONNECTIONS: u32 = 1;

/// Handle to the registry database file.
///
/// Opening a database always ensures the schema exists, so a freshly created
/// file is immediately usable by a [`Registry`](crate::Registry).
///
/// Clones share the pool and the registry's list snapshots, so every
/// registry opened on the same handle reads through one cache.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    snapshots: Arc<Mutex<Snapshots>>,
}

impl Database {
    async fn new(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::StorageUnavailable)?;
        let db = Self { pool, snapshots: Arc::default() };
        db.initialize().await?;
        Ok(db)
    }

    /// Open the registry database at the given path.
    ///
    /// Creates the file if it doesn't exist yet, then creates any missing tables.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::StorageUnavailable)?;
        }
        let options = Self::base_options().filename(path).create_if_missing(true);
        Self::new(options).await
    }

    /// Open a throwaway in-memory database.
    ///
    /// Not gated behind `#[cfg(test)]` so that dependent crates can use it in
    /// their own tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = Self::base_options().filename(":memory:");
        Self::new(options).await
    }

    fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_millis(1500))
    }

    /// Ensure both registry tables exist.
    ///
    /// Idempotent: called automatically by [`connect`](Self::connect) and
    /// [`connect_in_memory`](Self::connect_in_memory), and harmless to call again.
    #[instrument("ensuring registry schema", skip(self))]
    pub async fn initialize(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.or_raise(|| ErrorKind::StorageUnavailable)
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) fn snapshots(&self) -> &Arc<Mutex<Snapshots>> {
        &self.snapshots
    }

    /// Close the database.
    ///
    /// Waits for the connection to be returned to the pool. The handle (and any
    /// registry created from it) must not be used afterwards.
    pub async fn close(&self) {
        _ = sqlx::query("PRAGMA optimize").execute(&self.pool).await;
        self.pool.close().await;
    }
}
