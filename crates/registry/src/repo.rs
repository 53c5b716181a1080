//! Recents and favourites, tracked by picture identifier.
//!
//! The two lists are independent: an identifier may be in both, either or
//! neither. Identifiers are opaque to the registry and are stored and returned
//! byte-for-byte.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::snapshot::Snapshots;
use exn::ResultExt;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// Maximum number of entries kept in the recents list.
pub const MAX_RECENT: u32 = 10;

/// Registry of recently viewed and favourite pictures.
///
/// - **Recents** is a most-recently-used list capped at [`MAX_RECENT`]
///   entries. Adding an identifier that is already present moves it to the
///   front instead of duplicating it.
/// - **Favourites** is a set, ordered for display by when each entry was
///   added. Adding a duplicate is silently ignored by the storage layer.
///
/// Both getters return most-recent-first. Each list keeps a snapshot of its
/// last read which is thrown away by any write to that list, so repeated
/// reads without intervening writes don't hit the database. The snapshots
/// belong to the [`Database`], so registries created from the same handle (or
/// its clones) always agree with each other.
#[derive(Debug, Clone)]
pub struct Registry {
    pool: SqlitePool,
    snapshots: Arc<Mutex<Snapshots>>,
}
impl From<&Database> for Registry {
    fn from(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
            snapshots: Arc::clone(db.snapshots()),
        }
    }
}
impl Registry {
    // =========================================================================
    // Recents
    // =========================================================================

    /// Record `id` as the most recently viewed picture.
    ///
    /// Any existing entry for `id` is removed first, then the new entry is
    /// inserted and everything beyond the newest [`MAX_RECENT`] is pruned. All
    /// three steps commit together or not at all.
    #[instrument(skip(self, id), fields(id = id.as_ref()))]
    pub async fn add_recent(&self, id: impl AsRef<str>) -> Result<()> {
        let id = id.as_ref();
        let mut snapshots = self.snapshots.lock().await;
        snapshots.recent.invalidate();
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::WriteFailed)?;
        sqlx::query(include_str!("../queries/delete_recent.sql"))
            .bind(id)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::WriteFailed)?;
        sqlx::query(include_str!("../queries/insert_recent.sql"))
            .bind(id)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::WriteFailed)?;
        let pruned = sqlx::query(include_str!("../queries/prune_recent.sql"))
            .bind(i64::from(MAX_RECENT))
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::WriteFailed)?
            .rows_affected();
        tx.commit().await.or_raise(|| ErrorKind::WriteFailed)?;
        if pruned > 0 {
            tracing::debug!(pruned, "Evicted oldest recents");
        }
        Ok(())
    }

    /// List recently viewed pictures, newest first.
    pub async fn get_recent(&self) -> Result<Vec<String>> {
        let mut snapshots = self.snapshots.lock().await;
        if snapshots.recent.is_stale() {
            let entries = Self::list(&self.pool, include_str!("../queries/list_recent.sql")).await?;
            snapshots.recent.store(entries);
        }
        Ok(snapshots.recent.get().unwrap_or_default().to_vec())
    }

    // =========================================================================
    // Favourites
    // =========================================================================

    /// Add `id` to the favourites. Does nothing if it's already a favourite.
    #[instrument(skip(self, id), fields(id = id.as_ref()))]
    pub async fn add_favourite(&self, id: impl AsRef<str>) -> Result<()> {
        let mut snapshots = self.snapshots.lock().await;
        snapshots.favourites.invalidate();
        let inserted = sqlx::query(include_str!("../queries/insert_favourite.sql"))
            .bind(id.as_ref())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::WriteFailed)?
            .rows_affected();
        if inserted == 0 {
            tracing::debug!("Already a favourite");
        }
        Ok(())
    }

    /// Remove `id` from the favourites. Does nothing if it isn't one.
    #[instrument(skip(self, id), fields(id = id.as_ref()))]
    pub async fn remove_favourite(&self, id: impl AsRef<str>) -> Result<()> {
        let mut snapshots = self.snapshots.lock().await;
        snapshots.favourites.invalidate();
        sqlx::query(include_str!("../queries/delete_favourite.sql"))
            .bind(id.as_ref())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::WriteFailed)?;
        Ok(())
    }

    /// List favourite pictures, most recently favourited first.
    pub async fn get_favourites(&self) -> Result<Vec<String>> {
        let mut snapshots = self.snapshots.lock().await;
        if snapshots.favourites.is_stale() {
            let entries = Self::list(&self.pool, include_str!("../queries/list_favourites.sql")).await?;
            snapshots.favourites.store(entries);
        }
        Ok(snapshots.favourites.get().unwrap_or_default().to_vec())
    }

    /// Whether `id` is currently a favourite.
    pub async fn is_favourite(&self, id: impl AsRef<str>) -> Result<bool> {
        let snapshots = self.snapshots.lock().await;
        if let Some(entries) = snapshots.favourites.get() {
            return Ok(entries.iter().any(|entry| entry == id.as_ref()));
        }
        let exists: i64 = sqlx::query_scalar(include_str!("../queries/favourite_exists.sql"))
            .bind(id.as_ref())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::ReadFailed)?;
        Ok(exists != 0)
    }

    async fn list(pool: &SqlitePool, query: &'static str) -> Result<Vec<String>> {
        sqlx::query_scalar(query).fetch_all(pool).await.or_raise(|| ErrorKind::ReadFailed)
    }
}
