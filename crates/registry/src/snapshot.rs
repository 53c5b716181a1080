/// Last-known contents of one registry list.
///
/// Starts out stale. Every write to the underlying table must call
/// [`invalidate`](Self::invalidate); reads go to the database only while the
/// snapshot is stale.
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    entries: Option<Vec<String>>,
}

impl Snapshot {
    pub(crate) fn invalidate(&mut self) {
        self.entries = None;
    }

    pub(crate) fn is_stale(&self) -> bool {
        self.entries.is_none()
    }

    /// The cached entries, or `None` if they need to be re-queried.
    pub(crate) fn get(&self) -> Option<&[String]> {
        self.entries.as_deref()
    }

    pub(crate) fn store(&mut self, entries: Vec<String>) {
        self.entries = Some(entries);
    }
}

/// Snapshots of both lists for one database.
///
/// Owned by the [`Database`](crate::Database) so that every registry opened
/// on it sees the same invalidations.
#[derive(Debug, Default)]
pub(crate) struct Snapshots {
    pub(crate) recent: Snapshot,
    pub(crate) favourites: Snapshot,
}
