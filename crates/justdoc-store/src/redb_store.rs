use std::path::{Path, PathBuf};
use std::sync::RwLock;

use redb::{
    Database, ReadableTable, ReadableTableMetadata, TableDefinition, TableError, TableHandle,
};
use tracing::debug;

use crate::channel::ChannelInfo;
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// One redb table per channel: document name -> raw payload.
///
/// redb cannot name a table with the empty string, so `""` has no table.
fn channel_table(channel: &str) -> Option<TableDefinition<'_, &'static str, &'static [u8]>> {
    (!channel.is_empty()).then(|| TableDefinition::new(channel))
}

/// Persistent document store backed by a single redb file.
///
/// redb provides the concurrency contract: one write transaction at a time
/// across the whole file, any number of readers each on its own MVCC
/// snapshot. The `RwLock` only guards the handle's lifetime so that
/// [`close`](DocumentStore::close) can release the file while other
/// operations are refused afterwards; every data operation takes the shared
/// side.
pub struct RedbDocumentStore {
    db: RwLock<Option<Database>>,
    path: PathBuf,
}

impl RedbDocumentStore {
    /// Open the store at `path`, creating the file if it does not exist.
    ///
    /// Fails if another process (or another handle in this process) holds
    /// the file, if the file is corrupt, or if the path is not writable.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path)?;
        debug!(path = %path.display(), "document store opened");
        Ok(Self {
            db: RwLock::new(Some(db)),
            path,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once [`close`](DocumentStore::close) has succeeded.
    pub fn is_closed(&self) -> bool {
        self.db.read().map(|guard| guard.is_none()).unwrap_or(true)
    }

    fn with_db<T>(&self, f: impl FnOnce(&Database) -> StoreResult<T>) -> StoreResult<T> {
        let guard = self.db.read().map_err(|_| StoreError::LockPoisoned)?;
        let db = guard.as_ref().ok_or(StoreError::Closed)?;
        f(db)
    }
}

impl DocumentStore for RedbDocumentStore {
    fn get_document(&self, channel: &str, document: &str) -> StoreResult<Vec<u8>> {
        self.with_db(|db| {
            let def = channel_table(channel).ok_or(StoreError::NotFound)?;
            let txn = db.begin_read()?;
            let table = match txn.open_table(def) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Err(StoreError::NotFound),
                Err(e) => return Err(e.into()),
            };
            let value = table.get(document)?.ok_or(StoreError::NotFound)?;
            Ok(value.value().to_vec())
        })
    }

    fn put_document(&self, channel: &str, document: &str, data: &[u8]) -> StoreResult<bool> {
        self.with_db(|db| {
            let def = channel_table(channel)
                .ok_or_else(|| StoreError::InvalidChannelName(channel.to_owned()))?;
            // Dropping an uncommitted write transaction aborts it, so any
            // early return below leaves the file untouched.
            let txn = db.begin_write()?;
            let created = {
                let mut table = txn.open_table(def)?;
                let previous = table.insert(document, data)?;
                previous.is_none()
            };
            txn.commit()?;
            Ok(created)
        })
    }

    fn list_documents(&self, channel: &str) -> StoreResult<Vec<String>> {
        self.with_db(|db| {
            let def = channel_table(channel).ok_or(StoreError::NotFound)?;
            let txn = db.begin_read()?;
            let table = match txn.open_table(def) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Err(StoreError::NotFound),
                Err(e) => return Err(e.into()),
            };
            let mut names = Vec::with_capacity(table.len()? as usize);
            for entry in table.iter()? {
                let (key, _) = entry?;
                names.push(key.value().to_owned());
            }
            Ok(names)
        })
    }

    fn list_channels(&self) -> StoreResult<Vec<ChannelInfo>> {
        self.with_db(|db| {
            let txn = db.begin_read()?;
            let mut channels = Vec::new();
            for handle in txn.list_tables()? {
                let table = txn.open_table(TableDefinition::<&str, &[u8]>::new(handle.name()))?;
                channels.push(ChannelInfo::new(handle.name(), table.len()?));
            }
            channels.sort_unstable_by(|a, b| a.name.cmp(&b.name));
            Ok(channels)
        })
    }

    fn close(&self) -> StoreResult<()> {
        let mut guard = self.db.write().map_err(|_| StoreError::LockPoisoned)?;
        let db = guard.take().ok_or(StoreError::Closed)?;
        drop(db);
        debug!(path = %self.path.display(), "document store closed");
        Ok(())
    }
}

impl std::fmt::Debug for RedbDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbDocumentStore")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}
