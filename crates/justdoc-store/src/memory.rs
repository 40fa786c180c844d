use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::channel::ChannelInfo;
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

type Channels = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

/// In-memory, BTreeMap-based document store.
///
/// Intended for tests and embedding. Channels are held behind a single
/// `RwLock`, so every operation sees a consistent view and writers are
/// serialized across the whole store. `BTreeMap` keeps names in byte order.
pub struct InMemoryDocumentStore {
    channels: RwLock<Option<Channels>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(Some(BTreeMap::new())),
        }
    }

    /// Total number of documents across all channels.
    ///
    /// A closed store holds no documents.
    pub fn len(&self) -> StoreResult<usize> {
        let guard = self.read()?;
        Ok(guard
            .as_ref()
            .map(|channels| channels.values().map(BTreeMap::len).sum())
            .unwrap_or(0))
    }

    /// Returns `true` if no document is stored.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Option<Channels>>> {
        self.channels.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Option<Channels>>> {
        self.channels.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get_document(&self, channel: &str, document: &str) -> StoreResult<Vec<u8>> {
        let guard = self.read()?;
        let channels = guard.as_ref().ok_or(StoreError::Closed)?;
        channels
            .get(channel)
            .and_then(|docs| docs.get(document))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn put_document(&self, channel: &str, document: &str, data: &[u8]) -> StoreResult<bool> {
        let mut guard = self.write()?;
        let channels = guard.as_mut().ok_or(StoreError::Closed)?;
        // Same rule as the redb backend, which cannot name a table "".
        if channel.is_empty() {
            return Err(StoreError::InvalidChannelName(channel.to_owned()));
        }
        let previous = channels
            .entry(channel.to_owned())
            .or_default()
            .insert(document.to_owned(), data.to_vec());
        Ok(previous.is_none())
    }

    fn list_documents(&self, channel: &str) -> StoreResult<Vec<String>> {
        let guard = self.read()?;
        let channels = guard.as_ref().ok_or(StoreError::Closed)?;
        let docs = channels.get(channel).ok_or(StoreError::NotFound)?;
        Ok(docs.keys().cloned().collect())
    }

    fn list_channels(&self) -> StoreResult<Vec<ChannelInfo>> {
        let guard = self.read()?;
        let channels = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(channels
            .iter()
            .map(|(name, docs)| ChannelInfo::new(name.clone(), docs.len() as u64))
            .collect())
    }

    fn close(&self) -> StoreResult<()> {
        let mut guard = self.write()?;
        guard.take().map(|_| ()).ok_or(StoreError::Closed)
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("InMemoryDocumentStore");
        match self.len() {
            Ok(count) => d.field("document_count", &count),
            Err(_) => d.field("document_count", &"<poisoned>"),
        };
        d.finish()
    }
}
