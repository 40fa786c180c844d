use crate::channel::ChannelInfo;
use crate::error::{StoreError, StoreResult};

/// Channel/document store.
///
/// All implementations must satisfy these invariants:
/// - Every mutation is atomic: a write either fully commits or has no effect.
/// - Listings are taken from a single consistent snapshot and are sorted by
///   the byte-wise order of the names.
/// - Names are opaque. The store never validates or rewrites them.
/// - Payloads are opaque. The store returns exactly the bytes it was given.
/// - Errors are propagated, never logged, retried or swallowed.
///
/// Implementations are shared between request workers, so they must be
/// callable concurrently without external locking.
pub trait DocumentStore: Send + Sync {
    /// Read the bytes last written to `(channel, document)`.
    ///
    /// Returns [`StoreError::NotFound`] if either the channel or the document
    /// does not exist.
    fn get_document(&self, channel: &str, document: &str) -> StoreResult<Vec<u8>>;

    /// Write `data` to `(channel, document)`, creating the channel if needed.
    ///
    /// Returns `true` if the document did not exist before this write and
    /// `false` if an existing value was replaced.
    fn put_document(&self, channel: &str, document: &str, data: &[u8]) -> StoreResult<bool>;

    /// List every document name in `channel`, sorted ascending.
    ///
    /// Returns [`StoreError::NotFound`] if the channel has never been written.
    fn list_documents(&self, channel: &str) -> StoreResult<Vec<String>>;

    /// List every channel with its document count, sorted ascending by name.
    fn list_channels(&self) -> StoreResult<Vec<ChannelInfo>>;

    /// Release the underlying storage. Every later call fails.
    fn close(&self) -> StoreResult<()>;

    /// Check whether a channel exists.
    fn channel_exists(&self, channel: &str) -> StoreResult<bool> {
        not_found_as_false(self.list_documents(channel))
    }

    /// Check whether a document exists.
    fn document_exists(&self, channel: &str, document: &str) -> StoreResult<bool> {
        not_found_as_false(self.get_document(channel, document))
    }
}

fn not_found_as_false<T>(result: StoreResult<T>) -> StoreResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(StoreError::NotFound) => Ok(false),
        Err(e) => Err(e),
    }
}
