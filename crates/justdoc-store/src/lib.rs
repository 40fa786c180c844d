//! Channel/document storage engine for JustDoc.
//!
//! Documents are opaque byte payloads addressed by `(channel, document)`.
//! Channels are created implicitly by the first write into them and hold
//! nothing but their documents.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`RedbDocumentStore`] -- single-file redb database, one table per channel
//! - [`InMemoryDocumentStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Every operation is one transaction. Writes either commit fully or not at all.
//! 2. The created/updated result of a write comes from the same transaction
//!    that performs the write.
//! 3. One writer at a time across the whole store; readers run concurrently on
//!    private snapshots.
//! 4. Listings are sorted by the byte order of the names.
//! 5. The store never interprets names or payloads.
//! 6. All engine errors are propagated, never silently ignored.

pub mod channel;
pub mod error;
pub mod memory;
pub mod redb_store;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use channel::ChannelInfo;
pub use error::{ErrorKind, StoreError, StoreResult};
pub use memory::InMemoryDocumentStore;
pub use redb_store::RedbDocumentStore;
pub use traits::DocumentStore;
