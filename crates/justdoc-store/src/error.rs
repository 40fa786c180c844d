/// The two failure kinds callers of a document store need to distinguish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The channel or the document does not exist.
    NotFound,
    /// The storage engine could not complete the operation.
    StorageUnavailable,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::StorageUnavailable => write!(f, "storage unavailable"),
        }
    }
}

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested channel or document does not exist.
    ///
    /// A missing channel and a missing document inside an existing channel
    /// are reported identically.
    #[error("not found")]
    NotFound,

    /// The embedded engine failed (I/O, corruption, file lock held elsewhere).
    #[error("storage engine error: {0}")]
    Engine(#[from] redb::Error),

    /// The store has been closed.
    #[error("store is closed")]
    Closed,

    /// A thread panicked while holding the store handle lock.
    #[error("store handle lock poisoned")]
    LockPoisoned,

    /// The engine cannot create a channel with this name (the empty string).
    #[error("channel name cannot be stored: {0:?}")]
    InvalidChannelName(String),
}

impl StoreError {
    /// Classify this error into one of the two caller-facing kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Engine(_) | Self::Closed | Self::LockPoisoned | Self::InvalidChannelName(_) => {
                ErrorKind::StorageUnavailable
            }
        }
    }

    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

// redb splits its failures across one type per API surface; all of them are
// engine failures from the caller's point of view.
macro_rules! engine_error_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StoreError {
                fn from(err: $ty) -> Self {
                    Self::Engine(err.into())
                }
            }
        )*
    };
}

engine_error_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_kind() {
        let err = StoreError::NotFound;
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn unavailable_kinds() {
        assert_eq!(StoreError::Closed.kind(), ErrorKind::StorageUnavailable);
        assert_eq!(StoreError::LockPoisoned.kind(), ErrorKind::StorageUnavailable);
        assert_eq!(
            StoreError::InvalidChannelName(String::new()).kind(),
            ErrorKind::StorageUnavailable
        );

        let engine: StoreError = redb::StorageError::Corrupted("bad page".into()).into();
        assert_eq!(engine.kind(), ErrorKind::StorageUnavailable);
        assert!(!engine.is_not_found());
    }

    #[test]
    fn display_messages() {
        assert_eq!(StoreError::NotFound.to_string(), "not found");
        assert_eq!(StoreError::Closed.to_string(), "store is closed");
        assert_eq!(ErrorKind::StorageUnavailable.to_string(), "storage unavailable");
    }
}
