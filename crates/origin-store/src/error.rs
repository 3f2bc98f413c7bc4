//! # Storage Errors
//!
//! Errors raised by the store runtime and the typed record layer. Components
//! above this crate decide how to degrade; a [`StorageError::Malformed`] record
//! is usually read as "absent".

use crate::event::StorageScope;

/// Errors that can occur while talking to a store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error("Malformed record under `{key}`: {reason}")]
    Malformed { key: String, reason: String },
    #[error("Failed to encode record for `{key}`: {reason}")]
    Encode { key: String, reason: String },
    #[error("Record `{key}` belongs to the {expected} store, not the {actual} store")]
    ScopeMismatch {
        key: &'static str,
        expected: StorageScope,
        actual: StorageScope,
    },
}

impl StorageError {
    /// True for errors caused by the stored bytes rather than the runtime.
    pub fn is_read_error(&self) -> bool {
        matches!(self, StorageError::Malformed { .. })
    }
}
