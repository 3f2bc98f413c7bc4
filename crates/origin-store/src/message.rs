//! # Store Messages
//!
//! The request type sent from a [`StorageClient`](crate::StorageClient) to a
//! [`StorageActor`](crate::StorageActor). Values travel as JSON text, exactly
//! as a browser store holds them; decoding happens in the record layer so a
//! corrupt value can be stored and later detected.

use crate::error::StorageError;
use crate::event::TabId;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StorageError>>;

#[derive(Debug)]
pub enum StorageRequest {
    Get {
        key: String,
        respond_to: Response<Option<String>>,
    },
    Set {
        key: String,
        value: String,
        source: TabId,
        respond_to: Response<()>,
    },
    /// Responds with whether the key existed.
    Remove {
        key: String,
        source: TabId,
        respond_to: Response<bool>,
    },
    Clear {
        source: TabId,
        respond_to: Response<()>,
    },
}
