//! # Store Client
//!
//! This module defines the cloneable handle for communicating with a store.

use crate::error::StorageError;
use crate::event::{StorageEvent, StorageScope, TabId};
use crate::message::StorageRequest;
use tokio::sync::{broadcast, mpsc, oneshot};

/// ## StorageClient
///
/// The `StorageClient` forwards raw JSON reads and writes to a
/// [`StorageActor`](crate::StorageActor) over a Tokio mpsc channel and awaits
/// the answer on a oneshot channel. It is cheap to clone.
///
/// Each client carries the [`TabId`] it writes on behalf of, so change events
/// can be attributed. Use [`StorageClient::for_tab`] to hand a tab its own
/// handle onto the shared store.
#[derive(Clone)]
pub struct StorageClient {
    scope: StorageScope,
    tab: TabId,
    sender: mpsc::Sender<StorageRequest>,
    events: broadcast::Sender<StorageEvent>,
}

impl StorageClient {
    pub fn new(
        scope: StorageScope,
        sender: mpsc::Sender<StorageRequest>,
        events: broadcast::Sender<StorageEvent>,
    ) -> Self {
        Self {
            scope,
            tab: TabId::ORIGIN,
            sender,
            events,
        }
    }

    pub fn scope(&self) -> StorageScope {
        self.scope
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// A handle onto the same store that attributes its writes to `tab`.
    pub fn for_tab(&self, tab: TabId) -> Self {
        Self {
            tab,
            ..self.clone()
        }
    }

    /// Subscribes to change notifications for this store.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StorageRequest::Get {
                key: key.to_string(),
                respond_to,
            })
            .await
            .map_err(|_| StorageError::StoreClosed)?;
        response.await.map_err(|_| StorageError::StoreDropped)?
    }

    pub async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StorageRequest::Set {
                key: key.to_string(),
                value,
                source: self.tab,
                respond_to,
            })
            .await
            .map_err(|_| StorageError::StoreClosed)?;
        response.await.map_err(|_| StorageError::StoreDropped)?
    }

    /// Removes `key`, returning whether it was present.
    pub async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StorageRequest::Remove {
                key: key.to_string(),
                source: self.tab,
                respond_to,
            })
            .await
            .map_err(|_| StorageError::StoreClosed)?;
        response.await.map_err(|_| StorageError::StoreDropped)?
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StorageRequest::Clear {
                source: self.tab,
                respond_to,
            })
            .await
            .map_err(|_| StorageError::StoreClosed)?;
        response.await.map_err(|_| StorageError::StoreDropped)?
    }
}
