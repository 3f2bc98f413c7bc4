//! # Store Server
//!
//! This module defines the `StorageActor`, the task that owns one origin store.
//! It processes requests sequentially, so concurrent writers from different
//! tabs are serialized and the last write wins.

use crate::client::StorageClient;
use crate::event::{ChangeKind, StorageEvent, StorageScope, TabId};
use crate::message::StorageRequest;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

/// Capacity of the change-notification channel. Slow listeners lag rather than
/// block writers; a lagged listener simply re-reads.
pub const EVENT_CAPACITY: usize = 64;

/// The actor that owns the key/value map of one store.
///
/// **Concurrency Model**:
/// Every tab holds a clone of the same [`StorageClient`], but only this task
/// ever touches `entries`. There is no locking, no versioning and no conflict
/// detection: two tabs writing the same key at the same instant are applied in
/// channel order.
///
/// # Usage Pattern
///
/// 1.  **Create**: `StorageActor::new()` returns the actor and its client.
/// 2.  **Run**: spawn `actor.run()` on the runtime.
/// 3.  **Share**: clone the client (or [`StorageClient::for_tab`]) into each tab.
///
/// ```rust
/// use origin_store::{StorageActor, StorageScope};
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = StorageActor::new(StorageScope::Durable, 8);
///     let handle = tokio::spawn(actor.run());
///
///     let mut events = client.subscribe();
///     client.set("activeOrder", "{}".to_string()).await.unwrap();
///     assert!(events.recv().await.unwrap().touches("activeOrder"));
///
///     drop(client);
///     handle.await.unwrap();
/// }
/// ```
pub struct StorageActor {
    scope: StorageScope,
    receiver: mpsc::Receiver<StorageRequest>,
    entries: HashMap<String, String>,
    events: broadcast::Sender<StorageEvent>,
}

impl StorageActor {
    /// Creates a new store for `scope` and the client used to reach it.
    ///
    /// `buffer_size` is the capacity of the request channel; when full, callers
    /// wait for space.
    pub fn new(scope: StorageScope, buffer_size: usize) -> (Self, StorageClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let actor = Self {
            scope,
            receiver,
            entries: HashMap::new(),
            events: events.clone(),
        };
        let client = StorageClient::new(scope, sender, events);
        (actor, client)
    }

    /// Runs the store's event loop until every client has been dropped.
    pub async fn run(mut self) {
        let scope = self.scope;
        info!(%scope, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StorageRequest::Get { key, respond_to } => {
                    let value = self.entries.get(&key).cloned();
                    debug!(%scope, key, found = value.is_some(), "Get");
                    let _ = respond_to.send(Ok(value));
                }
                StorageRequest::Set {
                    key,
                    value,
                    source,
                    respond_to,
                } => {
                    debug!(%scope, key, %source, bytes = value.len(), "Set");
                    self.entries.insert(key.clone(), value);
                    info!(%scope, key, %source, size = self.entries.len(), "Stored");
                    self.publish(Some(key), ChangeKind::Set, source);
                    let _ = respond_to.send(Ok(()));
                }
                StorageRequest::Remove {
                    key,
                    source,
                    respond_to,
                } => {
                    let existed = self.entries.remove(&key).is_some();
                    debug!(%scope, key, %source, existed, "Remove");
                    if existed {
                        info!(%scope, key, %source, size = self.entries.len(), "Removed");
                        self.publish(Some(key), ChangeKind::Removed, source);
                    }
                    let _ = respond_to.send(Ok(existed));
                }
                StorageRequest::Clear { source, respond_to } => {
                    let cleared = self.entries.len();
                    self.entries.clear();
                    info!(%scope, %source, cleared, "Cleared");
                    if cleared > 0 {
                        self.publish(None, ChangeKind::Cleared, source);
                    }
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(%scope, size = self.entries.len(), "Shutdown");
    }

    fn publish(&self, key: Option<String>, kind: ChangeKind, source: TabId) {
        // No subscribers is fine: nobody is rendering this store right now.
        let _ = self.events.send(StorageEvent {
            scope: self.scope,
            key,
            kind,
            source,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_of_missing_key_publishes_nothing() {
        let (actor, client) = StorageActor::new(StorageScope::Session, 4);
        tokio::spawn(actor.run());
        let mut events = client.subscribe();

        assert!(!client.remove("global_cart_data").await.unwrap());
        client.set("probe", "1".to_string()).await.unwrap();

        // The first event observed is the write, not the no-op remove.
        let event = events.recv().await.unwrap();
        assert_eq!(event.key.as_deref(), Some("probe"));
        assert_eq!(event.kind, ChangeKind::Set);
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let (actor, client) = StorageActor::new(StorageScope::Durable, 4);
        tokio::spawn(actor.run());

        client.set("a", "1".to_string()).await.unwrap();
        client.set("b", "2".to_string()).await.unwrap();
        client.clear().await.unwrap();

        assert_eq!(client.get("a").await.unwrap(), None);
        assert_eq!(client.get("b").await.unwrap(), None);
    }
}
