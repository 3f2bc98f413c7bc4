//! # Mock Store & Testing Guide
//!
//! `MockStorage` hands out a real [`StorageClient`] whose requests are answered
//! from a queue of expectations instead of a map. Use it to exercise the
//! failure paths a real store never produces on its own: a record that was
//! corrupted by another tab, a write that is acknowledged but never readable,
//! or a store that has gone away.
//!
//! | Feature | MockStorage | Real StorageActor |
//! |---------|-------------|-------------------|
//! | **State** | None (expectations) | Real map |
//! | **Change events** | Only what you [`MockStorage::emit`] | After every change |
//! | **Error injection** | Easy (`return_err`) | Not possible |
//!
//! ```rust
//! use origin_store::mock::MockStorage;
//! use origin_store::{StorageError, StorageScope};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockStorage::new(StorageScope::Durable);
//!     mock.expect_get("activeOrder").return_ok(Some("{not json".to_string()));
//!     mock.expect_set("activeOrder").return_err(StorageError::StoreClosed);
//!
//!     let client = mock.client();
//!     assert!(client.get("activeOrder").await.unwrap().is_some());
//!     assert!(client.set("activeOrder", "{}".to_string()).await.is_err());
//!
//!     mock.verify();
//! }
//! ```
//!
//! For lower-level assertions on the exact requests, [`create_mock_storage`]
//! returns a client plus the raw request receiver.

use crate::actor::EVENT_CAPACITY;
use crate::client::StorageClient;
use crate::error::StorageError;
use crate::event::{ChangeKind, StorageEvent, StorageScope, TabId};
use crate::message::{Response, StorageRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};

enum Expectation {
    Get {
        key: String,
        response: Result<Option<String>, StorageError>,
    },
    Set {
        key: String,
        response: Result<(), StorageError>,
    },
    Remove {
        key: String,
        response: Result<bool, StorageError>,
    },
    Clear {
        response: Result<(), StorageError>,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A mock store with expectation tracking.
///
/// Expectations are consumed in order; a request that does not match the next
/// expectation (wrong operation or wrong key) panics the mock task and the
/// caller sees [`StorageError::StoreDropped`].
pub struct MockStorage {
    client: StorageClient,
    events: broadcast::Sender<StorageEvent>,
    expectations: Expectations,
    writes: Arc<Mutex<Vec<(String, String)>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockStorage {
    /// Creates a new mock store with no expectations.
    pub fn new(scope: StorageScope) -> Self {
        let (sender, mut receiver) = mpsc::channel::<StorageRequest>(100);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let writes = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let writes_clone = writes.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        StorageRequest::Get { key, respond_to },
                        Some(Expectation::Get {
                            key: expected,
                            response,
                        }),
                    ) if key == expected => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StorageRequest::Set {
                            key,
                            value,
                            respond_to,
                            ..
                        },
                        Some(Expectation::Set {
                            key: expected,
                            response,
                        }),
                    ) if key == expected => {
                        if response.is_ok() {
                            writes_clone.lock().unwrap().push((key, value));
                        }
                        let _ = respond_to.send(response);
                    }
                    (
                        StorageRequest::Remove {
                            key, respond_to, ..
                        },
                        Some(Expectation::Remove {
                            key: expected,
                            response,
                        }),
                    ) if key == expected => {
                        let _ = respond_to.send(response);
                    }
                    (StorageRequest::Clear { respond_to, .. }, Some(Expectation::Clear { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected store request: {request:?}");
                    }
                }
            }
        });

        Self {
            client: StorageClient::new(scope, sender, events.clone()),
            events,
            expectations,
            writes,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> StorageClient {
        self.client.clone()
    }

    pub fn expect_get(&mut self, key: &str) -> GetExpectationBuilder {
        GetExpectationBuilder {
            key: key.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_set(&mut self, key: &str) -> SetExpectationBuilder {
        SetExpectationBuilder {
            key: key.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_remove(&mut self, key: &str) -> RemoveExpectationBuilder {
        RemoveExpectationBuilder {
            key: key.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_clear(&mut self) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Clear { response: Ok(()) });
    }

    /// Publishes a change event as if another tab had written `key`.
    pub fn emit(&self, key: &str, source: TabId) {
        let _ = self.events.send(StorageEvent {
            scope: self.client.scope(),
            key: Some(key.to_string()),
            kind: ChangeKind::Set,
            source,
        });
    }

    /// Every `(key, value)` accepted by a successful `set`, in order.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder {
    key: String,
    expectations: Expectations,
}

impl GetExpectationBuilder {
    pub fn return_ok(self, value: Option<String>) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            key: self.key,
            response: Ok(value),
        });
    }

    pub fn return_err(self, error: StorageError) {
        self.expectations.lock().unwrap().push_back(Expectation::Get {
            key: self.key,
            response: Err(error),
        });
    }
}

/// Builder for `set` expectations.
pub struct SetExpectationBuilder {
    key: String,
    expectations: Expectations,
}

impl SetExpectationBuilder {
    pub fn return_ok(self) {
        self.expectations.lock().unwrap().push_back(Expectation::Set {
            key: self.key,
            response: Ok(()),
        });
    }

    pub fn return_err(self, error: StorageError) {
        self.expectations.lock().unwrap().push_back(Expectation::Set {
            key: self.key,
            response: Err(error),
        });
    }
}

/// Builder for `remove` expectations.
pub struct RemoveExpectationBuilder {
    key: String,
    expectations: Expectations,
}

impl RemoveExpectationBuilder {
    pub fn return_ok(self, existed: bool) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Remove {
                key: self.key,
                response: Ok(existed),
            });
    }

    pub fn return_err(self, error: StorageError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Remove {
                key: self.key,
                response: Err(error),
            });
    }
}

// =============================================================================
// RAW HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// Nothing answers the requests unless the test does, which lets a test hold a
/// request open to observe what the caller does in the meantime.
pub fn create_mock_storage(
    scope: StorageScope,
    buffer_size: usize,
) -> (StorageClient, mpsc::Receiver<StorageRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    (StorageClient::new(scope, sender, events), receiver)
}

/// Waits for the next request and returns it if it is a `get`.
pub async fn expect_get(
    receiver: &mut mpsc::Receiver<StorageRequest>,
) -> Option<(String, Response<Option<String>>)> {
    match receiver.recv().await {
        Some(StorageRequest::Get { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is a `set`.
pub async fn expect_set(
    receiver: &mut mpsc::Receiver<StorageRequest>,
) -> Option<(String, String, TabId, Response<()>)> {
    match receiver.recv().await {
        Some(StorageRequest::Set {
            key,
            value,
            source,
            respond_to,
        }) => Some((key, value, source, respond_to)),
        _ => None,
    }
}
