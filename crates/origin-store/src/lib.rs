//! # Origin Store
//!
//! Client-resident key/value storage for a single browser origin, modelled as
//! Tokio actors. A storefront keeps two of these: a **session** store (the
//! in-progress cart) and a **durable** store (the active order). Every tab of
//! the storefront talks to the same two stores through cheap, cloneable
//! [`StorageClient`] handles.
//!
//! ## Why an actor?
//!
//! The records kept here are singletons per origin that *any* tab may read or
//! overwrite at any moment. Putting each store behind one task that processes
//! requests sequentially gives the same last-write-wins semantics the browser
//! gives, without a `Mutex` around the map and without ambient globals: the
//! store is an explicit object injected into whatever component needs it.
//!
//! ## Layers
//!
//! 1. **Runtime** ([`StorageActor`]) - owns the map, answers requests, publishes
//!    a [`StorageEvent`] after every change (the equivalent of the browser's
//!    cross-tab `storage` notification).
//! 2. **Raw interface** ([`StorageClient`]) - `get` / `set` / `remove` / `clear`
//!    on JSON text, plus [`StorageClient::subscribe`].
//! 3. **Typed records** ([`StoredRecord`], [`RecordClient`]) - a record type
//!    declares its key and scope once; domain clients get `load`, `save` and
//!    `delete` for free.
//!
//! ```rust
//! use origin_store::{StorageActor, StorageScope};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = StorageActor::new(StorageScope::Session, 16);
//!     tokio::spawn(actor.run());
//!
//!     client.set("greeting", "\"hello\"".to_string()).await.unwrap();
//!     assert_eq!(client.get("greeting").await.unwrap().as_deref(), Some("\"hello\""));
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockStorage`] answers requests from a queue of expectations, which
//! makes it easy to simulate a malformed record or a write that never lands.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod error;
pub mod event;
pub mod message;
pub mod mock;
pub mod record;
pub mod tracing;

pub use actor::StorageActor;
pub use client::StorageClient;
pub use client_trait::RecordClient;
pub use error::StorageError;
pub use event::{ChangeKind, StorageEvent, StorageScope, TabId};
pub use message::{Response, StorageRequest};
pub use record::StoredRecord;
