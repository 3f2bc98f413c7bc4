//! # Store Clients
//!
//! Typed handles over the origin's two stores, one per persisted record, plus
//! the backend seam orders are reported through.
//!
//! | Client | Record | Key | Store |
//! |--------|--------|-----|-------|
//! | [`CartClient`] | [`CartRecord`] | `global_cart_data` | session |
//! | [`ActiveOrderClient`] | [`ActiveOrder`](crate::model::ActiveOrder) | `activeOrder` | durable |
//!
//! Both implement [`RecordClient`](origin_store::RecordClient) and only add
//! the error mapping of their component.

pub mod backend;
pub mod cart_client;
pub mod order_client;

pub use backend::*;
pub use cart_client::*;
pub use order_client::*;
