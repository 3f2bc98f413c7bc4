//! # Domain Model
//!
//! Plain data shared by every component. Nothing here talks to a store or a
//! task; the types only know how to derive things from themselves (vendor
//! grouping, security codes, remaining time).
//!
//! Persisted types use camelCase JSON so the records under
//! [`CART_KEY`](crate::clients::CART_KEY) and
//! [`ACTIVE_ORDER_KEY`](crate::clients::ACTIVE_ORDER_KEY) keep the layout the
//! storefront pages read.

pub mod cart;
pub mod checkout;
pub mod order;
pub mod table;
pub mod vendor;

pub use cart::*;
pub use checkout::*;
pub use order::*;
pub use table::*;
pub use vendor::*;

/// Money in whole currency units.
pub type Amount = u64;
