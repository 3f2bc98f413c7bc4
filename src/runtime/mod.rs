//! # Runtime Wiring
//!
//! Starting, connecting and stopping the engine's tasks.
//!
//! A [`Storefront`] is one browser origin: it owns the session and durable
//! stores. Each [`StorefrontTab`] is one open tab with its own lifecycle
//! actor, tracker widget and sync bus, talking to the origin's stores through
//! clients stamped with the tab's id.
//!
//! ```text
//! Storefront ─┬─ StorageActor (session)   global_cart_data
//!             ├─ StorageActor (durable)   activeOrder
//!             │
//!             ├─ StorefrontTab 1 ─┬─ LifecycleActor
//!             │                   └─ OrderTrackerWidget
//!             └─ StorefrontTab 2 ─┬─ LifecycleActor
//!                                 └─ OrderTrackerWidget
//! ```
//!
//! ## Shutdown
//!
//! Dependencies only point downward, so closing channels from the top is
//! enough:
//!
//! 1. [`StorefrontTab::close`] drops the tracker handle (the widget exits and
//!    releases its lifecycle client), then the lifecycle client (the actor
//!    exits), and awaits both tasks.
//! 2. [`Storefront::shutdown`] drops the store clients and awaits the stores.
//!    Close every tab first; a tab still open keeps the stores alive.

pub mod storefront;
pub mod tab;

pub use storefront::Storefront;
pub use tab::StorefrontTab;
