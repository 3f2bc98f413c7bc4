//! # Order Lifecycle
//!
//! Moves a submitted checkout through its confirmation window into the
//! durable active-order record.
//!
//! ```text
//!            begin                 countdown / confirm_now           mark_received
//!   Idle ──────────────► Pending ───────────────────────► Confirmed ──────────────► Idle
//!                          │                                (record written,        (record deleted)
//!                          │ abandon                         cart cleared)
//!                          ▼
//!                        Idle (submission handed back, nothing written)
//! ```
//!
//! ## Confirmation
//!
//! Exactly once per pending order, whether the countdown or the customer gets
//! there first:
//!
//! 1. Draw the security base code.
//! 2. Pick the delivery duration for the method.
//! 3. Write the [`ActiveOrder`](crate::model::ActiveOrder) stamped with the
//!    current time.
//! 4. Clear the cart and announce on the [`OrderSyncBus`](crate::sync_bus::OrderSyncBus).
//! 5. Report the order to the backend without waiting for it.
//!
//! A store write that fails is logged; the order counts as confirmed locally
//! and readers that cannot find the record show no active order.
//!
//! ## Other tabs
//!
//! Outside the confirmation window the actor follows the stored record. When
//! another tab writes or deletes the active order, it re-reads it and moves to
//! `Confirmed` with the stored id or back to `Idle`. [`OrderLifecycle::reset`]
//! deletes the record through the actor so its own state never lags.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (actor, lifecycle) = LifecycleActor::new(config.channel_buffer);
//! tokio::spawn(actor.run(LifecycleContext { config, clock, cart, orders, bus, backend }));
//!
//! checkout.submit(&lifecycle).await;           // Pending
//! lifecycle.confirm_now().await?;              // Confirmed
//! lifecycle.mark_received().await?;            // back to Idle
//! ```

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod security;
pub mod status;

pub use actor::{LifecycleActor, LifecycleContext};
pub use client::OrderLifecycle;
pub use error::LifecycleError;
pub use message::{ConfirmOutcome, ConfirmTrigger};
pub use status::LifecycleStatus;
