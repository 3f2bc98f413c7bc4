//! # Storefront Engine
//!
//! The cart-to-order lifecycle of a multi-vendor food storefront. A cart may
//! span restaurants; once checkout passes, a timed window turns it into the
//! single active order that every open tab tracks.
//!
//! All state lives in the origin's two client-side stores (see the
//! `origin-store` crate). Components never share memory; they share records
//! and re-read them when told something changed.
//!
//! ## Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`cart_store`] | Lines grouped by vendor, multi-vendor policy, expiry |
//! | [`checkout`] | Fees, dine-in single-vendor rule, tables, submission gating |
//! | [`order_lifecycle`] | Pending → Confirmed → received, as an actor with a timer |
//! | [`sync_bus`] | "Order changed" signals and the watcher merging them |
//! | [`tracker`] | The active-order widget: countdowns, codes, ratings |
//! | [`runtime`] | [`Storefront`](runtime::Storefront) origin and its tabs |
//!
//! Supporting modules: [`model`] (plain data), [`clients`] (typed records and
//! the backend seam), [`config`], [`clock`].
//!
//! ## Flow
//!
//! ```text
//! add_item ──► CartStore ──► CheckoutEngine::submit ──► OrderLifecycle
//!                                                          │ confirm
//!                                                          ▼
//!                              OrderTrackerWidget ◄── activeOrder + OrderSyncBus
//! ```
//!
//! ## Testing
//!
//! Store failures are simulated with `origin_store::mock::MockStorage`, the
//! backend with [`clients::MockOrderBackend`], and timers with tokio's paused
//! clock together with [`clock::InstantClock`].

pub mod cart_store;
pub mod checkout;
pub mod clients;
pub mod clock;
pub mod config;
pub mod model;
pub mod order_lifecycle;
pub mod runtime;
pub mod sync_bus;
pub mod tracker;
