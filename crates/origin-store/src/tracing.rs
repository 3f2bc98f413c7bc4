//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for every store and every
//! storefront component with the `tracing` crate.
//!
//! - **Structured fields**: stores log `scope`, `key` and `source` tab on each
//!   change; engine components log order ids, vendor ids and states.
//! - **Configurable levels** through `RUST_LOG`.
//! - **Compact format** with spans shown inline.
//!
//! ```bash
//! RUST_LOG=info cargo run      # one line per state change
//! RUST_LOG=debug cargo run     # every read, every tick
//! ```
//!
//! With `RUST_LOG=info` a confirmed order reads roughly like:
//!
//! ```text
//! INFO Stored scope=session key="global_cart_data" source=tab_1 size=1
//! INFO Order pending order_vendors=2 window_secs=100
//! INFO Order confirmed order_id=... trigger=Countdown
//! INFO Removed scope=session key="global_cart_data" source=tab_1 size=0
//! INFO Stored scope=durable key="activeOrder" source=tab_1 size=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Components carry their own fields; module paths add noise
        .compact()
        .init();
}
