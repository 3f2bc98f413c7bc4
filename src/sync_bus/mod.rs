//! # Order Sync Bus
//!
//! Tells a tab's screens that the active order may have changed. The signal
//! carries no order data: every listener re-reads the stored record, so a
//! duplicated, late, or lost signal costs at most one extra read or one tick
//! of staleness.
//!
//! Signals stay inside the tab that raised them. Other tabs learn of the same
//! write through the durable store's change events, and [`OrderWatcher`]
//! treats both sources the same way.

pub mod watcher;

pub use watcher::{ForeignOrderWrites, OrderWatcher, Wake};

use origin_store::TabId;
use tokio::sync::broadcast;
use tracing::debug;

/// "The active order was written or deleted."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderUpdated {
    pub source: TabId,
}

#[derive(Clone)]
pub struct OrderSyncBus {
    tab: TabId,
    sender: broadcast::Sender<OrderUpdated>,
}

impl OrderSyncBus {
    pub fn new(tab: TabId, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { tab, sender }
    }

    /// Raised after every write or delete of the active order.
    pub fn announce(&self) {
        let listeners = self.sender.send(OrderUpdated { source: self.tab }).unwrap_or(0);
        debug!(tab = %self.tab, listeners, "Order update announced");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrderUpdated> {
        self.sender.subscribe()
    }
}
