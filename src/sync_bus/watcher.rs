use crate::clients::ACTIVE_ORDER_KEY;
use crate::sync_bus::{OrderSyncBus, OrderUpdated};
use origin_store::{StorageClient, StorageEvent, TabId};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::debug;

/// Why a reader should look at the active order again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// This tab announced a change.
    Signal,
    /// The durable store changed the active order, usually from another tab.
    StorageChanged,
    Tick,
}

/// Merges the bus, the durable store's change events and a periodic tick.
///
/// The first [`next_wake`](OrderWatcher::next_wake) resolves immediately with
/// a tick so readers render once on start.
pub struct OrderWatcher {
    signals: broadcast::Receiver<OrderUpdated>,
    storage: broadcast::Receiver<StorageEvent>,
    tick: Interval,
    signals_open: bool,
    storage_open: bool,
}

impl OrderWatcher {
    pub fn new(bus: &OrderSyncBus, durable: &StorageClient, period: Duration) -> Self {
        let mut tick = interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            signals: bus.subscribe(),
            storage: durable.subscribe(),
            tick,
            signals_open: true,
            storage_open: true,
        }
    }

    pub async fn next_wake(&mut self) -> Wake {
        loop {
            tokio::select! {
                signal = self.signals.recv(), if self.signals_open => match signal {
                    Ok(_) => return Wake::Signal,
                    Err(RecvError::Lagged(missed)) => {
                        debug!(missed, "Order signals lagged");
                        return Wake::Signal;
                    }
                    Err(RecvError::Closed) => self.signals_open = false,
                },
                event = self.storage.recv(), if self.storage_open => match event {
                    Ok(event) if event.touches(ACTIVE_ORDER_KEY) => return Wake::StorageChanged,
                    Ok(_) => {}
                    Err(RecvError::Lagged(missed)) => {
                        debug!(missed, "Storage events lagged");
                        return Wake::StorageChanged;
                    }
                    Err(RecvError::Closed) => self.storage_open = false,
                },
                _ = self.tick.tick() => return Wake::Tick,
            }
        }
    }
}

/// Writes to the active order made by any tab other than the subscriber's.
///
/// The lifecycle uses this to notice an order completed or replaced elsewhere;
/// its own writes never wake it.
pub struct ForeignOrderWrites {
    events: broadcast::Receiver<StorageEvent>,
    tab: TabId,
    open: bool,
}

impl ForeignOrderWrites {
    pub fn new(durable: &StorageClient) -> Self {
        Self {
            events: durable.subscribe(),
            tab: durable.tab(),
            open: true,
        }
    }

    /// Resolves on the next foreign write; never resolves once the store is gone.
    pub async fn next(&mut self) {
        while self.open {
            match self.events.recv().await {
                Ok(event) if event.touches(ACTIVE_ORDER_KEY) && event.source != self.tab => return,
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    debug!(missed, "Order writes lagged");
                    return;
                }
                Err(RecvError::Closed) => self.open = false,
            }
        }
        std::future::pending::<()>().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use origin_store::{StorageActor, StorageScope, TabId};

    #[tokio::test(start_paused = true)]
    async fn wakes_on_every_source() {
        let (actor, durable) = StorageActor::new(StorageScope::Durable, 8);
        tokio::spawn(actor.run());
        let bus = OrderSyncBus::new(TabId(1), 4);
        let mut watcher = OrderWatcher::new(&bus, &durable, Duration::from_secs(1));

        assert_eq!(watcher.next_wake().await, Wake::Tick);

        bus.announce();
        assert_eq!(watcher.next_wake().await, Wake::Signal);

        // Unrelated keys are ignored.
        durable.set("theme", "{}".to_string()).await.unwrap();
        durable
            .for_tab(TabId(2))
            .set(ACTIVE_ORDER_KEY, "{}".to_string())
            .await
            .unwrap();
        assert_eq!(watcher.next_wake().await, Wake::StorageChanged);

        assert_eq!(watcher.next_wake().await, Wake::Tick);
    }

    #[tokio::test]
    async fn foreign_writes_skip_the_own_tab() {
        let (actor, origin) = StorageActor::new(StorageScope::Durable, 8);
        tokio::spawn(actor.run());
        let own = origin.for_tab(TabId(1));
        let mut writes = ForeignOrderWrites::new(&own);

        own.set(ACTIVE_ORDER_KEY, "{}".to_string()).await.unwrap();
        origin.for_tab(TabId(2)).remove(ACTIVE_ORDER_KEY).await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), writes.next())
            .await
            .expect("Foreign write not seen");
        assert!(
            tokio::time::timeout(Duration::from_millis(50), writes.next())
                .await
                .is_err(),
            "Own write woke the subscriber"
        );
    }
}
