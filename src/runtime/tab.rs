use crate::cart_store::{CartError, CartStore};
use crate::checkout::CheckoutEngine;
use crate::clients::{ActiveOrderClient, CartClient, OrderBackend};
use crate::clock::SharedClock;
use crate::config::EngineConfig;
use crate::order_lifecycle::{LifecycleActor, LifecycleContext, LifecycleError, OrderLifecycle};
use crate::sync_bus::{OrderSyncBus, OrderWatcher};
use crate::tracker::{OrderTrackerWidget, TrackerHandle};
use origin_store::{StorageClient, TabId};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// One open tab: its screens' components and the tasks behind them.
pub struct StorefrontTab {
    pub id: TabId,
    pub cart: CartStore,
    pub checkout: CheckoutEngine,
    pub lifecycle: OrderLifecycle,
    pub tracker: TrackerHandle,
    pub bus: OrderSyncBus,
    handles: Vec<JoinHandle<()>>,
}

impl StorefrontTab {
    pub(crate) fn open(
        id: TabId,
        config: Arc<EngineConfig>,
        clock: SharedClock,
        backend: Arc<dyn OrderBackend>,
        session: StorageClient,
        durable: StorageClient,
    ) -> Self {
        let cart = CartStore::new(CartClient::new(session), clock.clone(), config.cart_expiry());
        let orders = ActiveOrderClient::new(durable.clone());
        let bus = OrderSyncBus::new(id, config.sync_bus_capacity);

        let (lifecycle_actor, lifecycle) = LifecycleActor::new(config.channel_buffer);
        let lifecycle_handle = tokio::spawn(lifecycle_actor.run(LifecycleContext {
            config: config.clone(),
            clock: clock.clone(),
            cart: cart.clone(),
            orders: orders.clone(),
            bus: bus.clone(),
            backend,
        }));

        let watcher = OrderWatcher::new(&bus, &durable, config.tracker_tick());
        let (widget, tracker) = OrderTrackerWidget::new(
            orders,
            lifecycle.clone(),
            clock,
            watcher,
            config.channel_buffer,
        );
        let tracker_handle = tokio::spawn(widget.run());

        let checkout = CheckoutEngine::new(cart.clone(), config);

        Self {
            id,
            cart,
            checkout,
            lifecycle,
            tracker,
            bus,
            handles: vec![tracker_handle, lifecycle_handle],
        }
    }

    /// Route change: a cart past its expiry is discarded here.
    ///
    /// `StaleCartExpired` tells the caller to reload what showed the old cart.
    pub async fn navigate(&self) -> Result<(), CartError> {
        self.cart.enforce_expiry().await
    }

    /// Wipes the cart and the active order, abandoning anything pending.
    ///
    /// Returns whether an active order was destroyed.
    pub async fn full_reset(&self) -> Result<bool, LifecycleError> {
        let existed = self.lifecycle.reset().await?;
        if let Err(e) = self.cart.clear().await {
            warn!(error = %e, "Cart clear during reset failed");
        }
        info!(tab = %self.id, existed, "Storefront reset");
        Ok(existed)
    }

    /// Stops the tab's tasks.
    pub async fn close(self) -> Result<(), String> {
        let Self {
            id,
            tracker,
            lifecycle,
            handles,
            ..
        } = self;

        drop(tracker);
        drop(lifecycle);

        for handle in handles {
            if let Err(e) = handle.await {
                error!(tab = %id, "Tab task failed: {:?}", e);
                return Err(format!("Tab task failed: {:?}", e));
            }
        }

        info!(tab = %id, "Tab closed");
        Ok(())
    }
}
