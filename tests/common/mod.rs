#![allow(dead_code)]

use origin_store::{StorageActor, StorageClient, StorageScope, TabId};
use std::sync::Arc;
use storefront_engine::cart_store::CartStore;
use storefront_engine::checkout::CheckoutEngine;
use storefront_engine::clients::{ActiveOrderClient, CartClient, LoggingBackend, OrderBackend};
use storefront_engine::clock::{InstantClock, SharedClock};
use storefront_engine::config::EngineConfig;
use storefront_engine::model::{Product, VendorId};
use storefront_engine::order_lifecycle::{LifecycleActor, LifecycleContext, OrderLifecycle};
use storefront_engine::sync_bus::OrderSyncBus;

/// 2023-11-14T22:13:20Z
pub const T0: u64 = 1_700_000_000_000;

pub fn clock() -> SharedClock {
    Arc::new(InstantClock::starting_at(T0))
}

pub fn start_store(scope: StorageScope) -> StorageClient {
    let (actor, client) = StorageActor::new(scope, 16);
    tokio::spawn(actor.run());
    client
}

pub fn burger() -> Product {
    Product::new("Burger", 200)
}

pub fn pizza() -> Product {
    Product::new("Pan Pizza", 550)
}

pub fn kfc() -> VendorId {
    VendorId::from("kfc")
}

pub fn pizzahut() -> VendorId {
    VendorId::from("pizzahut")
}

/// One tab's engine, wired by hand onto the given stores.
pub struct Harness {
    pub config: Arc<EngineConfig>,
    pub clock: SharedClock,
    pub session: StorageClient,
    pub durable: StorageClient,
    pub cart: CartStore,
    pub orders: ActiveOrderClient,
    pub bus: OrderSyncBus,
    pub lifecycle: OrderLifecycle,
    pub checkout: CheckoutEngine,
}

impl Harness {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_backend(config, Arc::new(LoggingBackend))
    }

    pub fn with_backend(config: EngineConfig, backend: Arc<dyn OrderBackend>) -> Self {
        let session = start_store(StorageScope::Session);
        let durable = start_store(StorageScope::Durable);
        Self::on_stores(config, backend, session, durable)
    }

    pub fn on_stores(
        config: EngineConfig,
        backend: Arc<dyn OrderBackend>,
        session: StorageClient,
        durable: StorageClient,
    ) -> Self {
        let config = Arc::new(config);
        let clock = clock();
        let tab = TabId(1);
        let session = session.for_tab(tab);
        let durable = durable.for_tab(tab);

        let cart = CartStore::new(
            CartClient::new(session.clone()),
            clock.clone(),
            config.cart_expiry(),
        );
        let orders = ActiveOrderClient::new(durable.clone());
        let bus = OrderSyncBus::new(tab, config.sync_bus_capacity);

        let (actor, lifecycle) = LifecycleActor::new(config.channel_buffer);
        tokio::spawn(actor.run(LifecycleContext {
            config: config.clone(),
            clock: clock.clone(),
            cart: cart.clone(),
            orders: orders.clone(),
            bus: bus.clone(),
            backend,
        }));

        let checkout = CheckoutEngine::new(cart.clone(), config.clone());

        Self {
            config,
            clock,
            session,
            durable,
            cart,
            orders,
            bus,
            lifecycle,
            checkout,
        }
    }

    /// Adds `quantity` units without any fee-split prompt.
    pub async fn add(&self, product: &Product, vendor: &VendorId, quantity: u32) {
        for _ in 0..quantity {
            self.cart
                .add_item(product, vendor, |_| true)
                .await
                .expect("Failed to add item");
        }
    }

    /// Fills a valid delivery checkout for Zindabazar.
    pub fn fill_delivery_details(&mut self) {
        self.checkout
            .set_area("Zindabazar")
            .expect("Zindabazar is a known area");
        self.checkout.set_customer_name("Rahim Uddin");
        self.checkout.set_customer_phone("01711000000");
        self.checkout.set_customer_address("House 12, Road 3");
    }

    /// Cart of 2 × kfc Burger, delivered to Zindabazar, submitted.
    pub async fn submit_scenario_a(&mut self) {
        self.add(&burger(), &kfc(), 2).await;
        self.fill_delivery_details();
        assert!(self.checkout.submit(&self.lifecycle).await, "Submission was blocked");
    }
}
