use crate::clients::{LoggingBackend, OrderBackend};
use crate::clock::{SharedClock, SystemClock};
use crate::config::EngineConfig;
use crate::runtime::StorefrontTab;
use origin_store::{StorageActor, StorageClient, StorageScope, TabId};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// One browser origin: its two stores and the tabs opened on it.
pub struct Storefront {
    config: Arc<EngineConfig>,
    clock: SharedClock,
    backend: Arc<dyn OrderBackend>,
    session: StorageClient,
    durable: StorageClient,
    next_tab: AtomicU32,
    handles: Vec<JoinHandle<()>>,
}

impl Storefront {
    /// Starts both stores with the wall clock and the logging backend.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_parts(config, Arc::new(SystemClock), Arc::new(LoggingBackend))
    }

    pub fn with_parts(
        config: EngineConfig,
        clock: SharedClock,
        backend: Arc<dyn OrderBackend>,
    ) -> Self {
        let (session_actor, session) =
            StorageActor::new(StorageScope::Session, config.channel_buffer);
        let (durable_actor, durable) =
            StorageActor::new(StorageScope::Durable, config.channel_buffer);
        let handles = vec![
            tokio::spawn(session_actor.run()),
            tokio::spawn(durable_actor.run()),
        ];

        let mut storefront = Self::with_stores(config, clock, backend, session, durable);
        storefront.handles = handles;
        storefront
    }

    /// Wires the engine onto stores started elsewhere, such as mocks.
    pub fn with_stores(
        config: EngineConfig,
        clock: SharedClock,
        backend: Arc<dyn OrderBackend>,
        session: StorageClient,
        durable: StorageClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            clock,
            backend,
            session,
            durable,
            next_tab: AtomicU32::new(1),
            handles: Vec::new(),
        }
    }

    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    pub fn durable_store(&self) -> &StorageClient {
        &self.durable
    }

    pub fn session_store(&self) -> &StorageClient {
        &self.session
    }

    /// Opens a tab; its components start immediately.
    pub fn open_tab(&self) -> StorefrontTab {
        let tab = TabId(self.next_tab.fetch_add(1, Ordering::SeqCst));
        info!(%tab, "Tab opened");
        StorefrontTab::open(
            tab,
            self.config.clone(),
            self.clock.clone(),
            self.backend.clone(),
            self.session.for_tab(tab),
            self.durable.for_tab(tab),
        )
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down storefront...");

        drop(self.session);
        drop(self.durable);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}
