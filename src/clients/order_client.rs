use crate::model::ActiveOrder;
use crate::order_lifecycle::LifecycleError;
use origin_store::{RecordClient, StorageClient, StorageError, StorageScope, StoredRecord};
use tracing::{instrument, warn};

pub const ACTIVE_ORDER_KEY: &str = "activeOrder";

impl StoredRecord for ActiveOrder {
    const KEY: &'static str = ACTIVE_ORDER_KEY;
    const SCOPE: StorageScope = StorageScope::Durable;
}

/// Handle on the origin's single active-order record.
#[derive(Clone)]
pub struct ActiveOrderClient {
    storage: StorageClient,
}

impl ActiveOrderClient {
    pub fn new(storage: StorageClient) -> Self {
        Self { storage }
    }

    /// The active order, or `None` when there is none or it cannot be read.
    ///
    /// Readers never surface a broken record; it reads as "no active order".
    #[instrument(skip(self))]
    pub async fn current(&self) -> Option<ActiveOrder> {
        match self.load().await {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "Active order unreadable, treating as absent");
                None
            }
        }
    }
}

impl RecordClient<ActiveOrder> for ActiveOrderClient {
    type Error = LifecycleError;

    fn storage(&self) -> &StorageClient {
        &self.storage
    }

    fn map_error(e: StorageError) -> Self::Error {
        LifecycleError::Storage(e)
    }
}
