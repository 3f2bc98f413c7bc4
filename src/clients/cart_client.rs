use crate::cart_store::CartError;
use crate::model::CartLineItem;
use origin_store::{RecordClient, StorageClient, StorageError, StorageScope, StoredRecord};
use serde::{Deserialize, Serialize};

pub const CART_KEY: &str = "global_cart_data";

/// The persisted cart: a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartRecord(pub Vec<CartLineItem>);

impl StoredRecord for CartRecord {
    const KEY: &'static str = CART_KEY;
    const SCOPE: StorageScope = StorageScope::Session;
}

#[derive(Clone)]
pub struct CartClient {
    storage: StorageClient,
}

impl CartClient {
    pub fn new(storage: StorageClient) -> Self {
        Self { storage }
    }
}

impl RecordClient<CartRecord> for CartClient {
    type Error = CartError;

    fn storage(&self) -> &StorageClient {
        &self.storage
    }

    fn map_error(e: StorageError) -> Self::Error {
        CartError::Storage(e)
    }
}
