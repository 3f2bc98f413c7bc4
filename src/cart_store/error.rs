//! Error types for the cart.

use crate::model::VendorId;
use origin_store::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    /// A dine-in cart already holds another vendor's items.
    #[error("Dine-in orders take items from one restaurant only: cart has {existing}, tried to add {attempted}")]
    DineInSingleVendorViolation {
        existing: VendorId,
        attempted: VendorId,
    },

    #[error("No {product_name} from {vendor_id} in the cart")]
    UnknownItem {
        vendor_id: VendorId,
        product_name: String,
    },

    /// The cart outlived its ceiling and was discarded.
    #[error("Cart expired after {age_secs}s and was discarded")]
    StaleCartExpired { age_secs: u64 },

    #[error("Cart storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Whether the stored cart exists but could not be decoded.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, CartError::Storage(e) if e.is_read_error())
    }
}
