use crate::model::{Amount, VendorId};
use serde::{Deserialize, Serialize};

/// One product line in the cart.
///
/// Identity is `(vendor_id, product_name)`: the same product name sold by two
/// vendors is two lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub vendor_id: VendorId,
    pub product_name: String,
    pub unit_price: Amount,
    pub quantity: u32,
    pub added_at_epoch_ms: u64,
}

impl CartLineItem {
    /// Saturates rather than overflowing on absurd prices.
    pub fn line_total(&self) -> Amount {
        self.unit_price.saturating_mul(Amount::from(self.quantity))
    }

    pub fn is_line(&self, vendor_id: &VendorId, product_name: &str) -> bool {
        self.vendor_id == *vendor_id && self.product_name == product_name
    }
}

/// A catalog product as the storefront pages offer it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub price: Amount,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Amount) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}
