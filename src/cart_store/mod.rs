//! # Cart Store
//!
//! The in-progress cart of the origin, persisted as a JSON line array under
//! `global_cart_data` in the session store. Every mutation is a read of the
//! stored cart, a rule applied by [`CartLines`], and a write of the whole
//! cart; two tabs mutating at once resolve last-write-wins.
//!
//! ## Vendor policy
//!
//! ```text
//! add_item(product, vendor)
//!   ├─ cart empty or vendor already present  → upsert
//!   ├─ method is dine-in                     → DineInSingleVendorViolation
//!   └─ otherwise                             → confirm(FeeSplitWarning)
//!                                                 ├─ true  → upsert
//!                                                 └─ false → Cancelled
//! ```
//!
//! The prevailing checkout method is shared by every clone of a store, so
//! the checkout panel and the product pages of one tab agree on it.

pub mod error;
pub mod lines;

pub use error::CartError;
pub use lines::CartLines;

use crate::clients::{CartClient, CartRecord};
use crate::clock::SharedClock;
use crate::model::{group_by_vendor, CartLineItem, CheckoutMethod, Product, VendorGroup, VendorId};
use origin_store::RecordClient;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Shown before a second vendor joins a non-dine-in cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSplitWarning {
    pub existing_vendors: Vec<VendorId>,
    pub new_vendor: VendorId,
}

impl FeeSplitWarning {
    pub fn vendor_count_after(&self) -> usize {
        self.existing_vendors.len() + 1
    }
}

impl Display for FeeSplitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Adding {} makes this a {}-restaurant order; each restaurant is billed its own delivery or packaging charge.",
            self.new_vendor,
            self.vendor_count_after()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The line as it stands after the add.
    Added(CartLineItem),
    /// The customer declined the fee-split warning.
    Cancelled,
}

#[derive(Clone)]
pub struct CartStore {
    client: CartClient,
    clock: SharedClock,
    expiry: Duration,
    method: Arc<watch::Sender<CheckoutMethod>>,
}

impl CartStore {
    pub fn new(client: CartClient, clock: SharedClock, expiry: Duration) -> Self {
        let (method, _) = watch::channel(CheckoutMethod::default());
        Self {
            client,
            clock,
            expiry,
            method: Arc::new(method),
        }
    }

    pub fn prevailing_method(&self) -> CheckoutMethod {
        *self.method.borrow()
    }

    pub fn set_prevailing_method(&self, method: CheckoutMethod) {
        let previous = self.method.send_replace(method);
        if previous != method {
            debug!(%previous, %method, "Prevailing method changed");
        }
    }

    /// Follows the prevailing method as other components change it.
    pub fn watch_method(&self) -> watch::Receiver<CheckoutMethod> {
        self.method.subscribe()
    }

    /// The current lines; an unreadable record reads as an empty cart.
    pub async fn items(&self) -> Result<Vec<CartLineItem>, CartError> {
        Ok(self.load_lines().await?.into_items())
    }

    pub async fn vendor_groups(&self) -> Result<Vec<VendorGroup>, CartError> {
        Ok(group_by_vendor(self.load_lines().await?.items()))
    }

    #[instrument(skip(self, product, confirm), fields(product = %product.name))]
    pub async fn add_item<F>(
        &self,
        product: &Product,
        vendor_id: &VendorId,
        confirm: F,
    ) -> Result<AddOutcome, CartError>
    where
        F: FnOnce(&FeeSplitWarning) -> bool + Send,
    {
        let mut lines = self.load_lines().await?;

        if !lines.is_empty() && !lines.contains_vendor(vendor_id) {
            let existing_vendors = lines.vendor_ids();

            if self.prevailing_method() == CheckoutMethod::DineIn {
                let existing = existing_vendors
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| vendor_id.clone());
                warn!(%existing, attempted = %vendor_id, "Dine-in cart refused a second vendor");
                return Err(CartError::DineInSingleVendorViolation {
                    existing,
                    attempted: vendor_id.clone(),
                });
            }

            let warning = FeeSplitWarning {
                existing_vendors,
                new_vendor: vendor_id.clone(),
            };
            if !confirm(&warning) {
                info!(vendors = warning.vendor_count_after(), "Fee split declined");
                return Ok(AddOutcome::Cancelled);
            }
        }

        let line = lines.upsert(product, vendor_id, self.clock.now_epoch_ms());
        self.persist(lines).await?;
        info!(quantity = line.quantity, "Added to cart");
        Ok(AddOutcome::Added(line))
    }

    /// Adjusts a line by `delta`; the line goes away at zero.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        product_name: &str,
        vendor_id: &VendorId,
        delta: i32,
    ) -> Result<u32, CartError> {
        let mut lines = self.load_lines().await?;
        let quantity = lines
            .adjust(vendor_id, product_name, i64::from(delta))
            .ok_or_else(|| CartError::UnknownItem {
                vendor_id: vendor_id.clone(),
                product_name: product_name.to_string(),
            })?;

        self.persist(lines).await?;
        debug!(quantity, "Quantity updated");
        Ok(quantity)
    }

    /// Drops all of one vendor's lines, returning how many were removed.
    #[instrument(skip(self))]
    pub async fn remove_vendor(&self, vendor_id: &VendorId) -> Result<usize, CartError> {
        let mut lines = self.load_lines().await?;
        let removed = lines.remove_vendor(vendor_id);
        if removed > 0 {
            self.persist(lines).await?;
            info!(removed, "Vendor removed from cart");
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        let existed = self.client.delete().await?;
        info!(existed, "Cart cleared");
        Ok(())
    }

    /// Discards the cart once its oldest line is older than the expiry.
    ///
    /// Run on every route change. Returns `StaleCartExpired` after discarding
    /// so the caller reloads whatever showed the old cart.
    #[instrument(skip(self))]
    pub async fn enforce_expiry(&self) -> Result<(), CartError> {
        let lines = self.load_lines().await?;
        let Some(first_added_at) = lines.first_added_at() else {
            return Ok(());
        };

        let age_ms = self.clock.now_epoch_ms().saturating_sub(first_added_at);
        if u128::from(age_ms) <= self.expiry.as_millis() {
            return Ok(());
        }

        self.client.delete().await?;
        let age_secs = age_ms / 1000;
        warn!(age_secs, lines = lines.len(), "Stale cart discarded");
        Err(CartError::StaleCartExpired { age_secs })
    }

    async fn load_lines(&self) -> Result<CartLines, CartError> {
        match self.client.load().await {
            Ok(record) => Ok(CartLines::from_items(record.unwrap_or_default().0)),
            Err(e) if e.is_unreadable() => {
                warn!(error = %e, "Stored cart unreadable, starting empty");
                Ok(CartLines::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn persist(&self, lines: CartLines) -> Result<(), CartError> {
        self.client.save(&CartRecord(lines.into_items())).await
    }
}
