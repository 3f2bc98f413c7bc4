//! # Checkout Engine
//!
//! The checkout panel's state for one tab: the draft being filled in, the
//! table picker's facets, and the rules deciding whether the draft can become
//! an order.
//!
//! ## Gating
//!
//! | Method | Required besides name, phone and a non-empty cart |
//! |--------|----------------------------------------------------|
//! | Delivery | known area, address |
//! | Pickup | nothing |
//! | Dine-in | a table, and items from exactly one vendor |
//!
//! [`CheckoutEngine::submit`] freezes the draft, the cart lines and the fee
//! breakdown into a [`CheckoutSubmission`] and hands it to the
//! [`OrderLifecycle`]; the engine then starts a fresh draft. A blocked
//! submission changes nothing.

pub mod error;
pub mod fees;
pub mod tables;

pub use error::{CheckoutError, MissingField};
pub use fees::compute_fees;

use crate::cart_store::CartStore;
use crate::config::EngineConfig;
use crate::model::{
    group_by_vendor, CheckoutDraft, CheckoutMethod, CheckoutSubmission, DiningTable, FeeBreakdown,
    PartySize, PartyType, PaymentMethod, TableFilter, TableId, VendorGroup, VendorId,
};
use crate::order_lifecycle::OrderLifecycle;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Vendor groups and fees for the current cart under the current draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub groups: Vec<VendorGroup>,
    pub fees: FeeBreakdown,
}

pub struct CheckoutEngine {
    cart: CartStore,
    config: Arc<EngineConfig>,
    draft: CheckoutDraft,
    table_filter: TableFilter,
}

impl CheckoutEngine {
    pub fn new(cart: CartStore, config: Arc<EngineConfig>) -> Self {
        let draft = CheckoutDraft::with_method(cart.prevailing_method());
        Self {
            cart,
            config,
            draft,
            table_filter: TableFilter::default(),
        }
    }

    pub fn draft(&self) -> &CheckoutDraft {
        &self.draft
    }

    pub fn table_filter(&self) -> TableFilter {
        self.table_filter
    }

    /// Switches the checkout method.
    ///
    /// The switch always happens. Switching a multi-vendor cart to dine-in
    /// reports the violation so the panel can offer to remove vendors.
    #[instrument(skip(self))]
    pub async fn set_method(&mut self, method: CheckoutMethod) -> Result<(), CheckoutError> {
        self.draft.method = method;
        self.cart.set_prevailing_method(method);

        if method != CheckoutMethod::DineIn {
            if let Some(table) = self.draft.selected_table_id.take() {
                debug!(%table, "Table released on leaving dine-in");
            }
            return Ok(());
        }

        let groups = self.cart.vendor_groups().await?;
        check_single_vendor(method, &groups)
    }

    pub fn set_area(&mut self, area: &str) -> Result<(), CheckoutError> {
        if self.config.area_charge(area).is_none() {
            return Err(CheckoutError::UnknownArea(area.to_string()));
        }
        self.draft.area = Some(area.to_string());
        Ok(())
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.draft.customer.name = name.into();
    }

    pub fn set_customer_phone(&mut self, phone: impl Into<String>) {
        self.draft.customer.phone = phone.into();
    }

    pub fn set_customer_address(&mut self, address: impl Into<String>) {
        self.draft.customer.address = address.into();
    }

    pub fn set_payment_method(&mut self, payment_method: PaymentMethod) {
        self.draft.payment_method = payment_method;
    }

    /// First table facet. Couples need no size bucket.
    pub fn choose_party_type(&mut self, party: PartyType) {
        self.table_filter.party = Some(party);
        if party == PartyType::Couple {
            self.table_filter.size = None;
        }
        self.release_incompatible_table();
    }

    /// Second table facet, for family parties.
    pub fn choose_party_size(&mut self, size: PartySize) {
        self.table_filter.size = Some(size);
        self.release_incompatible_table();
    }

    pub fn available_tables(&self) -> Vec<&DiningTable> {
        tables::selectable(&self.table_filter, &self.config.tables)
    }

    pub fn select_table(&mut self, table_id: &TableId) -> Result<(), CheckoutError> {
        if self.draft.method != CheckoutMethod::DineIn {
            return Err(CheckoutError::TableRequiresDineIn);
        }
        if !self.available_tables().iter().any(|t| t.id == *table_id) {
            return Err(CheckoutError::TableUnavailable(table_id.clone()));
        }
        self.draft.selected_table_id = Some(table_id.clone());
        Ok(())
    }

    /// Remediation for a dine-in cart holding several vendors.
    pub async fn remove_vendor(&self, vendor_id: &VendorId) -> Result<usize, CheckoutError> {
        Ok(self.cart.remove_vendor(vendor_id).await?)
    }

    pub fn fees(&self, groups: &[VendorGroup]) -> FeeBreakdown {
        compute_fees(
            self.draft.method,
            self.draft.area.as_deref(),
            groups,
            &self.config,
        )
    }

    pub async fn summary(&self) -> Result<CheckoutSummary, CheckoutError> {
        let groups = self.cart.vendor_groups().await?;
        let fees = self.fees(&groups);
        Ok(CheckoutSummary { groups, fees })
    }

    /// Checks the draft against `groups`.
    ///
    /// A dine-in vendor violation is reported before any missing field.
    pub fn validate(&self, groups: &[VendorGroup]) -> Result<(), CheckoutError> {
        check_single_vendor(self.draft.method, groups)?;

        let draft = &self.draft;
        let mut missing = Vec::new();
        if groups.is_empty() {
            missing.push(MissingField::CartItems);
        }
        if draft.customer.name.trim().is_empty() {
            missing.push(MissingField::CustomerName);
        }
        if draft.customer.phone.trim().is_empty() {
            missing.push(MissingField::CustomerPhone);
        }
        match draft.method {
            CheckoutMethod::Delivery => {
                if draft.area.is_none() {
                    missing.push(MissingField::Area);
                }
                if draft.customer.address.trim().is_empty() {
                    missing.push(MissingField::Address);
                }
            }
            CheckoutMethod::DineIn => {
                if draft.selected_table_id.is_none() {
                    missing.push(MissingField::Table);
                }
            }
            CheckoutMethod::Pickup => {}
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::Validation(missing))
        }
    }

    pub async fn can_submit(&self) -> bool {
        match self.cart.vendor_groups().await {
            Ok(groups) => self.validate(&groups).is_ok(),
            Err(e) => {
                warn!(error = %e, "Cart unavailable for gating");
                false
            }
        }
    }

    /// Hands the frozen checkout to `lifecycle`, returning whether it went.
    ///
    /// On success the draft starts over; on any failure it is left as it was.
    #[instrument(skip(self, lifecycle))]
    pub async fn submit(&mut self, lifecycle: &OrderLifecycle) -> bool {
        let items = match self.cart.items().await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Cart unavailable for submission");
                return false;
            }
        };
        let groups = group_by_vendor(&items);

        if let Err(e) = self.validate(&groups) {
            info!(error = %e, "Submission blocked");
            return false;
        }

        let fees = self.fees(&groups);
        let submission = CheckoutSubmission {
            draft: self.draft.clone(),
            items,
            groups,
            fees,
        };

        match lifecycle.begin(submission).await {
            Ok(()) => {
                info!(method = %self.draft.method, "Checkout submitted");
                self.draft = CheckoutDraft::with_method(self.draft.method);
                self.table_filter = TableFilter::default();
                true
            }
            Err(e) => {
                warn!(error = %e, "Order lifecycle refused the submission");
                false
            }
        }
    }

    /// Puts an abandoned submission's draft back for amending.
    pub fn restore(&mut self, submission: CheckoutSubmission) {
        self.cart.set_prevailing_method(submission.draft.method);
        self.draft = submission.draft;
    }

    fn release_incompatible_table(&mut self) {
        let Some(selected) = self.draft.selected_table_id.clone() else {
            return;
        };
        let still_fits = self
            .config
            .table(&selected)
            .is_some_and(|table| self.table_filter.matches(table));
        if !still_fits {
            debug!(table = %selected, "Table released after facet change");
            self.draft.selected_table_id = None;
        }
    }
}

fn check_single_vendor(method: CheckoutMethod, groups: &[VendorGroup]) -> Result<(), CheckoutError> {
    if method == CheckoutMethod::DineIn && groups.len() > 1 {
        return Err(CheckoutError::InvariantViolation {
            vendor_ids: groups.iter().map(|g| g.vendor_id.clone()).collect(),
        });
    }
    Ok(())
}
