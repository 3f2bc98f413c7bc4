//! The durable record of a confirmed order.
//!
//! Remaining time is never stored; every reader derives it from
//! `start_time_epoch_ms` and the clock, so a reload or a second tab shows the
//! same countdown.
use crate::model::{
    group_by_vendor, Amount, CartLineItem, CheckoutMethod, CheckoutSubmission, CustomerInfo,
    PaymentMethod, TableId, VendorGroup, VendorId,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0.simple())
    }
}

/// Status carried by the stored record.
///
/// A record only exists while the order is confirmed and not yet received,
/// so `Confirmed` is the only value ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    #[default]
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOrder {
    pub order_id: OrderId,
    pub customer_info: CustomerInfo,
    pub cart_items_snapshot: Vec<CartLineItem>,
    pub vendor_groups_snapshot: Vec<VendorGroup>,
    pub grand_total: Amount,
    pub method: CheckoutMethod,
    pub area: Option<String>,
    pub selected_table_id: Option<TableId>,
    pub payment_method: PaymentMethod,
    pub start_time_epoch_ms: u64,
    pub total_delivery_duration_seconds: u64,
    pub security_base_code: u32,
    pub status: OrderStatus,
}

/// The code a vendor asks for at hand-over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSecurityCode {
    pub vendor_id: VendorId,
    pub code: u32,
}

impl ActiveOrder {
    /// Materializes the record for a submission confirmed at `start_time_epoch_ms`.
    pub fn confirm(
        order_id: OrderId,
        submission: CheckoutSubmission,
        start_time_epoch_ms: u64,
        total_delivery_duration_seconds: u64,
        security_base_code: u32,
    ) -> Self {
        let CheckoutSubmission {
            draft,
            items,
            groups,
            fees,
        } = submission;

        Self {
            order_id,
            customer_info: draft.customer,
            cart_items_snapshot: items,
            vendor_groups_snapshot: groups,
            grand_total: fees.grand_total,
            method: draft.method,
            area: draft.area,
            selected_table_id: draft.selected_table_id,
            payment_method: draft.payment_method,
            start_time_epoch_ms,
            total_delivery_duration_seconds,
            security_base_code,
            status: OrderStatus::Confirmed,
        }
    }

    /// Vendor groups re-derived from the item snapshot.
    pub fn vendor_groups(&self) -> Vec<VendorGroup> {
        group_by_vendor(&self.cart_items_snapshot)
    }

    /// `base + i` for the i-th vendor in first-seen order.
    pub fn vendor_security_codes(&self) -> Vec<VendorSecurityCode> {
        security_codes(self.security_base_code, &self.vendor_groups())
    }

    /// Seconds left at `now_epoch_ms`, never below zero.
    ///
    /// A clock reading earlier than the start (another tab's clock, or a
    /// read racing the write) counts as no time elapsed.
    pub fn remaining_seconds(&self, now_epoch_ms: u64) -> u64 {
        let elapsed = now_epoch_ms.saturating_sub(self.start_time_epoch_ms) / 1000;
        self.total_delivery_duration_seconds.saturating_sub(elapsed)
    }

    pub fn is_ready(&self, now_epoch_ms: u64) -> bool {
        self.remaining_seconds(now_epoch_ms) == 0
    }
}

pub fn security_codes(base: u32, groups: &[VendorGroup]) -> Vec<VendorSecurityCode> {
    groups
        .iter()
        .zip(0u32..)
        .map(|(group, index)| VendorSecurityCode {
            vendor_id: group.vendor_id.clone(),
            code: base.saturating_add(index),
        })
        .collect()
}
