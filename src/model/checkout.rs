use crate::model::{Amount, CartLineItem, TableId, VendorGroup, VendorId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutMethod {
    #[default]
    Delivery,
    Pickup,
    DineIn,
}

impl Display for CheckoutMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckoutMethod::Delivery => write!(f, "delivery"),
            CheckoutMethod::Pickup => write!(f, "pickup"),
            CheckoutMethod::DineIn => write!(f, "dine-in"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    MobileWallet,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::MobileWallet => write!(f, "mobile_wallet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// What the checkout panel has collected so far.
///
/// Lives only inside a [`CheckoutEngine`](crate::checkout::CheckoutEngine)
/// and, once submitted, inside the frozen [`CheckoutSubmission`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckoutDraft {
    pub method: CheckoutMethod,
    pub area: Option<String>,
    pub customer: CustomerInfo,
    pub selected_table_id: Option<TableId>,
    pub payment_method: PaymentMethod,
}

impl CheckoutDraft {
    pub fn with_method(method: CheckoutMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }
}

/// The extra charge attributed to one vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorFee {
    pub vendor_id: VendorId,
    pub fee: Amount,
}

/// Subtotal, extra charge and grand total of a cart under a checkout method.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub subtotal: Amount,
    pub extra_charge: Amount,
    pub grand_total: Amount,
    pub vendor_fees: Vec<VendorFee>,
}

impl FeeBreakdown {
    pub fn fee_for(&self, vendor_id: &VendorId) -> Amount {
        self.vendor_fees
            .iter()
            .find(|line| line.vendor_id == *vendor_id)
            .map(|line| line.fee)
            .unwrap_or(0)
    }
}

/// A validated checkout, frozen at the moment of submission.
///
/// Handed from the checkout panel to the order lifecycle, and handed back
/// untouched if the customer abandons the confirmation window to amend it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSubmission {
    pub draft: CheckoutDraft,
    pub items: Vec<CartLineItem>,
    pub groups: Vec<VendorGroup>,
    pub fees: FeeBreakdown,
}

impl CheckoutSubmission {
    pub fn vendor_count(&self) -> usize {
        self.groups.len()
    }
}
