//! # Order Backend
//!
//! The server side of an order is outside the engine: a confirmed order is
//! reported once per vendor through [`OrderBackend`] and the engine never waits
//! on, retries, or reconciles the answer. The confirmed record in the durable
//! store stays the source of truth for every screen.
use crate::model::{ActiveOrder, Amount, VendorId};
use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Order rejected: {0}")]
    Rejected(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Payload could not be encoded: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendCustomer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendItem {
    pub name: String,
    pub price: Amount,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendBilling {
    pub subtotal: Amount,
    pub extra_charge: Amount,
    pub total: Amount,
    pub order_type: String,
    pub area: Option<String>,
    pub table_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendPayment {
    pub method: String,
}

/// What the order endpoint receives for one vendor's share of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendOrderPayload {
    pub order_ref: String,
    pub customer: BackendCustomer,
    pub items: Vec<BackendItem>,
    pub billing: BackendBilling,
    pub payment: BackendPayment,
    /// Recurring-meal plan; the storefront never enrolls one.
    pub subscription: Option<String>,
    pub restaurant_id: VendorId,
}

impl BackendOrderPayload {
    /// One payload per vendor group, each billed with that vendor's fee.
    pub fn for_order(order: &ActiveOrder, vendor_fees: &[(VendorId, Amount)]) -> Vec<Self> {
        order
            .vendor_groups()
            .into_iter()
            .map(|group| {
                let extra_charge = vendor_fees
                    .iter()
                    .find(|(vendor, _)| *vendor == group.vendor_id)
                    .map(|(_, fee)| *fee)
                    .unwrap_or(0);

                Self {
                    order_ref: order.order_id.to_string(),
                    customer: BackendCustomer {
                        name: order.customer_info.name.clone(),
                        phone: order.customer_info.phone.clone(),
                        address: order.customer_info.address.clone(),
                    },
                    items: group
                        .items
                        .iter()
                        .map(|item| BackendItem {
                            name: item.product_name.clone(),
                            price: item.unit_price,
                            quantity: item.quantity,
                        })
                        .collect(),
                    billing: BackendBilling {
                        subtotal: group.subtotal,
                        extra_charge,
                        total: group.subtotal.saturating_add(extra_charge),
                        order_type: order.method.to_string(),
                        area: order.area.clone(),
                        table_id: order.selected_table_id.as_ref().map(|t| t.to_string()),
                    },
                    payment: BackendPayment {
                        method: order.payment_method.to_string(),
                    },
                    subscription: None,
                    restaurant_id: group.vendor_id,
                }
            })
            .collect()
    }
}

#[automock]
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Submits one vendor's order, returning the backend's order identifier.
    async fn submit_order(&self, payload: BackendOrderPayload) -> Result<String, BackendError>;
}

/// Logs the payload instead of sending it anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingBackend;

#[async_trait]
impl OrderBackend for LoggingBackend {
    async fn submit_order(&self, payload: BackendOrderPayload) -> Result<String, BackendError> {
        let body =
            serde_json::to_string(&payload).map_err(|e| BackendError::Encode(e.to_string()))?;
        debug!(%body, "Order payload");
        info!(
            order_ref = %payload.order_ref,
            restaurant_id = %payload.restaurant_id,
            total = payload.billing.total,
            "Order reported"
        );
        Ok(format!("{}-{}", payload.order_ref, payload.restaurant_id))
    }
}
