//! Error types for checkout.

use crate::cart_store::CartError;
use crate::model::{TableId, VendorId};
use std::fmt::Display;
use thiserror::Error;

/// A checkout field that still needs a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    CartItems,
    CustomerName,
    CustomerPhone,
    Area,
    Address,
    Table,
}

impl Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MissingField::CartItems => "cart items",
            MissingField::CustomerName => "name",
            MissingField::CustomerPhone => "phone",
            MissingField::Area => "delivery area",
            MissingField::Address => "address",
            MissingField::Table => "table",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Missing required checkout fields: {}", join(.0))]
    Validation(Vec<MissingField>),

    /// Dine-in with more than one vendor; remove all but one to continue.
    #[error("Dine-in orders take items from one restaurant only, remove all but one of: {}", join(.vendor_ids))]
    InvariantViolation { vendor_ids: Vec<VendorId> },

    #[error("We do not deliver to {0}")]
    UnknownArea(String),

    #[error("Table {0} does not exist or does not fit the chosen party")]
    TableUnavailable(TableId),

    #[error("Tables can only be chosen for dine-in orders")]
    TableRequiresDineIn,

    #[error(transparent)]
    Cart(#[from] CartError),
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
