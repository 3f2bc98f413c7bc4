//! Error types for the order lifecycle.

use crate::model::OrderId;
use origin_store::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("An order is already waiting for confirmation")]
    AlreadyPending,

    /// A confirmed order is still being prepared; a new one must wait for it.
    #[error("Order {0} is still in progress")]
    OrderInProgress(OrderId),

    #[error("No order is waiting for confirmation")]
    NothingPending,

    #[error("The order is still in its confirmation window")]
    StillPending,

    #[error("Order storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order lifecycle closed")]
    Closed,

    #[error("Order lifecycle dropped the request")]
    Dropped,
}
