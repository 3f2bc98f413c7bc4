use crate::model::{Amount, OrderId};
use std::time::Duration;
use tokio::time::Instant;

/// What the lifecycle of one tab is doing, as published to its screens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecycleStatus {
    #[default]
    Idle,
    Pending {
        deadline: Instant,
        vendor_count: usize,
        grand_total: Amount,
    },
    Confirmed {
        order_id: OrderId,
    },
}

impl LifecycleStatus {
    /// Time left in the confirmation window.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            LifecycleStatus::Pending { deadline, .. } => {
                Some(deadline.saturating_duration_since(Instant::now()))
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LifecycleStatus::Pending { .. })
    }

    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            LifecycleStatus::Confirmed { order_id } => Some(*order_id),
            _ => None,
        }
    }
}
