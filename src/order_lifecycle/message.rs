use crate::model::{CheckoutSubmission, OrderId};
use crate::order_lifecycle::LifecycleError;
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<Result<T, LifecycleError>>;

#[derive(Debug)]
pub enum LifecycleCommand {
    Begin {
        submission: Box<CheckoutSubmission>,
        respond_to: Reply<()>,
    },
    ConfirmNow {
        respond_to: Reply<ConfirmOutcome>,
    },
    Abandon {
        respond_to: Reply<Option<CheckoutSubmission>>,
    },
    MarkReceived {
        respond_to: Reply<bool>,
    },
    Reset {
        respond_to: Reply<bool>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed(OrderId),
    /// The order had already been confirmed; nothing was written.
    AlreadyConfirmed(OrderId),
}

impl ConfirmOutcome {
    pub fn order_id(&self) -> OrderId {
        match self {
            ConfirmOutcome::Confirmed(id) | ConfirmOutcome::AlreadyConfirmed(id) => *id,
        }
    }
}

/// What moved an order out of its confirmation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmTrigger {
    Countdown,
    Customer,
}
