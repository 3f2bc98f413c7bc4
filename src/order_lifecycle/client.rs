use crate::model::CheckoutSubmission;
use crate::order_lifecycle::message::{ConfirmOutcome, LifecycleCommand};
use crate::order_lifecycle::{LifecycleError, LifecycleStatus};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::instrument;

/// Cloneable handle on a tab's [`LifecycleActor`](super::LifecycleActor).
#[derive(Clone)]
pub struct OrderLifecycle {
    sender: mpsc::Sender<LifecycleCommand>,
    status: watch::Receiver<LifecycleStatus>,
}

impl OrderLifecycle {
    pub fn new(
        sender: mpsc::Sender<LifecycleCommand>,
        status: watch::Receiver<LifecycleStatus>,
    ) -> Self {
        Self { sender, status }
    }

    /// Starts the confirmation window for `submission`.
    #[instrument(skip(self, submission))]
    pub async fn begin(&self, submission: CheckoutSubmission) -> Result<(), LifecycleError> {
        let (respond_to, response) = oneshot::channel();
        self.send(LifecycleCommand::Begin {
            submission: Box::new(submission),
            respond_to,
        })
        .await?;
        response.await.map_err(|_| LifecycleError::Dropped)?
    }

    /// Confirms the pending order without waiting for the countdown.
    #[instrument(skip(self))]
    pub async fn confirm_now(&self) -> Result<ConfirmOutcome, LifecycleError> {
        let (respond_to, response) = oneshot::channel();
        self.send(LifecycleCommand::ConfirmNow { respond_to }).await?;
        response.await.map_err(|_| LifecycleError::Dropped)?
    }

    /// Leaves the confirmation window, handing the submission back for amending.
    #[instrument(skip(self))]
    pub async fn abandon(&self) -> Result<Option<CheckoutSubmission>, LifecycleError> {
        let (respond_to, response) = oneshot::channel();
        self.send(LifecycleCommand::Abandon { respond_to }).await?;
        response.await.map_err(|_| LifecycleError::Dropped)?
    }

    /// Completes the active order, whichever tab confirmed it.
    ///
    /// While this tab's own order is still pending, only an order confirmed by
    /// another tab can be completed; with none stored this is `StillPending`.
    #[instrument(skip(self))]
    pub async fn mark_received(&self) -> Result<bool, LifecycleError> {
        let (respond_to, response) = oneshot::channel();
        self.send(LifecycleCommand::MarkReceived { respond_to }).await?;
        response.await.map_err(|_| LifecycleError::Dropped)?
    }

    /// Drops anything pending and deletes the active order.
    ///
    /// Returns whether an active order was deleted.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<bool, LifecycleError> {
        let (respond_to, response) = oneshot::channel();
        self.send(LifecycleCommand::Reset { respond_to }).await?;
        response.await.map_err(|_| LifecycleError::Dropped)?
    }

    pub fn status(&self) -> LifecycleStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleStatus> {
        self.status.clone()
    }

    async fn send(&self, command: LifecycleCommand) -> Result<(), LifecycleError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| LifecycleError::Closed)
    }
}
