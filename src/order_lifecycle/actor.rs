use crate::cart_store::CartStore;
use crate::clients::{ActiveOrderClient, BackendOrderPayload, OrderBackend};
use crate::clock::SharedClock;
use crate::config::EngineConfig;
use crate::model::{ActiveOrder, Amount, CheckoutSubmission, OrderId, VendorId};
use crate::order_lifecycle::message::{ConfirmOutcome, ConfirmTrigger, LifecycleCommand};
use crate::order_lifecycle::security::draw_base_code;
use crate::order_lifecycle::{LifecycleError, LifecycleStatus, OrderLifecycle};
use crate::sync_bus::{ForeignOrderWrites, OrderSyncBus};
use origin_store::RecordClient;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Everything the lifecycle reaches outside itself, bound when it starts.
#[derive(Clone)]
pub struct LifecycleContext {
    pub config: Arc<EngineConfig>,
    pub clock: SharedClock,
    pub cart: CartStore,
    pub orders: ActiveOrderClient,
    pub bus: OrderSyncBus,
    pub backend: Arc<dyn OrderBackend>,
}

enum State {
    Idle,
    Pending {
        submission: Box<CheckoutSubmission>,
        deadline: Instant,
    },
    Confirmed {
        order_id: OrderId,
    },
}

/// The order state machine of one tab.
///
/// Commands are handled one at a time; while an order is pending the loop
/// also waits on its deadline, and whichever comes first wins. A customer's
/// early confirmation and the countdown can therefore never both confirm.
///
/// Outside the confirmation window the state follows the stored record: a
/// write by another tab is re-read, so an order received or replaced there
/// is reflected here too.
pub struct LifecycleActor {
    receiver: mpsc::Receiver<LifecycleCommand>,
    status: watch::Sender<LifecycleStatus>,
    state: State,
}

impl LifecycleActor {
    pub fn new(buffer_size: usize) -> (Self, OrderLifecycle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (status, status_receiver) = watch::channel(LifecycleStatus::Idle);
        let actor = Self {
            receiver,
            status,
            state: State::Idle,
        };
        (actor, OrderLifecycle::new(sender, status_receiver))
    }

    pub async fn run(mut self, ctx: LifecycleContext) {
        info!("Order lifecycle started");

        if let Some(order) = ctx.orders.current().await {
            info!(order_id = %order.order_id, "Adopted stored active order");
            self.set_state(State::Confirmed {
                order_id: order.order_id,
            });
        }

        let mut foreign = ForeignOrderWrites::new(ctx.orders.storage());

        loop {
            let deadline = match &self.state {
                State::Pending { deadline, .. } => Some(*deadline),
                _ => None,
            };

            tokio::select! {
                command = self.receiver.recv() => match command {
                    Some(command) => self.handle(command, &ctx).await,
                    None => break,
                },
                _ = wait_until(deadline) => {
                    if let Err(e) = self.confirm(ConfirmTrigger::Countdown, &ctx).await {
                        warn!(error = %e, "Countdown confirmation failed");
                    }
                }
                _ = foreign.next() => self.reconcile(&ctx).await,
            }
        }

        if matches!(self.state, State::Pending { .. }) {
            warn!("Shutdown with an unconfirmed order, abandoning it");
        }
        info!("Order lifecycle shutdown");
    }

    async fn handle(&mut self, command: LifecycleCommand, ctx: &LifecycleContext) {
        match command {
            LifecycleCommand::Begin {
                submission,
                respond_to,
            } => {
                let _ = respond_to.send(self.begin(submission, ctx).await);
            }
            LifecycleCommand::ConfirmNow { respond_to } => {
                let _ = respond_to.send(self.confirm(ConfirmTrigger::Customer, ctx).await);
            }
            LifecycleCommand::Abandon { respond_to } => {
                let _ = respond_to.send(Ok(self.abandon()));
            }
            LifecycleCommand::MarkReceived { respond_to } => {
                let _ = respond_to.send(self.mark_received(ctx).await);
            }
            LifecycleCommand::Reset { respond_to } => {
                let _ = respond_to.send(self.reset(ctx).await);
            }
        }
    }

    async fn begin(
        &mut self,
        submission: Box<CheckoutSubmission>,
        ctx: &LifecycleContext,
    ) -> Result<(), LifecycleError> {
        if matches!(self.state, State::Pending { .. }) {
            return Err(LifecycleError::AlreadyPending);
        }

        // The record, not local state, decides: another tab may have
        // confirmed or received an order since this one last looked.
        match ctx.orders.current().await {
            Some(order) => {
                self.set_state(State::Confirmed {
                    order_id: order.order_id,
                });
                return Err(LifecycleError::OrderInProgress(order.order_id));
            }
            None => self.set_state(State::Idle),
        }

        let window = ctx.config.confirmation_window();
        info!(
            order_vendors = submission.vendor_count(),
            grand_total = submission.fees.grand_total,
            window_secs = window.as_secs(),
            "Order pending"
        );
        self.set_state(State::Pending {
            submission,
            deadline: Instant::now() + window,
        });
        Ok(())
    }

    fn abandon(&mut self) -> Option<CheckoutSubmission> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Pending { submission, .. } => {
                info!("Order abandoned");
                self.publish();
                Some(*submission)
            }
            other => {
                self.state = other;
                debug!("Abandon with nothing pending");
                None
            }
        }
    }

    async fn confirm(
        &mut self,
        trigger: ConfirmTrigger,
        ctx: &LifecycleContext,
    ) -> Result<ConfirmOutcome, LifecycleError> {
        let submission = match std::mem::replace(&mut self.state, State::Idle) {
            State::Pending { submission, .. } => submission,
            State::Confirmed { order_id } => {
                self.state = State::Confirmed { order_id };
                debug!(%order_id, "Already confirmed");
                return Ok(ConfirmOutcome::AlreadyConfirmed(order_id));
            }
            State::Idle => return Err(LifecycleError::NothingPending),
        };

        let vendor_fees: Vec<(VendorId, Amount)> = submission
            .fees
            .vendor_fees
            .iter()
            .map(|line| (line.vendor_id.clone(), line.fee))
            .collect();
        let base_code = draw_base_code(&mut rand::thread_rng(), ctx.config.security_code_range());
        let duration_secs = ctx.config.delivery_duration_secs(submission.draft.method);
        let order = ActiveOrder::confirm(
            OrderId::new(),
            *submission,
            ctx.clock.now_epoch_ms(),
            duration_secs,
            base_code,
        );
        let order_id = order.order_id;

        if let Some(existing) = ctx.orders.current().await {
            warn!(replaced = %existing.order_id, %order_id, "Another tab confirmed an order meanwhile, replacing it");
        }
        if let Err(e) = ctx.orders.save(&order).await {
            warn!(%order_id, error = %e, "Active order write failed");
        }
        if let Err(e) = ctx.cart.clear().await {
            warn!(%order_id, error = %e, "Cart clear after confirmation failed");
        }
        ctx.bus.announce();

        info!(%order_id, ?trigger, method = %order.method, duration_secs, "Order confirmed");
        self.set_state(State::Confirmed { order_id });

        let payloads = BackendOrderPayload::for_order(&order, &vendor_fees);
        tokio::spawn(report(ctx.backend.clone(), payloads));

        Ok(ConfirmOutcome::Confirmed(order_id))
    }

    async fn mark_received(&mut self, ctx: &LifecycleContext) -> Result<bool, LifecycleError> {
        if matches!(self.state, State::Pending { .. }) {
            // A stored order can only be another tab's while this one is pending.
            let Some(order) = ctx.orders.current().await else {
                return Err(LifecycleError::StillPending);
            };
            let existed = ctx.orders.delete().await?;
            ctx.bus.announce();
            info!(order_id = %order.order_id, existed, "Other tab's order received, own order still pending");
            return Ok(existed);
        }

        let existed = ctx.orders.delete().await?;
        ctx.bus.announce();
        info!(existed, "Order received");
        self.set_state(State::Idle);
        Ok(existed)
    }

    /// Abandons anything pending and deletes the active order.
    async fn reset(&mut self, ctx: &LifecycleContext) -> Result<bool, LifecycleError> {
        if let Some(submission) = self.abandon() {
            info!(vendors = submission.vendor_count(), "Pending order dropped by reset");
        }
        let existed = ctx.orders.delete().await?;
        ctx.bus.announce();
        self.set_state(State::Idle);
        Ok(existed)
    }

    /// Brings a settled state in line with the stored record.
    async fn reconcile(&mut self, ctx: &LifecycleContext) {
        if matches!(self.state, State::Pending { .. }) {
            return;
        }
        let held = match &self.state {
            State::Confirmed { order_id } => Some(*order_id),
            _ => None,
        };
        let stored = ctx.orders.current().await.map(|order| order.order_id);
        if stored == held {
            return;
        }

        match stored {
            Some(order_id) => {
                info!(%order_id, previous = ?held, "Following active order written by another tab");
                self.set_state(State::Confirmed { order_id });
            }
            None => {
                info!(previous = ?held, "Active order gone, back to idle");
                self.set_state(State::Idle);
            }
        }
    }

    fn set_state(&mut self, state: State) {
        self.state = state;
        self.publish();
    }

    fn publish(&self) {
        let status = match &self.state {
            State::Idle => LifecycleStatus::Idle,
            State::Pending {
                submission,
                deadline,
            } => LifecycleStatus::Pending {
                deadline: *deadline,
                vendor_count: submission.vendor_count(),
                grand_total: submission.fees.grand_total,
            },
            State::Confirmed { order_id } => LifecycleStatus::Confirmed {
                order_id: *order_id,
            },
        };
        self.status.send_replace(status);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Reports each vendor's share; failures are logged and otherwise ignored.
async fn report(backend: Arc<dyn OrderBackend>, payloads: Vec<BackendOrderPayload>) {
    for payload in payloads {
        let restaurant_id = payload.restaurant_id.clone();
        match backend.submit_order(payload).await {
            Ok(backend_id) => debug!(%restaurant_id, %backend_id, "Backend accepted order"),
            Err(e) => warn!(%restaurant_id, error = %e, "Backend rejected order"),
        }
    }
}
