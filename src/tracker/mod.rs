//! # Order Tracker
//!
//! The persistent widget showing the active order. It keeps no order state of
//! its own: on every wake from its [`OrderWatcher`] it reads the stored record
//! and renders it again, so a reload or another tab's write is picked up
//! within one tick.
//!
//! Ratings are the exception. They live only in the widget and are forgotten
//! when the order changes.
//!
//! ```rust,ignore
//! let (widget, mut tracker) = OrderTrackerWidget::new(orders, lifecycle, clock, watcher, 8);
//! tokio::spawn(widget.run());
//!
//! let view = tracker.wait_for(|view| view.is_some()).await?;
//! tracker.rate(&"kfc".into(), 5).await?;
//! tracker.mark_received().await?;
//! ```

pub mod view;

pub use view::{format_remaining, render, Rating, TrackerView, VendorProgress};

use crate::clients::ActiveOrderClient;
use crate::clock::SharedClock;
use crate::model::{OrderId, VendorId};
use crate::order_lifecycle::{LifecycleError, OrderLifecycle};
use crate::sync_bus::OrderWatcher;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Ratings go from 1 to 5 stars, got {0}")]
    InvalidRating(u8),

    #[error("No active order")]
    NoActiveOrder,

    #[error("{0} is not part of the active order")]
    UnknownVendor(VendorId),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Order tracker closed")]
    Closed,
}

#[derive(Debug)]
pub enum TrackerCommand {
    Rate {
        vendor_id: VendorId,
        rating: Rating,
        respond_to: oneshot::Sender<Result<(), TrackerError>>,
    },
    MarkReceived {
        respond_to: oneshot::Sender<Result<bool, TrackerError>>,
    },
}

pub struct OrderTrackerWidget {
    orders: ActiveOrderClient,
    lifecycle: OrderLifecycle,
    clock: SharedClock,
    watcher: OrderWatcher,
    commands: mpsc::Receiver<TrackerCommand>,
    view: watch::Sender<Option<TrackerView>>,
    ratings: HashMap<VendorId, Rating>,
    rated_order: Option<OrderId>,
}

impl OrderTrackerWidget {
    pub fn new(
        orders: ActiveOrderClient,
        lifecycle: OrderLifecycle,
        clock: SharedClock,
        watcher: OrderWatcher,
        buffer_size: usize,
    ) -> (Self, TrackerHandle) {
        let (sender, commands) = mpsc::channel(buffer_size);
        let (view, view_receiver) = watch::channel(None);
        let widget = Self {
            orders,
            lifecycle,
            clock,
            watcher,
            commands,
            view,
            ratings: HashMap::new(),
            rated_order: None,
        };
        let handle = TrackerHandle {
            commands: sender,
            view: view_receiver,
        };
        (widget, handle)
    }

    /// Renders until every [`TrackerHandle`] is dropped.
    pub async fn run(mut self) {
        info!("Order tracker started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                wake = self.watcher.next_wake() => {
                    debug!(?wake, "Tracker refresh");
                    self.refresh().await;
                }
            }
        }

        info!("Order tracker shutdown");
    }

    async fn handle(&mut self, command: TrackerCommand) {
        match command {
            TrackerCommand::Rate {
                vendor_id,
                rating,
                respond_to,
            } => {
                let _ = respond_to.send(self.rate(vendor_id, rating).await);
            }
            TrackerCommand::MarkReceived { respond_to } => {
                let result = self.lifecycle.mark_received().await.map_err(TrackerError::from);
                self.refresh().await;
                let _ = respond_to.send(result);
            }
        }
    }

    async fn rate(&mut self, vendor_id: VendorId, rating: Rating) -> Result<(), TrackerError> {
        self.refresh().await;
        let known = self
            .view
            .borrow()
            .as_ref()
            .map(|view| view.vendor(&vendor_id).is_some());
        match known {
            None => return Err(TrackerError::NoActiveOrder),
            Some(false) => return Err(TrackerError::UnknownVendor(vendor_id)),
            Some(true) => {}
        }

        info!(%vendor_id, stars = rating.stars(), "Vendor rated");
        self.ratings.insert(vendor_id, rating);
        self.refresh().await;
        Ok(())
    }

    async fn refresh(&mut self) {
        let next = match self.orders.current().await {
            Some(order) => {
                if self.rated_order != Some(order.order_id) {
                    self.ratings.clear();
                    self.rated_order = Some(order.order_id);
                }
                Some(render(&order, self.clock.now_epoch_ms(), &self.ratings))
            }
            None => {
                self.ratings.clear();
                self.rated_order = None;
                None
            }
        };

        self.view.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// A screen's handle on the tracker widget.
#[derive(Clone)]
pub struct TrackerHandle {
    commands: mpsc::Sender<TrackerCommand>,
    view: watch::Receiver<Option<TrackerView>>,
}

impl TrackerHandle {
    /// The latest rendering; `None` when there is no active order.
    pub fn view(&self) -> Option<TrackerView> {
        self.view.borrow().clone()
    }

    /// Waits for the next rendering that differs from the last one seen.
    pub async fn changed(&mut self) -> Result<Option<TrackerView>, TrackerError> {
        self.view.changed().await.map_err(|_| TrackerError::Closed)?;
        Ok(self.view.borrow_and_update().clone())
    }

    /// Waits until the rendering satisfies `condition`.
    pub async fn wait_for<F>(&mut self, mut condition: F) -> Result<Option<TrackerView>, TrackerError>
    where
        F: FnMut(&Option<TrackerView>) -> bool,
    {
        let view = self
            .view
            .wait_for(|view| condition(view))
            .await
            .map_err(|_| TrackerError::Closed)?;
        Ok((*view).clone())
    }

    #[instrument(skip(self))]
    pub async fn rate(&self, vendor_id: &VendorId, stars: u8) -> Result<(), TrackerError> {
        let rating = Rating::new(stars).ok_or(TrackerError::InvalidRating(stars))?;
        let (respond_to, response) = oneshot::channel();
        self.commands
            .send(TrackerCommand::Rate {
                vendor_id: vendor_id.clone(),
                rating,
                respond_to,
            })
            .await
            .map_err(|_| TrackerError::Closed)?;
        response.await.map_err(|_| TrackerError::Closed)?
    }

    /// The terminal "fully received" action.
    ///
    /// Completes the order on display even when this tab has an order of its
    /// own in its confirmation window; that one stays pending.
    #[instrument(skip(self))]
    pub async fn mark_received(&self) -> Result<bool, TrackerError> {
        let (respond_to, response) = oneshot::channel();
        self.commands
            .send(TrackerCommand::MarkReceived { respond_to })
            .await
            .map_err(|_| TrackerError::Closed)?;
        response.await.map_err(|_| TrackerError::Closed)?
    }
}
