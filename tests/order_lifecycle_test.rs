mod common;

use common::{burger, kfc, pizza, pizzahut, start_store, Harness, T0};
use origin_store::mock::MockStorage;
use origin_store::{ChangeKind, RecordClient, StorageError, StorageScope};
use std::sync::Arc;
use std::time::Duration;
use storefront_engine::clients::{BackendError, MockOrderBackend, ACTIVE_ORDER_KEY};
use storefront_engine::config::EngineConfig;
use storefront_engine::model::{CheckoutMethod, OrderStatus};
use storefront_engine::order_lifecycle::{ConfirmOutcome, LifecycleError, LifecycleStatus};
use tokio::sync::mpsc;

async fn wait_confirmed(harness: &Harness) -> LifecycleStatus {
    let mut status = harness.lifecycle.subscribe();
    let status = status
        .wait_for(|status| matches!(status, LifecycleStatus::Confirmed { .. }))
        .await
        .expect("Lifecycle stopped");
    status.clone()
}

#[tokio::test(start_paused = true)]
async fn test_countdown_confirms_without_interaction() {
    let mut harness = Harness::new(EngineConfig::default());
    harness.submit_scenario_a().await;

    // 1. Still pending just before the window closes
    tokio::time::advance(Duration::from_secs(99)).await;
    assert!(harness.lifecycle.status().is_pending());
    assert_eq!(
        harness.lifecycle.status().remaining(),
        Some(Duration::from_secs(1))
    );
    assert_eq!(harness.orders.current().await, None);

    // 2. Auto-confirm at t0 + 100 s
    tokio::time::advance(Duration::from_secs(1)).await;
    let status = wait_confirmed(&harness).await;

    let order = harness
        .orders
        .current()
        .await
        .expect("Active order not written");
    assert_eq!(status.order_id(), Some(order.order_id));
    assert_eq!(order.start_time_epoch_ms, T0 + 100_000);
    assert_eq!(order.total_delivery_duration_seconds, 40 * 60);
    assert_eq!(order.grand_total, 440);
    assert_eq!(order.method, CheckoutMethod::Delivery);
    assert_eq!(order.area.as_deref(), Some("Zindabazar"));
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert!((10000..=99999).contains(&order.security_base_code));

    // 3. Ownership moved: the cart is gone
    assert!(harness.cart.items().await.unwrap().is_empty());

    // 4. Remaining time at the start instant is the whole duration
    assert_eq!(
        order.remaining_seconds(order.start_time_epoch_ms),
        order.total_delivery_duration_seconds
    );
}

#[tokio::test(start_paused = true)]
async fn test_confirmation_is_idempotent() {
    let mut harness = Harness::new(EngineConfig::default());
    let mut events = harness.durable.subscribe();
    harness.submit_scenario_a().await;

    let first = harness.lifecycle.confirm_now().await.unwrap();
    let second = harness.lifecycle.confirm_now().await.unwrap();

    let ConfirmOutcome::Confirmed(order_id) = first else {
        panic!("Expected a fresh confirmation, got {first:?}");
    };
    assert_eq!(second, ConfirmOutcome::AlreadyConfirmed(order_id));

    // The countdown passing afterwards changes nothing
    tokio::time::advance(Duration::from_secs(200)).await;
    assert_eq!(
        harness.lifecycle.status(),
        LifecycleStatus::Confirmed { order_id }
    );

    let mut writes = 0;
    while let Ok(event) = events.try_recv() {
        if event.touches(ACTIVE_ORDER_KEY) && event.kind == ChangeKind::Set {
            writes += 1;
        }
    }
    assert_eq!(writes, 1);
    assert_eq!(harness.orders.current().await.unwrap().order_id, order_id);
}

#[tokio::test]
async fn test_confirm_without_pending_order() {
    let harness = Harness::new(EngineConfig::default());

    let err = harness.lifecycle.confirm_now().await.unwrap_err();
    assert!(matches!(err, LifecycleError::NothingPending));
}

#[tokio::test(start_paused = true)]
async fn test_abandon_hands_the_submission_back() {
    let mut harness = Harness::new(EngineConfig::default());
    harness.submit_scenario_a().await;

    let submission = harness
        .lifecycle
        .abandon()
        .await
        .unwrap()
        .expect("Nothing was pending");
    assert_eq!(submission.draft.customer.name, "Rahim Uddin");
    assert_eq!(submission.fees.grand_total, 440);
    assert_eq!(harness.lifecycle.status(), LifecycleStatus::Idle);

    // Nothing is ever written, even after the window would have closed
    tokio::time::advance(Duration::from_secs(300)).await;
    assert_eq!(harness.orders.current().await, None);
    assert_eq!(harness.cart.items().await.unwrap().len(), 1);

    // Amend and resubmit
    harness.checkout.restore(submission);
    assert_eq!(harness.checkout.draft().customer.name, "Rahim Uddin");
    assert!(harness.checkout.submit(&harness.lifecycle).await);
    assert!(harness.lifecycle.abandon().await.unwrap().is_some());
    assert!(harness.lifecycle.abandon().await.unwrap().is_none());
}

#[tokio::test]
async fn test_delivery_duration_follows_method() {
    let config = EngineConfig::default();
    let mut harness = Harness::new(config.clone());
    harness.add(&burger(), &kfc(), 1).await;
    harness
        .checkout
        .set_method(CheckoutMethod::Pickup)
        .await
        .unwrap();
    harness.checkout.set_customer_name("Karim");
    harness.checkout.set_customer_phone("01811000000");
    assert!(harness.checkout.submit(&harness.lifecycle).await);

    harness.lifecycle.confirm_now().await.unwrap();

    let order = harness.orders.current().await.unwrap();
    assert_eq!(
        order.total_delivery_duration_seconds,
        config.delivery_durations.pickup_secs
    );
    assert_eq!(order.grand_total, 210);
}

#[tokio::test]
async fn test_mark_received_completes_the_order() {
    let mut harness = Harness::new(EngineConfig::default());
    let mut signals = harness.bus.subscribe();
    harness.submit_scenario_a().await;

    // Not while pending
    assert!(matches!(
        harness.lifecycle.mark_received().await,
        Err(LifecycleError::StillPending)
    ));

    harness.lifecycle.confirm_now().await.unwrap();
    assert!(signals.recv().await.is_ok());

    assert!(harness.lifecycle.mark_received().await.unwrap());
    assert!(signals.recv().await.is_ok());
    assert_eq!(harness.orders.current().await, None);
    assert_eq!(harness.lifecycle.status(), LifecycleStatus::Idle);

    // Nothing left to receive
    assert!(!harness.lifecycle.mark_received().await.unwrap());
}

#[tokio::test]
async fn test_new_order_waits_for_the_active_one() {
    let mut harness = Harness::new(EngineConfig::default());
    harness.submit_scenario_a().await;
    let order_id = harness.lifecycle.confirm_now().await.unwrap().order_id();

    harness.add(&pizza(), &pizzahut(), 1).await;
    harness.fill_delivery_details();
    assert!(!harness.checkout.submit(&harness.lifecycle).await);

    harness.lifecycle.mark_received().await.unwrap();
    assert!(harness.checkout.submit(&harness.lifecycle).await);
    let next = harness.lifecycle.confirm_now().await.unwrap().order_id();
    assert_ne!(next, order_id);
}

#[tokio::test]
async fn test_stored_order_is_adopted_on_start() {
    let session = start_store(StorageScope::Session);
    let durable = start_store(StorageScope::Durable);

    let mut first = Harness::on_stores(
        EngineConfig::default(),
        Arc::new(storefront_engine::clients::LoggingBackend),
        session.clone(),
        durable.clone(),
    );
    first.submit_scenario_a().await;
    let order_id = first.lifecycle.confirm_now().await.unwrap().order_id();

    // A reload: fresh components on the same stores
    let reloaded = Harness::on_stores(
        EngineConfig::default(),
        Arc::new(storefront_engine::clients::LoggingBackend),
        session,
        durable,
    );
    let status = wait_confirmed(&reloaded).await;
    assert_eq!(status, LifecycleStatus::Confirmed { order_id });
}

#[tokio::test]
async fn test_malformed_record_reads_as_no_order() {
    let mut harness = Harness::new(EngineConfig::default());
    harness
        .durable
        .set(ACTIVE_ORDER_KEY, "{\"orderId\":42".to_string())
        .await
        .unwrap();

    assert_eq!(harness.orders.current().await, None);
    let err = harness.orders.load().await.unwrap_err();
    assert!(matches!(err, LifecycleError::Storage(ref e) if e.is_read_error()));

    // The broken record does not block a new order; confirming replaces it
    harness.submit_scenario_a().await;
    harness.lifecycle.confirm_now().await.unwrap();
    assert!(harness.orders.current().await.is_some());
}

#[tokio::test]
async fn test_failed_write_still_confirms_locally() {
    let mut durable = MockStorage::new(StorageScope::Durable);
    durable.expect_get(ACTIVE_ORDER_KEY).return_ok(None); // adoption on start
    durable.expect_get(ACTIVE_ORDER_KEY).return_ok(None); // begin
    durable.expect_get(ACTIVE_ORDER_KEY).return_ok(None); // overwrite check
    durable
        .expect_set(ACTIVE_ORDER_KEY)
        .return_err(StorageError::StoreClosed);
    durable.expect_get(ACTIVE_ORDER_KEY).return_ok(None); // reader afterwards

    let mut harness = Harness::on_stores(
        EngineConfig::default(),
        Arc::new(storefront_engine::clients::LoggingBackend),
        start_store(StorageScope::Session),
        durable.client(),
    );
    harness.submit_scenario_a().await;

    let outcome = harness.lifecycle.confirm_now().await.unwrap();

    assert!(matches!(outcome, ConfirmOutcome::Confirmed(_)));
    assert!(harness.cart.items().await.unwrap().is_empty());
    assert_eq!(harness.orders.current().await, None);
    assert!(durable.writes().is_empty());
    durable.verify();
}

#[tokio::test]
async fn test_backend_gets_one_payload_per_vendor() {
    let (sent, mut received) = mpsc::unbounded_channel();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_submit_order()
        .times(2)
        .returning(move |payload| {
            let _ = sent.send(payload.clone());
            Ok(format!("srv-{}", payload.restaurant_id))
        });

    let mut harness = Harness::with_backend(EngineConfig::default(), Arc::new(backend));
    harness.add(&burger(), &kfc(), 2).await;
    harness.add(&pizza(), &pizzahut(), 1).await;
    harness.fill_delivery_details();
    assert!(harness.checkout.submit(&harness.lifecycle).await);
    let order_id = harness.lifecycle.confirm_now().await.unwrap().order_id();

    let first = received.recv().await.expect("Backend not called");
    let second = received.recv().await.expect("Backend called once");

    assert_eq!(first.order_ref, order_id.to_string());
    assert_eq!(first.restaurant_id, kfc());
    assert_eq!(first.billing.subtotal, 400);
    assert_eq!(first.billing.extra_charge, 40);
    assert_eq!(first.billing.total, 440);
    assert_eq!(second.restaurant_id, pizzahut());
    assert_eq!(second.billing.total, 590);
    assert_eq!(second.customer.name, "Rahim Uddin");
}

#[tokio::test]
async fn test_backend_failure_does_not_undo_confirmation() {
    let (sent, mut received) = mpsc::unbounded_channel();
    let mut backend = MockOrderBackend::new();
    backend.expect_submit_order().returning(move |_| {
        let _ = sent.send(());
        Err(BackendError::Unavailable("connection refused".into()))
    });

    let mut harness = Harness::with_backend(EngineConfig::default(), Arc::new(backend));
    harness.submit_scenario_a().await;
    harness.lifecycle.confirm_now().await.unwrap();

    received.recv().await.expect("Backend not called");
    assert!(harness.orders.current().await.is_some());
    assert!(matches!(
        harness.lifecycle.status(),
        LifecycleStatus::Confirmed { .. }
    ));
}
