mod common;

use common::{burger, clock, kfc, pizza, pizzahut, start_store};
use origin_store::{StorageClient, StorageScope};
use std::time::Duration;
use storefront_engine::cart_store::{AddOutcome, CartError, CartStore};
use storefront_engine::clients::{CartClient, CART_KEY};
use storefront_engine::model::{CheckoutMethod, Product, VendorId};

fn cart_store() -> (CartStore, StorageClient) {
    let session = start_store(StorageScope::Session);
    let cart = CartStore::new(
        CartClient::new(session.clone()),
        clock(),
        Duration::from_secs(4 * 60 * 60),
    );
    (cart, session)
}

#[tokio::test(start_paused = true)]
async fn test_add_item_upserts_and_persists_layout() {
    let (cart, session) = cart_store();

    let first = cart.add_item(&burger(), &kfc(), |_| true).await.unwrap();
    let second = cart.add_item(&burger(), &kfc(), |_| true).await.unwrap();

    let AddOutcome::Added(line) = second else {
        panic!("Expected the add to succeed, got {second:?}");
    };
    assert!(matches!(first, AddOutcome::Added(_)));
    assert_eq!(line.quantity, 2);
    assert_eq!(line.added_at_epoch_ms, common::T0);

    let raw = session
        .get(CART_KEY)
        .await
        .expect("Failed to read cart")
        .expect("Cart not persisted");
    assert_eq!(
        raw,
        r#"[{"vendorId":"kfc","productName":"Burger","unitPrice":200,"quantity":2,"addedAtEpochMs":1700000000000}]"#
    );
}

#[tokio::test]
async fn test_second_vendor_needs_confirmation() {
    let (cart, _session) = cart_store();
    cart.add_item(&burger(), &kfc(), |_| true).await.unwrap();

    // Declined: nothing changes
    let mut prompted = None;
    let outcome = cart
        .add_item(&pizza(), &pizzahut(), |warning| {
            prompted = Some(warning.clone());
            false
        })
        .await
        .unwrap();
    assert_eq!(outcome, AddOutcome::Cancelled);
    let warning = prompted.expect("Fee split warning not shown");
    assert_eq!(warning.existing_vendors, vec![kfc()]);
    assert_eq!(warning.new_vendor, pizzahut());
    assert_eq!(warning.vendor_count_after(), 2);
    assert_eq!(cart.vendor_groups().await.unwrap().len(), 1);

    // Accepted
    cart.add_item(&pizza(), &pizzahut(), |_| true).await.unwrap();
    let groups = cart.vendor_groups().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].vendor_id, pizzahut());

    // Same vendor again: no prompt
    cart.add_item(&Product::new("Wings", 300), &kfc(), |_| panic!("Prompted for a known vendor"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dine_in_cart_refuses_second_vendor() {
    let (cart, _session) = cart_store();
    cart.set_prevailing_method(CheckoutMethod::DineIn);
    cart.add_item(&burger(), &kfc(), |_| true).await.unwrap();

    let err = cart
        .add_item(&pizza(), &pizzahut(), |_| true)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CartError::DineInSingleVendorViolation { ref existing, ref attempted }
            if *existing == kfc() && *attempted == pizzahut()
    ));
    let items = cart.items().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].vendor_id, kfc());
}

#[tokio::test]
async fn test_update_quantity_clamps_and_removes() {
    let (cart, _session) = cart_store();
    cart.add_item(&burger(), &kfc(), |_| true).await.unwrap();

    assert_eq!(cart.update_quantity("Burger", &kfc(), 2).await.unwrap(), 3);
    assert_eq!(cart.update_quantity("Burger", &kfc(), -7).await.unwrap(), 0);
    assert!(cart.items().await.unwrap().is_empty());

    let err = cart.update_quantity("Burger", &kfc(), 1).await.unwrap_err();
    assert!(matches!(err, CartError::UnknownItem { .. }));
}

#[tokio::test]
async fn test_remove_vendor_and_clear() {
    let (cart, session) = cart_store();
    cart.add_item(&burger(), &kfc(), |_| true).await.unwrap();
    cart.add_item(&pizza(), &pizzahut(), |_| true).await.unwrap();
    cart.add_item(&Product::new("Garlic Bread", 120), &pizzahut(), |_| true)
        .await
        .unwrap();

    assert_eq!(cart.remove_vendor(&pizzahut()).await.unwrap(), 2);
    assert_eq!(cart.remove_vendor(&VendorId::from("chillox")).await.unwrap(), 0);
    assert_eq!(cart.items().await.unwrap().len(), 1);

    cart.clear().await.unwrap();
    assert!(cart.items().await.unwrap().is_empty());
    assert_eq!(session.get(CART_KEY).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_stale_cart_expires_on_navigation() {
    let (cart, session) = cart_store();
    cart.add_item(&burger(), &kfc(), |_| true).await.unwrap();

    tokio::time::advance(Duration::from_secs(4 * 60 * 60)).await;
    cart.enforce_expiry().await.expect("Cart at the ceiling is kept");

    tokio::time::advance(Duration::from_secs(1)).await;
    let err = cart.enforce_expiry().await.unwrap_err();
    assert!(matches!(err, CartError::StaleCartExpired { age_secs: 14_401 }));
    assert_eq!(session.get(CART_KEY).await.unwrap(), None);

    // An empty cart never expires
    cart.enforce_expiry().await.unwrap();
}

#[tokio::test]
async fn test_unreadable_cart_reads_as_empty() {
    let (cart, session) = cart_store();
    session
        .set(CART_KEY, "[{\"vendorId\":".to_string())
        .await
        .unwrap();

    assert!(cart.items().await.unwrap().is_empty());

    // The next mutation replaces the broken record
    cart.add_item(&burger(), &kfc(), |_| true).await.unwrap();
    assert_eq!(cart.items().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_prevailing_method_is_shared_between_clones() {
    let (cart, _session) = cart_store();
    let other = cart.clone();
    let mut changes = cart.watch_method();

    other.set_prevailing_method(CheckoutMethod::Pickup);

    changes.changed().await.unwrap();
    assert_eq!(*changes.borrow(), CheckoutMethod::Pickup);
    assert_eq!(cart.prevailing_method(), CheckoutMethod::Pickup);
}
