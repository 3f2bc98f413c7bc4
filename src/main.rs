//! Walks one order through the engine with two tabs open on the same origin:
//! the first builds the cart and checks out, the second follows the order
//! and confirms receipt.
//!
//! ```bash
//! RUST_LOG=info cargo run -- --confirm-early
//! STOREFRONT_CONFIG=storefront.json cargo run
//! ```

use clap::Parser;
use origin_store::tracing::setup_tracing;
use std::path::PathBuf;
use storefront_engine::config::EngineConfig;
use storefront_engine::model::{CheckoutMethod, PaymentMethod, Product, VendorId};
use storefront_engine::order_lifecycle::LifecycleStatus;
use storefront_engine::runtime::Storefront;
use storefront_engine::tracker::format_remaining;
use tracing::{info, Instrument};

/// Storefront cart-to-order walkthrough
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart-to-order walkthrough", long_about = None)]
struct Cli {
    /// JSON file overriding the engine defaults
    #[arg(short, long, env = "STOREFRONT_CONFIG")]
    config: Option<PathBuf>,

    /// Confirm right after submitting instead of waiting out the window
    #[arg(long)]
    confirm_early: bool,

    /// Delivery area of the order
    #[arg(long, default_value = "Zindabazar")]
    area: String,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let cli = Cli::parse();

    let config = EngineConfig::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    info!("Starting storefront");

    let storefront = Storefront::new(config);
    let mut shop = storefront.open_tab();
    let mut follower = storefront.open_tab();

    let kfc = VendorId::from("kfc");
    let pizzahut = VendorId::from("pizzahut");
    let cart_span = tracing::info_span!("cart", tab = %shop.id);
    let checkout_span = tracing::info_span!("checkout", tab = %shop.id);

    async {
        for _ in 0..2 {
            shop.cart
                .add_item(&Product::new("Burger", 200), &kfc, |_| true)
                .await
                .map_err(|e| e.to_string())?;
        }
        shop.cart
            .add_item(&Product::new("Pan Pizza", 550), &pizzahut, |warning| {
                info!(%warning, "Fee split accepted");
                true
            })
            .await
            .map_err(|e| e.to_string())?;
        Ok::<_, String>(())
    }
    .instrument(cart_span)
    .await?;

    async {
        let checkout = &mut shop.checkout;
        checkout
            .set_method(CheckoutMethod::Delivery)
            .await
            .map_err(|e| e.to_string())?;
        checkout.set_area(&cli.area).map_err(|e| e.to_string())?;
        checkout.set_customer_name("Rahim Uddin");
        checkout.set_customer_phone("01711000000");
        checkout.set_customer_address("House 12, Road 3");
        checkout.set_payment_method(PaymentMethod::MobileWallet);

        let summary = checkout.summary().await.map_err(|e| e.to_string())?;
        info!(
            vendors = summary.groups.len(),
            subtotal = summary.fees.subtotal,
            extra_charge = summary.fees.extra_charge,
            grand_total = summary.fees.grand_total,
            "Checkout summary"
        );

        if !checkout.submit(&shop.lifecycle).await {
            return Err("Checkout was blocked".to_string());
        }
        Ok::<_, String>(())
    }
    .instrument(checkout_span)
    .await?;

    if cli.confirm_early {
        let outcome = shop.lifecycle.confirm_now().await.map_err(|e| e.to_string())?;
        info!(order_id = %outcome.order_id(), "Confirmed early");
    } else {
        let mut status = shop.lifecycle.subscribe();
        if let Some(remaining) = shop.lifecycle.status().remaining() {
            info!(remaining_secs = remaining.as_secs(), "Waiting out the confirmation window");
        }
        status
            .wait_for(|status| matches!(status, LifecycleStatus::Confirmed { .. }))
            .await
            .map_err(|e| e.to_string())?;
    }

    let view = follower
        .tracker
        .wait_for(|view| view.is_some())
        .await
        .map_err(|e| e.to_string())?
        .ok_or("Order vanished before it was tracked")?;

    for vendor in &view.vendors {
        info!(
            tab = %follower.id,
            vendor_id = %vendor.vendor_id,
            security_code = vendor.security_code,
            remaining = %format_remaining(vendor.remaining_secs),
            "Tracking"
        );
    }

    follower.tracker.rate(&kfc, 5).await.map_err(|e| e.to_string())?;
    follower.tracker.mark_received().await.map_err(|e| e.to_string())?;

    shop.tracker
        .wait_for(|view| view.is_none())
        .await
        .map_err(|e| e.to_string())?;
    info!(tab = %shop.id, "Order received everywhere");

    shop.close().await?;
    follower.close().await?;
    storefront.shutdown().await
}
