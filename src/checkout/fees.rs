//! Extra-charge computation per checkout method.
//!
//! | Method | Extra charge |
//! |--------|--------------|
//! | Delivery | area charge × vendor count |
//! | Pickup | packaging fee × total item quantity |
//! | Dine-in | none |
//!
//! Each vendor is billed its own share, listed in [`FeeBreakdown::vendor_fees`].
use crate::config::EngineConfig;
use crate::model::{Amount, CheckoutMethod, FeeBreakdown, VendorFee, VendorGroup};

pub fn compute_fees(
    method: CheckoutMethod,
    area: Option<&str>,
    groups: &[VendorGroup],
    config: &EngineConfig,
) -> FeeBreakdown {
    let area_charge = area.and_then(|area| config.area_charge(area)).unwrap_or(0);

    let vendor_fees: Vec<VendorFee> = groups
        .iter()
        .map(|group| {
            let fee = match method {
                CheckoutMethod::Delivery => area_charge,
                CheckoutMethod::Pickup => config
                    .packaging_fee_per_item
                    .saturating_mul(group.item_count()),
                CheckoutMethod::DineIn => 0,
            };
            VendorFee {
                vendor_id: group.vendor_id.clone(),
                fee,
            }
        })
        .collect();

    let subtotal = total(groups.iter().map(|group| group.subtotal));
    let extra_charge = total(vendor_fees.iter().map(|line| line.fee));

    FeeBreakdown {
        subtotal,
        extra_charge,
        grand_total: subtotal.saturating_add(extra_charge),
        vendor_fees,
    }
}

fn total(amounts: impl Iterator<Item = Amount>) -> Amount {
    amounts.fold(0, Amount::saturating_add)
}
