//! What the order tracker shows, computed from the stored record alone.
use crate::model::{
    ActiveOrder, Amount, CartLineItem, CheckoutMethod, OrderId, PaymentMethod, TableId, VendorId,
};
use std::collections::HashMap;

/// A star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub fn new(stars: u8) -> Option<Self> {
        (1..=5).contains(&stars).then_some(Self(stars))
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorProgress {
    pub vendor_id: VendorId,
    pub items: Vec<CartLineItem>,
    pub subtotal: Amount,
    pub remaining_secs: u64,
    pub security_code: u32,
    pub rating: Option<Rating>,
}

impl VendorProgress {
    pub fn is_ready(&self) -> bool {
        self.remaining_secs == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerView {
    pub order_id: OrderId,
    pub method: CheckoutMethod,
    pub area: Option<String>,
    pub selected_table_id: Option<TableId>,
    pub payment_method: PaymentMethod,
    pub grand_total: Amount,
    pub vendors: Vec<VendorProgress>,
}

impl TrackerView {
    pub fn all_ready(&self) -> bool {
        self.vendors.iter().all(VendorProgress::is_ready)
    }

    pub fn vendor(&self, vendor_id: &VendorId) -> Option<&VendorProgress> {
        self.vendors.iter().find(|v| v.vendor_id == *vendor_id)
    }
}

/// Regroups the snapshot and derives every vendor's countdown and code.
pub fn render(order: &ActiveOrder, now_epoch_ms: u64, ratings: &HashMap<VendorId, Rating>) -> TrackerView {
    let remaining_secs = order.remaining_seconds(now_epoch_ms);
    let codes = order.vendor_security_codes();

    let vendors = order
        .vendor_groups()
        .into_iter()
        .zip(codes)
        .map(|(group, code)| VendorProgress {
            rating: ratings.get(&group.vendor_id).copied(),
            vendor_id: group.vendor_id,
            items: group.items,
            subtotal: group.subtotal,
            remaining_secs,
            security_code: code.code,
        })
        .collect();

    TrackerView {
        order_id: order.order_id,
        method: order.method,
        area: order.area.clone(),
        selected_table_id: order.selected_table_id.clone(),
        payment_method: order.payment_method,
        grand_total: order.grand_total,
        vendors,
    }
}

/// `mm:ss`, with minutes growing past 59.
pub fn format_remaining(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{group_by_vendor, CheckoutDraft, CheckoutSubmission, FeeBreakdown};

    fn order() -> ActiveOrder {
        let line = |vendor: &str, name: &str| CartLineItem {
            vendor_id: vendor.into(),
            product_name: name.into(),
            unit_price: 100,
            quantity: 1,
            added_at_epoch_ms: 0,
        };
        let items = vec![line("kfc", "Burger"), line("pizzahut", "Pan Pizza")];
        let submission = CheckoutSubmission {
            draft: CheckoutDraft::default(),
            groups: group_by_vendor(&items),
            items,
            fees: FeeBreakdown::default(),
        };
        ActiveOrder::confirm(OrderId::new(), submission, 10_000, 60, 54321)
    }

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_none());
        assert_eq!(Rating::new(5).map(Rating::stars), Some(5));
        assert!(Rating::new(6).is_none());
    }

    #[test]
    fn render_derives_codes_countdown_and_ratings() {
        let order = order();
        let mut ratings = HashMap::new();
        ratings.insert(VendorId::from("pizzahut"), Rating::new(4).unwrap());

        let view = render(&order, 40_000, &ratings);

        assert_eq!(view.vendors.len(), 2);
        assert_eq!(view.vendors[0].security_code, 54321);
        assert_eq!(view.vendors[1].security_code, 54322);
        assert_eq!(view.vendors[0].remaining_secs, 30);
        assert_eq!(view.vendors[0].rating, None);
        assert_eq!(view.vendors[1].rating, Rating::new(4));
        assert!(!view.all_ready());

        assert!(render(&order, 70_000, &ratings).all_ready());
    }

    #[test]
    fn remaining_is_formatted_as_minutes_and_seconds() {
        assert_eq!(format_remaining(2_400), "40:00");
        assert_eq!(format_remaining(61), "01:01");
        assert_eq!(format_remaining(0), "00:00");
    }
}
