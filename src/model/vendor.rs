use crate::model::{Amount, CartLineItem};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for vendors (restaurants).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(pub String);

impl From<&str> for VendorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VendorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for VendorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// All cart lines of one vendor plus their subtotal.
///
/// Always derived from a line list with [`group_by_vendor`]; the only place a
/// group is stored is the snapshot inside an
/// [`ActiveOrder`](crate::model::ActiveOrder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorGroup {
    pub vendor_id: VendorId,
    pub items: Vec<CartLineItem>,
    pub subtotal: Amount,
}

impl VendorGroup {
    /// Total quantity across the group's lines.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .fold(0, |count, item| count.saturating_add(u64::from(item.quantity)))
    }
}

/// Groups lines by vendor, keeping vendors in the order they first appear.
pub fn group_by_vendor(items: &[CartLineItem]) -> Vec<VendorGroup> {
    let mut groups: Vec<VendorGroup> = Vec::new();

    for item in items {
        match groups.iter_mut().find(|g| g.vendor_id == item.vendor_id) {
            Some(group) => {
                group.subtotal = group.subtotal.saturating_add(item.line_total());
                group.items.push(item.clone());
            }
            None => groups.push(VendorGroup {
                vendor_id: item.vendor_id.clone(),
                items: vec![item.clone()],
                subtotal: item.line_total(),
            }),
        }
    }

    groups
}
