//! Pure cart mutation rules, free of storage and clocks.
use crate::model::{CartLineItem, Product, VendorId};

/// The cart's line list with its identity and quantity rules enforced.
///
/// Every line has a distinct `(vendor_id, product_name)` and a quantity of at
/// least one, whatever sequence of operations produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLines {
    items: Vec<CartLineItem>,
}

impl CartLines {
    /// Builds from stored lines, merging repeated keys and dropping empty lines.
    ///
    /// Another tab may have written the record, so nothing about it is trusted.
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut lines = Self::default();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match lines
                .items
                .iter_mut()
                .find(|line| line.is_line(&item.vendor_id, &item.product_name))
            {
                Some(line) => {
                    line.quantity = line.quantity.saturating_add(item.quantity);
                    line.added_at_epoch_ms = line.added_at_epoch_ms.min(item.added_at_epoch_ms);
                }
                None => lines.items.push(item),
            }
        }
        lines
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .fold(0, |count, item| count.saturating_add(u64::from(item.quantity)))
    }

    /// Distinct vendors in first-seen order.
    pub fn vendor_ids(&self) -> Vec<VendorId> {
        let mut vendors: Vec<VendorId> = Vec::new();
        for item in &self.items {
            if !vendors.contains(&item.vendor_id) {
                vendors.push(item.vendor_id.clone());
            }
        }
        vendors
    }

    pub fn contains_vendor(&self, vendor_id: &VendorId) -> bool {
        self.items.iter().any(|item| item.vendor_id == *vendor_id)
    }

    /// When the oldest line was added; drives cart expiry.
    pub fn first_added_at(&self) -> Option<u64> {
        self.items.iter().map(|item| item.added_at_epoch_ms).min()
    }

    /// Adds one unit, inserting the line if it is new.
    pub fn upsert(&mut self, product: &Product, vendor_id: &VendorId, now_epoch_ms: u64) -> CartLineItem {
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.is_line(vendor_id, &product.name))
        {
            line.quantity = line.quantity.saturating_add(1);
            return line.clone();
        }

        let line = CartLineItem {
            vendor_id: vendor_id.clone(),
            product_name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            added_at_epoch_ms: now_epoch_ms,
        };
        self.items.push(line.clone());
        line
    }

    /// Applies `delta` to an existing line, clamping at zero.
    ///
    /// Returns the new quantity, `Some(0)` when the line was removed, and
    /// `None` when there is no such line.
    pub fn adjust(&mut self, vendor_id: &VendorId, product_name: &str, delta: i64) -> Option<u32> {
        let index = self
            .items
            .iter()
            .position(|line| line.is_line(vendor_id, product_name))?;

        let next = (i64::from(self.items[index].quantity) + delta).clamp(0, i64::from(u32::MAX));
        let next = u32::try_from(next).unwrap_or(u32::MAX);

        if next == 0 {
            self.items.remove(index);
        } else {
            self.items[index].quantity = next;
        }
        Some(next)
    }

    /// Removes every line of `vendor_id`, returning how many went.
    pub fn remove_vendor(&mut self, vendor_id: &VendorId) -> usize {
        let before = self.items.len();
        self.items.retain(|line| line.vendor_id != *vendor_id);
        before - self.items.len()
    }
}
