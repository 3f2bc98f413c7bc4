use crate::model::{DiningTable, TableFilter};

/// Tables of the floor plan the filter lets the customer pick from.
pub fn selectable<'a>(filter: &TableFilter, inventory: &'a [DiningTable]) -> Vec<&'a DiningTable> {
    if !filter.is_complete() {
        return Vec::new();
    }
    inventory.iter().filter(|table| filter.matches(table)).collect()
}
