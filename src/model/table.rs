use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(pub String);

impl From<&str> for TableId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartyType {
    Couple,
    Family,
}

/// Seat bucket for family parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartySize {
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "6+")]
    SixPlus,
}

impl PartySize {
    pub fn fits(self, seats: u8) -> bool {
        match self {
            PartySize::Four => (4..6).contains(&seats),
            PartySize::SixPlus => seats >= 6,
        }
    }
}

impl Display for PartySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartySize::Four => write!(f, "4"),
            PartySize::SixPlus => write!(f, "6+"),
        }
    }
}

/// One entry of the restaurant floor plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: TableId,
    pub label: String,
    pub party: PartyType,
    pub seats: u8,
}

impl DiningTable {
    pub fn new(id: &str, label: &str, party: PartyType, seats: u8) -> Self {
        Self {
            id: id.into(),
            label: label.to_string(),
            party,
            seats,
        }
    }
}

/// The two-step facet the table picker narrows the floor plan with.
///
/// Nothing is selectable until a party type is chosen; family parties also
/// need a size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableFilter {
    pub party: Option<PartyType>,
    pub size: Option<PartySize>,
}

impl TableFilter {
    pub fn is_complete(&self) -> bool {
        match self.party {
            Some(PartyType::Couple) => true,
            Some(PartyType::Family) => self.size.is_some(),
            None => false,
        }
    }

    pub fn matches(&self, table: &DiningTable) -> bool {
        match (self.party, self.size) {
            (Some(PartyType::Couple), _) => table.party == PartyType::Couple,
            (Some(PartyType::Family), Some(size)) => {
                table.party == PartyType::Family && size.fits(table.seats)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_filter_needs_a_size() {
        let table = DiningTable::new("F1", "Family 1", PartyType::Family, 4);
        let mut filter = TableFilter {
            party: Some(PartyType::Family),
            size: None,
        };
        assert!(!filter.is_complete());
        assert!(!filter.matches(&table));

        filter.size = Some(PartySize::Four);
        assert!(filter.matches(&table));

        filter.size = Some(PartySize::SixPlus);
        assert!(!filter.matches(&table));
    }

    #[test]
    fn couple_filter_ignores_size() {
        let filter = TableFilter {
            party: Some(PartyType::Couple),
            size: Some(PartySize::SixPlus),
        };
        assert!(filter.matches(&DiningTable::new("C1", "Window", PartyType::Couple, 2)));
        assert!(!filter.matches(&DiningTable::new("L1", "Hall", PartyType::Family, 8)));
    }
}
