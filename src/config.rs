//! # Engine Configuration
//!
//! Every tunable of the engine in one serde struct. [`EngineConfig::default`]
//! carries the storefront's production values; a JSON file may override any
//! subset of them:
//!
//! ```json
//! {
//!   "confirmation_window_secs": 30,
//!   "area_charges": { "Zindabazar": 45 }
//! }
//! ```
//!
//! Fields missing from the file keep their defaults. `area_charges` and
//! `tables` replace the defaults wholesale when present.
use crate::model::{Amount, CheckoutMethod, DiningTable, PartyType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid config: {0}")]
    Parse(String),

    #[error("Security code range {min}..={max} is empty")]
    EmptyCodeRange { min: u32, max: u32 },
}

/// Per-method time from confirmation to hand-over.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeliveryDurations {
    pub dine_in_secs: u64,
    pub pickup_secs: u64,
    pub delivery_secs: u64,
}

impl Default for DeliveryDurations {
    fn default() -> Self {
        Self {
            dine_in_secs: 15 * 60,
            pickup_secs: 25 * 60,
            delivery_secs: 40 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Age of the first cart line after which the whole cart is discarded.
    pub cart_expiry_secs: u64,
    /// Editable window between submission and confirmation.
    pub confirmation_window_secs: u64,
    pub delivery_durations: DeliveryDurations,
    pub packaging_fee_per_item: Amount,
    /// Delivery charge per vendor, keyed by area name.
    pub area_charges: BTreeMap<String, Amount>,
    pub tables: Vec<DiningTable>,
    pub security_code_min: u32,
    pub security_code_max: u32,
    pub tracker_tick_ms: u64,
    pub channel_buffer: usize,
    pub sync_bus_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let area_charges = [
            ("Amberkhana", 50),
            ("Chowhatta", 40),
            ("Modina Market", 80),
            ("Shibganj", 60),
            ("Subidbazar", 60),
            ("Tilagor", 70),
            ("Uposhohor", 50),
            ("Zindabazar", 40),
        ]
        .into_iter()
        .map(|(area, charge)| (area.to_string(), charge))
        .collect();

        let tables = vec![
            DiningTable::new("C1", "Window Nook", PartyType::Couple, 2),
            DiningTable::new("C2", "Garden Corner", PartyType::Couple, 2),
            DiningTable::new("C3", "Balcony", PartyType::Couple, 2),
            DiningTable::new("F1", "Family Booth 1", PartyType::Family, 4),
            DiningTable::new("F2", "Family Booth 2", PartyType::Family, 4),
            DiningTable::new("F3", "Round Table", PartyType::Family, 5),
            DiningTable::new("L1", "Long Table", PartyType::Family, 6),
            DiningTable::new("L2", "Banquet", PartyType::Family, 10),
        ];

        Self {
            cart_expiry_secs: 4 * 60 * 60,
            confirmation_window_secs: 100,
            delivery_durations: DeliveryDurations::default(),
            packaging_fee_per_item: 10,
            area_charges,
            tables,
            security_code_min: 10000,
            security_code_max: 99999,
            tracker_tick_ms: 1000,
            channel_buffer: 32,
            sync_bus_capacity: 16,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Config file unreadable");
            ConfigError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let config = Self::from_json_str(&raw)?;
        info!(path = %path.display(), areas = config.area_charges.len(), tables = config.tables.len(), "Config loaded");
        Ok(config)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => {
                info!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security_code_min > self.security_code_max {
            return Err(ConfigError::EmptyCodeRange {
                min: self.security_code_min,
                max: self.security_code_max,
            });
        }
        if self.channel_buffer == 0 || self.sync_bus_capacity == 0 {
            return Err(ConfigError::Parse("channel sizes must be at least 1".into()));
        }
        if self.tracker_tick_ms == 0 {
            return Err(ConfigError::Parse("tracker_tick_ms must be at least 1".into()));
        }
        Ok(())
    }

    pub fn cart_expiry(&self) -> Duration {
        Duration::from_secs(self.cart_expiry_secs)
    }

    pub fn confirmation_window(&self) -> Duration {
        Duration::from_secs(self.confirmation_window_secs)
    }

    pub fn tracker_tick(&self) -> Duration {
        Duration::from_millis(self.tracker_tick_ms)
    }

    pub fn security_code_range(&self) -> RangeInclusive<u32> {
        self.security_code_min..=self.security_code_max
    }

    pub fn delivery_duration_secs(&self, method: CheckoutMethod) -> u64 {
        match method {
            CheckoutMethod::DineIn => self.delivery_durations.dine_in_secs,
            CheckoutMethod::Pickup => self.delivery_durations.pickup_secs,
            CheckoutMethod::Delivery => self.delivery_durations.delivery_secs,
        }
    }

    pub fn area_charge(&self, area: &str) -> Option<Amount> {
        self.area_charges.get(area).copied()
    }

    pub fn table(&self, id: &crate::model::TableId) -> Option<&DiningTable> {
        self.tables.iter().find(|table| table.id == *id)
    }
}
