//! # Change Notifications
//!
//! Every mutation of a store is announced on a broadcast channel. Listeners
//! must treat an event as "something changed, go re-read": the payload names
//! the key but never carries the new value.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Which of the two origin stores a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    /// Cleared with the browsing session (cart data).
    Session,
    /// Survives reloads and restarts (the active order).
    Durable,
}

impl Display for StorageScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageScope::Session => write!(f, "session"),
            StorageScope::Durable => write!(f, "durable"),
        }
    }
}

/// Identifies the tab that issued a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl TabId {
    /// Writes that do not originate from a particular tab (setup, tooling).
    pub const ORIGIN: TabId = TabId(0);
}

impl From<u32> for TabId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tab_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Set,
    Removed,
    Cleared,
}

/// A change to one key (or, for [`ChangeKind::Cleared`], the whole store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub scope: StorageScope,
    /// `None` when the whole store was cleared.
    pub key: Option<String>,
    pub kind: ChangeKind,
    pub source: TabId,
}

impl StorageEvent {
    /// True if this event may have changed `key`.
    pub fn touches(&self, key: &str) -> bool {
        match &self.key {
            Some(k) => k == key,
            None => true,
        }
    }
}
