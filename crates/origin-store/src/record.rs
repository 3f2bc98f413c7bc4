//! # StoredRecord Trait
//!
//! A record type declares, once, which key it lives under and in which store.
//! The JSON encoding is shared by every record, so the persisted layout is
//! exactly what `serde_json` produces for the type.

use crate::error::StorageError;
use crate::event::StorageScope;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A value persisted as JSON under a fixed key.
///
/// ```rust
/// use origin_store::{StoredRecord, StorageScope};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Theme { dark: bool }
///
/// impl StoredRecord for Theme {
///     const KEY: &'static str = "theme";
///     const SCOPE: StorageScope = StorageScope::Durable;
/// }
///
/// let raw = Theme { dark: true }.encode().unwrap();
/// assert_eq!(raw, r#"{"dark":true}"#);
/// assert!(Theme::decode("not json").is_err());
/// ```
pub trait StoredRecord: Serialize + DeserializeOwned + Debug + Send + Sync + 'static {
    /// The storage key.
    const KEY: &'static str;

    /// The store the key belongs to.
    const SCOPE: StorageScope;

    fn encode(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::Encode {
            key: Self::KEY.to_string(),
            reason: e.to_string(),
        })
    }

    fn decode(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|e| StorageError::Malformed {
            key: Self::KEY.to_string(),
            reason: e.to_string(),
        })
    }
}
