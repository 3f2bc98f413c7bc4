//! # RecordClient Trait
//!
//! Provides typed `load` / `save` / `delete` for domain clients that wrap a
//! [`StorageClient`] and own exactly one [`StoredRecord`] type.
use crate::{StorageClient, StorageError, StoredRecord};
use async_trait::async_trait;

/// Trait for record-specific clients to inherit typed persistence.
///
/// # Example
///
/// ```rust
/// use origin_store::{RecordClient, StorageActor, StorageClient, StorageError, StorageScope, StoredRecord};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Theme { dark: bool }
///
/// impl StoredRecord for Theme {
///     const KEY: &'static str = "theme";
///     const SCOPE: StorageScope = StorageScope::Durable;
/// }
///
/// struct ThemeClient { storage: StorageClient }
///
/// impl RecordClient<Theme> for ThemeClient {
///     type Error = StorageError;
///     fn storage(&self) -> &StorageClient { &self.storage }
///     fn map_error(e: StorageError) -> Self::Error { e }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, storage) = StorageActor::new(StorageScope::Durable, 4);
///     tokio::spawn(actor.run());
///     let client = ThemeClient { storage };
///
///     client.save(&Theme { dark: true }).await.unwrap();
///     assert_eq!(client.load().await.unwrap(), Some(Theme { dark: true }));
///     assert!(client.delete().await.unwrap());
///     assert_eq!(client.load().await.unwrap(), None);
/// }
/// ```
#[async_trait]
pub trait RecordClient<T: StoredRecord>: Send + Sync {
    /// The record-specific error type.
    type Error: Send + Sync;

    /// Access the underlying store handle.
    fn storage(&self) -> &StorageClient;

    /// Map store errors to the record-specific error type.
    fn map_error(e: StorageError) -> Self::Error;

    /// Reads and decodes the record; `Ok(None)` when the key is absent.
    #[tracing::instrument(skip(self), fields(key = T::KEY))]
    async fn load(&self) -> Result<Option<T>, Self::Error> {
        check_scope::<T>(self.storage()).map_err(Self::map_error)?;
        let raw = self.storage().get(T::KEY).await.map_err(Self::map_error)?;
        tracing::debug!(found = raw.is_some(), "Loaded");
        raw.map(|raw| T::decode(&raw))
            .transpose()
            .map_err(Self::map_error)
    }

    /// Encodes and writes the record, replacing any previous value.
    #[tracing::instrument(skip(self, record), fields(key = T::KEY))]
    async fn save(&self, record: &T) -> Result<(), Self::Error> {
        check_scope::<T>(self.storage()).map_err(Self::map_error)?;
        let raw = record.encode().map_err(Self::map_error)?;
        tracing::debug!(bytes = raw.len(), "Saving");
        self.storage()
            .set(T::KEY, raw)
            .await
            .map_err(Self::map_error)
    }

    /// Deletes the record, returning whether it existed.
    #[tracing::instrument(skip(self), fields(key = T::KEY))]
    async fn delete(&self) -> Result<bool, Self::Error> {
        check_scope::<T>(self.storage()).map_err(Self::map_error)?;
        self.storage().remove(T::KEY).await.map_err(Self::map_error)
    }
}

fn check_scope<T: StoredRecord>(storage: &StorageClient) -> Result<(), StorageError> {
    if storage.scope() == T::SCOPE {
        Ok(())
    } else {
        Err(StorageError::ScopeMismatch {
            key: T::KEY,
            expected: T::SCOPE,
            actual: storage.scope(),
        })
    }
}
