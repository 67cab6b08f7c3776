//! Browser-backed persistence for the session core.

use formdrill_core::KeyValueStore;
use gloo::storage::{LocalStorage, Storage};

/// localStorage adapter for the core's key-value capability.
///
/// Raw string blobs go in and out untouched; the core owns the JSON schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

#[derive(Debug, thiserror::Error)]
pub enum BrowserStoreError {
    #[error("storage access failed: {0}")]
    Access(String),
}

impl KeyValueStore for BrowserStore {
    type Error = BrowserStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| BrowserStoreError::Access(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        LocalStorage::raw().set_item(key, value).map_err(|e| {
            let err = BrowserStoreError::Access(format!("{e:?}"));
            log::warn!("localStorage write for {key} failed: {err}");
            err
        })
    }
}
