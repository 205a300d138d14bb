use web_sys::Storage;

use super::{PersistenceStore, StoreError, parse_score};
use crate::consts::HIGH_SCORE_KEY;

/// Browser LocalStorage under the fixed high score key
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - high score will not persist");
        }
        Self { storage }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistenceStore for LocalStorageStore {
    fn high_score(&self) -> Result<u64, StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        match storage.get_item(HIGH_SCORE_KEY) {
            Ok(Some(raw)) => parse_score(&raw),
            Ok(None) => Ok(0),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn set_high_score(&mut self, value: u64) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(HIGH_SCORE_KEY, &value.to_string())
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }
}
