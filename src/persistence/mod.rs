//! High score persistence
//!
//! The only persisted value is a single high score under a fixed key. The
//! store is handed to `ScoreState` explicitly; there is no global.
//! - `MemoryStore`: native builds and tests
//! - `LocalStorageStore`: browser LocalStorage (wasm32 only)

#[cfg(target_arch = "wasm32")]
mod local_storage;
mod memory;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("stored value `{0}` is not a score")]
    Corrupt(String),
    #[error("write rejected: {0}")]
    Write(String),
}

/// Backing store for the high score
pub trait PersistenceStore {
    fn high_score(&self) -> Result<u64, StoreError>;
    fn set_high_score(&mut self, value: u64) -> Result<(), StoreError>;
}

/// Parse a stored score string, tolerating a fractional part
#[cfg(any(target_arch = "wasm32", test))]
pub(crate) fn parse_score(raw: &str) -> Result<u64, StoreError> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<u64>() {
        return Ok(v);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v.floor() as u64),
        _ => Err(StoreError::Corrupt(raw.to_string())),
    }
}
