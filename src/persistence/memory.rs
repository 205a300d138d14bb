use std::cell::Cell;
use std::rc::Rc;

use super::{PersistenceStore, StoreError};

/// In-process store. Clones share the same value, so a test can keep a
/// handle and observe what the game wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<u64>>,
    writes: Rc<Cell<u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_score(value: u64) -> Self {
        let store = Self::default();
        store.value.set(value);
        store
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl PersistenceStore for MemoryStore {
    fn high_score(&self) -> Result<u64, StoreError> {
        Ok(self.value.get())
    }

    fn set_high_score(&mut self, value: u64) -> Result<(), StoreError> {
        self.value.set(value);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
