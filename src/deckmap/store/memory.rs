use super::StorageBackend;
use crate::error::{DeckmapError, Result};
use crate::model::DeckConfiguration;
use std::cell::RefCell;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is driven from a single task.
#[derive(Default)]
pub struct MemBackend {
    configs: RefCell<Vec<DeckConfiguration>>,
    simulate_read_error: RefCell<bool>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configs(configs: Vec<DeckConfiguration>) -> Self {
        Self {
            configs: RefCell::new(configs),
            ..Default::default()
        }
    }

    /// Make every `load` fail, as an unreadable record would.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        *self.simulate_read_error.borrow_mut() = simulate;
    }

    /// Make every `save` fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }
}

impl StorageBackend for MemBackend {
    fn load(&self) -> Result<Vec<DeckConfiguration>> {
        if *self.simulate_read_error.borrow() {
            return Err(DeckmapError::Store("Simulated read error".to_string()));
        }
        Ok(self.configs.borrow().clone())
    }

    fn save(&self, configs: &[DeckConfiguration]) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(DeckmapError::Store("Simulated write error".to_string()));
        }
        *self.configs.borrow_mut() = configs.to_vec();
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://deck-configurations")
    }
}

// --- Test Fixtures ---
