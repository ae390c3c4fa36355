//! # Storage Layer
//!
//! Deck configurations live in a single named record: one JSON array of
//! [`DeckConfiguration`] objects. A missing record reads as an empty array.
//!
//! ## Split of Responsibilities
//!
//! - [`StorageBackend`] handles the "how": reading and writing the whole record.
//!   Writes MUST be atomic (write to a temp file, then rename) so a reader never
//!   observes a partially written sequence.
//! - [`ConfigStore`] handles the "what": schema validation, `deckId` uniqueness and
//!   the upsert/remove transforms.
//!
//! Every mutation reads the full sequence, transforms it, and writes the full result back.
//! There is no locking; two concurrent writers race at the last-writer-wins level.
//!
//! ## Implementations
//!
//! - [`fs::FsBackend`]: production backend, `deck-configurations.json` in the data dir.
//! - [`memory::MemBackend`]: in-memory backend for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── deck-configurations.json   # The configuration record
//! └── config.json                # Application settings
//! ```

use crate::error::{DeckmapError, Result};
use crate::model::DeckConfiguration;
use crate::schema;
use std::path::PathBuf;
use tracing::debug;

pub mod fs;
pub mod memory;

pub const RECORD_NAME: &str = "deck-configurations.json";

/// Raw persistence of the configuration record.
pub trait StorageBackend {
    /// Load the full sequence. Absence of the record is an empty sequence.
    fn load(&self) -> Result<Vec<DeckConfiguration>>;

    /// Replace the full sequence. MUST be atomic.
    fn save(&self, configs: &[DeckConfiguration]) -> Result<()>;

    /// Where the record lives (a real path for files, a virtual one otherwise).
    fn location(&self) -> PathBuf;
}

/// Insert `config`, dropping any entry with the same `deckId` first.
pub fn upsert(
    configs: Vec<DeckConfiguration>,
    config: DeckConfiguration,
) -> Vec<DeckConfiguration> {
    let mut next = without(configs, config.deck_id);
    next.push(config);
    next
}

/// The sequence minus the entry for `deck_id`.
pub fn without(configs: Vec<DeckConfiguration>, deck_id: i64) -> Vec<DeckConfiguration> {
    configs.into_iter().filter(|c| c.deck_id != deck_id).collect()
}

/// The keyed collection of deck configurations.
pub struct ConfigStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> ConfigStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Configurations in persisted order.
    pub fn list(&self) -> Result<Vec<DeckConfiguration>> {
        self.backend.load()
    }

    pub fn get(&self, deck_id: i64) -> Result<Option<DeckConfiguration>> {
        Ok(self.list()?.into_iter().find(|c| c.deck_id == deck_id))
    }

    pub fn is_configured(&self, deck_id: i64) -> Result<bool> {
        Ok(self.list()?.iter().any(|c| c.deck_id == deck_id))
    }

    /// Validate and upsert one configuration. Returns the stored (trimmed) value.
    pub fn add(&self, config: DeckConfiguration) -> Result<DeckConfiguration> {
        let config = schema::validate(config)?;
        let current = self.list()?;
        let replaced = current.iter().any(|c| c.deck_id == config.deck_id);
        self.backend.save(&upsert(current, config.clone()))?;
        debug!(deck_id = config.deck_id, replaced, "stored deck configuration");
        Ok(config)
    }

    /// Remove the entry for `deck_id`. Returns whether anything was removed.
    pub fn remove(&self, deck_id: i64) -> Result<bool> {
        let current = self.list()?;
        let before = current.len();
        let next = without(current, deck_id);
        if next.len() == before {
            return Ok(false);
        }
        self.backend.save(&next)?;
        debug!(deck_id, "removed deck configuration");
        Ok(true)
    }

    /// Upsert each configuration in order, keeping unrelated entries.
    /// Nothing is written unless every configuration validates.
    pub fn merge(&self, configs: Vec<DeckConfiguration>) -> Result<Vec<DeckConfiguration>> {
        let validated = validate_all(configs)?;
        let next = validated.iter().cloned().fold(self.list()?, upsert);
        self.backend.save(&next)?;
        Ok(validated)
    }

    /// Replace the whole record. Duplicate ids within `configs` collapse to the last one.
    pub fn replace_all(&self, configs: Vec<DeckConfiguration>) -> Result<Vec<DeckConfiguration>> {
        let validated = validate_all(configs)?;
        let next = validated.iter().cloned().fold(Vec::new(), upsert);
        self.backend.save(&next)?;
        Ok(validated)
    }
}

fn validate_all(configs: Vec<DeckConfiguration>) -> Result<Vec<DeckConfiguration>> {
    configs
        .into_iter()
        .enumerate()
        .map(|(i, c)| schema::validate(c).map_err(|v| DeckmapError::from(v.within(i))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::memory::fixtures::deck;
    use super::memory::MemBackend;
    use super::*;

    fn store() -> ConfigStore<MemBackend> {
        ConfigStore::new(MemBackend::new())
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = store();
        assert!(store.list().unwrap().is_empty());
        assert!(!store.is_configured(1).unwrap());
    }

    #[test]
    fn add_then_list_keeps_all_fields() {
        let store = store();
        let config = deck(1, "Japanese");
        store.add(config.clone()).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed, vec![config]);
        assert!(store.is_configured(1).unwrap());
    }

    #[test]
    fn add_with_same_id_replaces_previous_entry() {
        let store = store();
        store.add(deck(1, "Japanese")).unwrap();
        store.add(deck(2, "Spanish")).unwrap();
        store.add(deck(1, "日本語")).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed.iter().filter(|c| c.deck_id == 1).count(), 1);
        // Replaced entries move to the end
        assert_eq!(listed[1].deck_name, "日本語");
    }

    #[test]
    fn add_rejects_blank_fields_without_persisting() {
        let store = store();
        let mut config = deck(1, "Japanese");
        config.back_template = "  \t".into();

        let err = store.add(config).unwrap_err();
        match err {
            DeckmapError::Validation { field, .. } => assert_eq!(field, "backTemplate"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn add_stores_trimmed_values() {
        let store = store();
        let mut config = deck(1, "Japanese");
        config.purpose = "  kanji  ".into();
        let stored = store.add(config).unwrap();
        assert_eq!(stored.purpose, "kanji");
        assert_eq!(store.get(1).unwrap().unwrap().purpose, "kanji");
    }

    #[test]
    fn remove_is_idempotent() {
        let store = store();
        store.add(deck(1, "Japanese")).unwrap();
        store.add(deck(2, "Spanish")).unwrap();

        assert!(store.remove(1).unwrap());
        let once = store.list().unwrap();
        assert!(!store.remove(1).unwrap());
        assert_eq!(store.list().unwrap(), once);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn remove_absent_id_does_not_write() {
        let store = store();
        store.backend().set_simulate_write_error(true);
        assert!(!store.remove(42).unwrap());
    }

    #[test]
    fn merge_upserts_and_keeps_unrelated_entries() {
        let store = store();
        store.add(deck(1, "Japanese")).unwrap();
        store.add(deck(2, "Spanish")).unwrap();

        store
            .merge(vec![deck(2, "Español"), deck(3, "French")])
            .unwrap();

        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|c| c.deck_name)
            .collect();
        assert_eq!(names, vec!["Japanese", "Español", "French"]);
    }

    #[test]
    fn replace_all_drops_previous_entries() {
        let store = store();
        store.add(deck(1, "Japanese")).unwrap();

        store
            .replace_all(vec![deck(5, "German"), deck(5, "Deutsch")])
            .unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].deck_name, "Deutsch");
    }

    #[test]
    fn merge_is_all_or_nothing() {
        let store = store();
        let mut bad = deck(4, "Broken");
        bad.front_example = String::new();

        let err = store.merge(vec![deck(3, "French"), bad]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid 1.frontExample: must not be empty");
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn write_failure_surfaces_as_error() {
        let store = store();
        store.backend().set_simulate_write_error(true);
        assert!(store.add(deck(1, "Japanese")).is_err());
    }
}
