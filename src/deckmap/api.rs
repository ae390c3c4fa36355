//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single entry point
//! for every deckmap operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Owns** the store, the Anki client and the data directory
//! - **Returns structured types** (`Result<CmdResult>`, [`CardOutcome`])
//!
//! It does no business logic, no terminal I/O and no formatting.
//!
//! ## Generic Over Backends
//!
//! `DeckmapApi<B: StorageBackend, C: NoteClient>`:
//! - Production: `DeckmapApi<FsBackend, AnkiConnectClient>`
//! - Testing: `DeckmapApi<MemBackend, MockClient>`
//!
//! API tests check dispatch and argument passing only; the command modules test the logic.

use crate::commands;
use crate::error::Result;
use crate::model::{CardRequest, DeckConfiguration};
use crate::remote::{NoteClient, RemoteDeck};
use crate::store::{ConfigStore, StorageBackend};
use std::path::{Path, PathBuf};

pub struct DeckmapApi<B: StorageBackend, C: NoteClient> {
    store: ConfigStore<B>,
    client: C,
    data_dir: PathBuf,
}

impl<B: StorageBackend, C: NoteClient> DeckmapApi<B, C> {
    pub fn new(backend: B, client: C, data_dir: PathBuf) -> Self {
        Self {
            store: ConfigStore::new(backend),
            client,
            data_dir,
        }
    }

    pub fn list_decks(&self) -> Result<commands::CmdResult> {
        commands::decks::list(&self.store)
    }

    pub fn add_deck(&self, config: DeckConfiguration) -> Result<commands::CmdResult> {
        commands::decks::add(&self.store, config)
    }

    pub fn remove_deck(&self, deck_id: i64) -> Result<commands::CmdResult> {
        commands::decks::remove(&self.store, deck_id)
    }

    pub fn import_decks(&self, raw: &str, replace: bool) -> Result<commands::CmdResult> {
        commands::import::run(&self.store, raw, replace)
    }

    pub fn export_decks(&self) -> Result<commands::CmdResult> {
        commands::export::run(&self.store)
    }

    pub async fn remote_decks(&self) -> Result<commands::CmdResult> {
        commands::remote_decks::run(&self.store, &self.client).await
    }

    pub async fn resolve_deck(
        &self,
        deck_id: Option<i64>,
        deck_name: Option<&str>,
    ) -> Result<RemoteDeck> {
        commands::remote_decks::resolve_deck(&self.client, deck_id, deck_name).await
    }

    pub async fn create_card(&self, request: &CardRequest) -> CardOutcome {
        commands::card::run(&self.store, &self.client, request).await
    }

    /// The validation outcome a request would end in, if any. Touches neither store nor client.
    pub fn check_card(&self, request: &CardRequest) -> Option<CardOutcome> {
        commands::card::validate_shape(request).err()
    }

    pub fn preview_card(&self, request: &CardRequest) -> Result<CardPreview> {
        commands::card::preview(&self.store, request)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.data_dir, action)
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &ConfigStore<B> {
        &self.store
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

pub use crate::commands::card::{CardOutcome, CardPreview};
pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel, RemoteDeckRow};
