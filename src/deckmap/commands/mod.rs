use crate::config::AppConfig;
use crate::model::DeckConfiguration;
use serde::Serialize;

pub mod card;
pub mod config;
pub mod decks;
pub mod export;
pub mod import;
pub mod remote_decks;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A deck known to Anki, and whether deckmap has a configuration for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDeckRow {
    pub deck_id: i64,
    pub deck_name: String,
    pub configured: bool,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub configurations: Vec<DeckConfiguration>,
    pub remote_decks: Vec<RemoteDeckRow>,
    pub exported: Option<String>,
    pub config: Option<AppConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_configurations(mut self, configs: Vec<DeckConfiguration>) -> Self {
        self.configurations = configs;
        self
    }

    pub fn with_remote_decks(mut self, decks: Vec<RemoteDeckRow>) -> Self {
        self.remote_decks = decks;
        self
    }

    pub fn with_exported(mut self, document: String) -> Self {
        self.exported = Some(document);
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
