//! # Remote Layer
//!
//! Everything that talks to Anki goes through the [`NoteClient`] trait. The card pipeline
//! and the API facade are generic over it, so tests drive them with
//! [`mock::MockClient`] while the binary uses [`anki_connect::AnkiConnectClient`].
//!
//! The launcher ([`launcher`]) starts the Anki application and polls the bridge until it
//! answers. Only the CLI uses it; the pipeline itself only asks [`NoteClient::is_reachable`].

use async_trait::async_trait;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use thiserror::Error;

pub mod anki_connect;
pub mod launcher;

#[cfg(test)]
pub mod mock;

pub type NoteId = u64;

/// AnkiConnect's add-on code, quoted whenever the bridge is missing.
pub const ANKI_CONNECT_CODE: &str = "2055492159";

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("could not reach AnkiConnect: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AnkiConnect rejected {action}: {message}")]
    Api { action: String, message: String },

    #[error("AnkiConnect returned no result for {0}")]
    MissingResult(String),
}

impl RemoteError {
    pub fn api(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            action: action.into(),
            message: message.into(),
        }
    }
}

/// Operations the rest of the crate needs from Anki.
#[async_trait]
pub trait NoteClient: Send + Sync {
    /// Whether the bridge answers at all.
    async fn is_reachable(&self) -> bool;

    /// Ids of notes matching an Anki search query.
    async fn find_duplicate_note_ids(&self, query: &str) -> Result<Vec<NoteId>, RemoteError>;

    async fn fetch_note_fields(&self, ids: &[NoteId]) -> Result<Vec<NoteInfo>, RemoteError>;

    async fn create_note(&self, note: &NewNote) -> Result<NoteId, RemoteError>;

    async fn deck_names_and_ids(&self) -> Result<Vec<RemoteDeck>, RemoteError>;
}

/// A deck as Anki knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteDeck {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: String,
    #[serde(default)]
    pub order: u32,
}

/// An existing note, as returned by `notesInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    pub note_id: NoteId,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl NoteInfo {
    /// Field names and values in the model's field order.
    pub fn ordered_fields(&self) -> Vec<(&str, &str)> {
        let mut fields: Vec<_> = self.fields.iter().collect();
        fields.sort_by(|(a_name, a), (b_name, b)| a.order.cmp(&b.order).then(a_name.cmp(b_name)));
        fields
            .into_iter()
            .map(|(name, field)| (name.as_str(), field.value.as_str()))
            .collect()
    }
}

/// Field name/value pairs in the order they were built. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFields(Vec<(String, String)>);

impl NoteFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NoteFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = NoteFields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl Serialize for NoteFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The `note` parameter of AnkiConnect's `addNote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: NoteFields,
    pub tags: Vec<String>,
}
