use super::{NewNote, NoteClient, NoteId, NoteInfo, RemoteDeck, RemoteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_URL: &str = "http://localhost:8765";
pub const API_VERSION: u8 = 6;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A non-null `error` wins over any `result`.
    pub fn into_result(self, action: &str) -> Result<T, RemoteError> {
        if let Some(message) = self.error {
            return Err(RemoteError::api(action, message));
        }
        self.result
            .ok_or_else(|| RemoteError::MissingResult(action.to_string()))
    }
}

/// The JSON envelope AnkiConnect expects for one action.
pub fn request_body(action: &str, params: Option<Value>) -> Value {
    let mut body = serde_json::Map::new();
    body.insert("action".to_string(), Value::String(action.to_string()));
    body.insert("version".to_string(), Value::Number(API_VERSION.into()));

    if let Some(params) = params {
        body.insert("params".to_string(), params);
    }

    Value::Object(body)
}

/// [`NoteClient`] over AnkiConnect's HTTP JSON API.
pub struct AnkiConnectClient {
    http: Client,
    url: String,
}

impl AnkiConnectClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Option<Value>,
    ) -> Result<T, RemoteError> {
        let body = request_body(action, params);
        debug!(action, url = %self.url, "AnkiConnect request");

        let response: ApiResponse<T> = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        response.into_result(action)
    }

    pub async fn version(&self) -> Result<u32, RemoteError> {
        self.invoke("version", None).await
    }
}

#[async_trait]
impl NoteClient for AnkiConnectClient {
    async fn is_reachable(&self) -> bool {
        match self.version().await {
            Ok(version) => {
                debug!(version, "AnkiConnect is online");
                true
            }
            Err(err) => {
                debug!(error = %err, "AnkiConnect is not reachable");
                false
            }
        }
    }

    #[instrument(skip(self))]
    async fn find_duplicate_note_ids(&self, query: &str) -> Result<Vec<NoteId>, RemoteError> {
        self.invoke("findNotes", Some(json!({ "query": query })))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_note_fields(&self, ids: &[NoteId]) -> Result<Vec<NoteInfo>, RemoteError> {
        self.invoke("notesInfo", Some(json!({ "notes": ids })))
            .await
    }

    #[instrument(skip(self, note), fields(deck = %note.deck_name, model = %note.model_name))]
    async fn create_note(&self, note: &NewNote) -> Result<NoteId, RemoteError> {
        self.invoke("addNote", Some(json!({ "note": note }))).await
    }

    async fn deck_names_and_ids(&self) -> Result<Vec<RemoteDeck>, RemoteError> {
        let decks: HashMap<String, i64> = self.invoke("deckNamesAndIds", None).await?;
        let mut decks: Vec<RemoteDeck> = decks
            .into_iter()
            .map(|(name, id)| RemoteDeck { id, name })
            .collect();
        decks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(decks)
    }
}
