use super::{FieldValue, NewNote, NoteClient, NoteId, NoteInfo, RemoteDeck, RemoteError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scriptable [`NoteClient`] that records every call it receives.
pub struct MockClient {
    unreachable_checks: AtomicUsize,
    reachable: bool,
    duplicates: Result<Vec<NoteId>, String>,
    notes: Result<Vec<NoteInfo>, String>,
    create_result: Result<NoteId, String>,
    decks: Vec<RemoteDeck>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<NewNote>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self {
            unreachable_checks: AtomicUsize::new(0),
            reachable: true,
            duplicates: Ok(Vec::new()),
            notes: Ok(Vec::new()),
            create_result: Ok(1),
            decks: Vec::new(),
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::default()
        }
    }

    /// Report unreachable for the first `checks` reachability probes, then reachable.
    pub fn reachable_after(checks: usize) -> Self {
        Self {
            unreachable_checks: AtomicUsize::new(checks),
            ..Self::default()
        }
    }

    pub fn with_duplicates(mut self, ids: Vec<NoteId>) -> Self {
        self.notes = Ok(ids
            .iter()
            .map(|id| note(*id, &[("Front", "existing"), ("Back", "card")]))
            .collect());
        self.duplicates = Ok(ids);
        self
    }

    pub fn with_notes(mut self, notes: Vec<NoteInfo>) -> Self {
        self.notes = Ok(notes);
        self
    }

    pub fn failing_duplicate_search(mut self, message: &str) -> Self {
        self.duplicates = Err(message.to_string());
        self
    }

    pub fn failing_note_fetch(mut self, message: &str) -> Self {
        self.notes = Err(message.to_string());
        self
    }

    pub fn creating(mut self, id: NoteId) -> Self {
        self.create_result = Ok(id);
        self
    }

    pub fn failing_create(mut self, message: &str) -> Self {
        self.create_result = Err(message.to_string());
        self
    }

    pub fn with_decks(mut self, decks: &[(i64, &str)]) -> Self {
        self.decks = decks
            .iter()
            .map(|(id, name)| RemoteDeck {
                id: *id,
                name: name.to_string(),
            })
            .collect();
        self
    }

    /// Names of the trait methods called, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn created(&self) -> Vec<NewNote> {
        self.created.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call.into());
    }
}

/// A `notesInfo` entry with fields in the given order.
pub fn note(id: NoteId, fields: &[(&str, &str)]) -> NoteInfo {
    NoteInfo {
        note_id: id,
        model_name: "Basic".to_string(),
        tags: Vec::new(),
        fields: fields
            .iter()
            .enumerate()
            .map(|(order, (name, value))| {
                (
                    name.to_string(),
                    FieldValue {
                        value: value.to_string(),
                        order: order as u32,
                    },
                )
            })
            .collect::<HashMap<_, _>>(),
    }
}

#[async_trait]
impl NoteClient for MockClient {
    async fn is_reachable(&self) -> bool {
        self.record("is_reachable");
        let pending = self.unreachable_checks.load(Ordering::SeqCst);
        if pending > 0 {
            self.unreachable_checks.store(pending - 1, Ordering::SeqCst);
            return false;
        }
        self.reachable
    }

    async fn find_duplicate_note_ids(&self, query: &str) -> Result<Vec<NoteId>, RemoteError> {
        self.record(format!("find_duplicate_note_ids:{}", query));
        self.duplicates
            .clone()
            .map_err(|m| RemoteError::api("findNotes", m))
    }

    async fn fetch_note_fields(&self, ids: &[NoteId]) -> Result<Vec<NoteInfo>, RemoteError> {
        self.record(format!("fetch_note_fields:{:?}", ids));
        self.notes
            .clone()
            .map_err(|m| RemoteError::api("notesInfo", m))
    }

    async fn create_note(&self, note: &NewNote) -> Result<NoteId, RemoteError> {
        self.record("create_note");
        self.created.lock().unwrap_or_else(|e| e.into_inner()).push(note.clone());
        self.create_result
            .clone()
            .map_err(|m| RemoteError::api("addNote", m))
    }

    async fn deck_names_and_ids(&self) -> Result<Vec<RemoteDeck>, RemoteError> {
        self.record("deck_names_and_ids");
        Ok(self.decks.clone())
    }
}
