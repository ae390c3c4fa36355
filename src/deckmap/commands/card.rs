//! # Card Creation
//!
//! [`run`] takes one [`CardRequest`] through five stages and stops at the first that fails:
//!
//! 1. **Shape**: `deckId` is positive and the note type's required fields are non-blank.
//!    A request without a note type is checked against `Front`/`Back`, the fields every
//!    configurable note type requires.
//! 2. **Connectivity**: the bridge answers [`NoteClient::is_reachable`]. Nothing is read
//!    from the store before this passes.
//! 3. **Configuration**: the deck is configured. The configuration supplies the deck name
//!    and, if the request has none, the note type.
//! 4. **Duplicates**: notes in the deck matching the primary field halt the pipeline with
//!    [`CardOutcome::PossibleDuplicate`]. A failing search never blocks creation.
//! 5. **Creation**: `addNote` with the exact field values of the request.
//!
//! Every path ends in exactly one [`CardOutcome`]; `run` itself never fails.

use crate::commands::MessageLevel;
use crate::error::Result;
use crate::model::{CardRequest, DeckConfiguration, NoteType, FIELD_EXTRA};
use crate::remote::{NewNote, NoteClient, NoteFields, NoteId, ANKI_CONNECT_CODE};
use crate::store::{ConfigStore, StorageBackend};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

const LIST_FIRST: &str = "Run `deckmap list` first to see the configured deck IDs.";

/// An existing note that may be the card being created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCandidate {
    pub note_id: NoteId,
    pub fields: NoteFields,
}

/// Result of the duplicate search, kept apart from the pipeline's outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateCheck {
    Clear,
    Found(Vec<DuplicateCandidate>),
    /// The search could not run. Creation goes ahead.
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CardOutcome {
    ValidationError {
        field: String,
        message: String,
    },
    ConnectivityError {
        message: String,
    },
    NotConfigured {
        message: String,
    },
    UnknownDeck {
        deck_id: i64,
        message: String,
    },
    PossibleDuplicate {
        deck_name: String,
        candidates: Vec<DuplicateCandidate>,
    },
    RemoteError {
        deck_name: String,
        note_type: NoteType,
        message: String,
    },
    Created {
        note_id: NoteId,
        deck_name: String,
        note_type: NoteType,
        fields: NoteFields,
        tags: Vec<String>,
    },
    StorageError {
        message: String,
    },
}

impl CardOutcome {
    fn validation(field: &str, message: impl Into<String>) -> Self {
        CardOutcome::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CardOutcome::ValidationError { .. } => "validationError",
            CardOutcome::ConnectivityError { .. } => "connectivityError",
            CardOutcome::NotConfigured { .. } => "notConfigured",
            CardOutcome::UnknownDeck { .. } => "unknownDeck",
            CardOutcome::PossibleDuplicate { .. } => "possibleDuplicate",
            CardOutcome::RemoteError { .. } => "remoteError",
            CardOutcome::Created { .. } => "created",
            CardOutcome::StorageError { .. } => "storageError",
        }
    }

    /// A possible duplicate is a deliberate stop, not a failure.
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            CardOutcome::Created { .. } | CardOutcome::PossibleDuplicate { .. }
        )
    }

    pub fn level(&self) -> MessageLevel {
        match self {
            CardOutcome::Created { .. } => MessageLevel::Success,
            CardOutcome::PossibleDuplicate { .. } => MessageLevel::Warning,
            _ => MessageLevel::Error,
        }
    }
}

fn write_fields<'a>(
    f: &mut fmt::Formatter<'_>,
    fields: impl Iterator<Item = (&'a str, &'a str)>,
) -> fmt::Result {
    for (name, value) in fields {
        write!(f, "\n  {}: {}", name, value)?;
    }
    Ok(())
}

impl fmt::Display for CardOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardOutcome::ValidationError { message, .. } => {
                write!(f, "Validation error: {}", message)
            }
            CardOutcome::ConnectivityError { message }
            | CardOutcome::NotConfigured { message }
            | CardOutcome::UnknownDeck { message, .. }
            | CardOutcome::RemoteError { message, .. }
            | CardOutcome::StorageError { message } => f.write_str(message),
            CardOutcome::PossibleDuplicate { candidates, .. } => {
                write!(
                    f,
                    "Found {} potentially duplicate card(s):",
                    candidates.len()
                )?;
                for candidate in candidates {
                    write!(f, "\n\nCard ID {}:", candidate.note_id)?;
                    write_fields(f, candidate.fields.iter())?;
                }
                write!(
                    f,
                    "\n\nPlease review these cards in Anki before creating a new one."
                )
            }
            CardOutcome::Created {
                note_id,
                deck_name,
                note_type,
                fields,
                tags,
            } => {
                write!(
                    f,
                    "Card created successfully!\n\nDeck: {}\nNote Type: {}\nNote ID: {}\n\nFields:",
                    deck_name, note_type, note_id
                )?;
                write_fields(f, fields.iter())?;
                if !tags.is_empty() {
                    write!(f, "\n\nTags: {}", tags.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// What a request would create, for confirmation before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPreview {
    /// The configured deck name, or `Deck ID <n>` when the deck is not configured.
    pub deck: String,
    pub note_type: NoteType,
    pub fields: NoteFields,
    pub tags: Vec<String>,
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Anki search query for notes in `deck_name` containing `value` as a literal phrase.
pub fn duplicate_query(deck_name: &str, value: &str) -> String {
    format!(
        "deck:\"{}\" \"{}\"",
        escape_search(deck_name, &['"', '\\', '*', '_']),
        escape_search(value, &['"', '\\', '*', '_', ':'])
    )
}

/// Backslash-escape the characters Anki's search parser would otherwise interpret.
fn escape_search(text: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// The field map sent to Anki: the note type's fields plus `Extra` when it has content.
/// Blank or missing required fields are skipped; shape validation rejects them earlier.
fn note_fields(request: &CardRequest, note_type: NoteType) -> NoteFields {
    let mut fields = NoteFields::new();
    for name in note_type.required_fields() {
        if let Some(value) = request.field(name).filter(|v| !v.trim().is_empty()) {
            fields.insert(*name, value);
        }
    }
    if let Some(extra) = request.extra.as_deref().filter(|v| !v.trim().is_empty()) {
        fields.insert(FIELD_EXTRA, extra);
    }
    fields
}

/// Stage 1 on its own, for callers that want to reject a request before doing anything else.
pub fn validate_shape(request: &CardRequest) -> std::result::Result<(), CardOutcome> {
    if request.deck_id <= 0 {
        return Err(CardOutcome::validation(
            "deckId",
            format!("Invalid deck ID {}. {}", request.deck_id, LIST_FIRST),
        ));
    }

    let note_type = request.note_type.unwrap_or(NoteType::Basic);
    for field in note_type.required_fields() {
        let present = request
            .field(field)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);
        if !present {
            let kind = match note_type {
                NoteType::Cloze => "Cloze",
                _ => "Basic",
            };
            let mut message = format!("{} field is required for {} cards.", field, kind);
            if note_type == NoteType::Cloze {
                message.push_str(
                    " Example: \"{{c1::Paris}} is the capital of {{c2::France}}\".",
                );
            }
            message.push(' ');
            message.push_str(LIST_FIRST);
            return Err(CardOutcome::validation(field, message));
        }
    }
    Ok(())
}

fn connectivity_error() -> CardOutcome {
    CardOutcome::ConnectivityError {
        message: format!(
            "Cannot connect to Anki. Please make sure:\n1. Anki is running\n2. AnkiConnect plugin is installed (code: {})",
            ANKI_CONNECT_CODE
        ),
    }
}

fn resolve<B: StorageBackend>(
    store: &ConfigStore<B>,
    deck_id: i64,
) -> std::result::Result<DeckConfiguration, CardOutcome> {
    let configs = store.list().map_err(|e| CardOutcome::StorageError {
        message: format!("Could not read deck configurations: {}", e),
    })?;

    if configs.is_empty() {
        return Err(CardOutcome::NotConfigured {
            message: "No deck configurations yet. Run `deckmap add` or `deckmap import` to set up your decks first.".to_string(),
        });
    }

    configs
        .into_iter()
        .find(|c| c.deck_id == deck_id)
        .ok_or_else(|| CardOutcome::UnknownDeck {
            deck_id,
            message: format!("Deck ID {} is not configured. {}", deck_id, LIST_FIRST),
        })
}

/// Search for existing notes in the deck whose content matches the primary field.
pub async fn check_duplicates<C: NoteClient + ?Sized>(
    client: &C,
    deck_name: &str,
    primary_value: &str,
) -> DuplicateCheck {
    let query = duplicate_query(deck_name, primary_value);
    let ids = match client.find_duplicate_note_ids(&query).await {
        Ok(ids) => ids,
        Err(e) => return DuplicateCheck::Unavailable(e.to_string()),
    };
    if ids.is_empty() {
        return DuplicateCheck::Clear;
    }

    match client.fetch_note_fields(&ids).await {
        Ok(notes) => DuplicateCheck::Found(
            notes
                .iter()
                .map(|note| DuplicateCandidate {
                    note_id: note.note_id,
                    fields: note.ordered_fields().into_iter().collect(),
                })
                .collect(),
        ),
        Err(e) => DuplicateCheck::Unavailable(e.to_string()),
    }
}

#[instrument(skip_all, fields(deck_id = request.deck_id))]
pub async fn run<B: StorageBackend, C: NoteClient + ?Sized>(
    store: &ConfigStore<B>,
    client: &C,
    request: &CardRequest,
) -> CardOutcome {
    if let Err(outcome) = validate_shape(request) {
        debug!(kind = outcome.kind(), "request rejected");
        return outcome;
    }

    if !client.is_reachable().await {
        return connectivity_error();
    }

    let config = match resolve(store, request.deck_id) {
        Ok(config) => config,
        Err(outcome) => return outcome,
    };

    let note_type = request
        .note_type
        .unwrap_or_else(|| NoteType::from(config.note_type));
    let fields = note_fields(request, note_type);
    let tags = parse_tags(request.tags.as_deref());

    let primary = fields.get(note_type.primary_field()).unwrap_or_default();
    match check_duplicates(client, &config.deck_name, primary).await {
        DuplicateCheck::Found(candidates) => {
            info!(count = candidates.len(), "possible duplicates, not creating");
            return CardOutcome::PossibleDuplicate {
                deck_name: config.deck_name,
                candidates,
            };
        }
        DuplicateCheck::Unavailable(reason) => {
            warn!(%reason, "duplicate check failed, creating anyway");
        }
        DuplicateCheck::Clear => debug!("no duplicates"),
    }

    let note = NewNote {
        deck_name: config.deck_name.clone(),
        model_name: note_type.model_name().to_string(),
        fields,
        tags,
    };

    match client.create_note(&note).await {
        Ok(note_id) => {
            info!(note_id, deck = %note.deck_name, "card created");
            CardOutcome::Created {
                note_id,
                deck_name: note.deck_name,
                note_type,
                fields: note.fields,
                tags: note.tags,
            }
        }
        Err(e) => CardOutcome::RemoteError {
            message: format!(
                "Failed to create card: {}\n\nPlease check:\n1. The note type \"{}\" exists in Anki\n2. All required fields are provided\n3. The deck \"{}\" exists",
                e, note_type, note.deck_name
            ),
            deck_name: note.deck_name,
            note_type,
        },
    }
}

/// The card `run` would create, resolved against the store only.
pub fn preview<B: StorageBackend>(
    store: &ConfigStore<B>,
    request: &CardRequest,
) -> Result<CardPreview> {
    let config = store.get(request.deck_id)?;
    let note_type = request
        .note_type
        .or_else(|| config.as_ref().map(|c| NoteType::from(c.note_type)))
        .unwrap_or(NoteType::Basic);

    Ok(CardPreview {
        deck: config
            .map(|c| c.deck_name)
            .unwrap_or_else(|| format!("Deck ID {}", request.deck_id)),
        note_type,
        fields: note_fields(request, note_type),
        tags: parse_tags(request.tags.as_deref()),
    })
}
