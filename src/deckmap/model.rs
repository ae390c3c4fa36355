use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FIELD_FRONT: &str = "Front";
pub const FIELD_BACK: &str = "Back";
pub const FIELD_TEXT: &str = "Text";
pub const FIELD_EXTRA: &str = "Extra";

/// Note types a deck configuration may declare.
///
/// Only the Basic family is configurable: these are the models every Anki profile ships
/// with and whose front/back templates map onto the configuration's template pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckNoteType {
    #[serde(rename = "Basic")]
    Basic,
    #[serde(rename = "Basic (and reversed card)")]
    BasicReversed,
}

impl DeckNoteType {
    pub const ALL: [DeckNoteType; 2] = [DeckNoteType::Basic, DeckNoteType::BasicReversed];

    pub fn model_name(self) -> &'static str {
        NoteType::from(self).model_name()
    }

    pub fn from_model_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.model_name() == name)
    }
}

impl fmt::Display for DeckNoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_name())
    }
}

impl FromStr for DeckNoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match NoteType::from_str(s)? {
            NoteType::Basic => Ok(DeckNoteType::Basic),
            NoteType::BasicReversed => Ok(DeckNoteType::BasicReversed),
            NoteType::Cloze => Err("Cloze cannot be used as a deck's note type".to_string()),
        }
    }
}

/// Note types accepted when creating a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteType {
    #[serde(rename = "Basic")]
    Basic,
    #[serde(rename = "Basic (and reversed card)")]
    BasicReversed,
    #[serde(rename = "Cloze")]
    Cloze,
}

impl NoteType {
    /// Name of the model (note type) inside Anki.
    pub fn model_name(self) -> &'static str {
        match self {
            NoteType::Basic => "Basic",
            NoteType::BasicReversed => "Basic (and reversed card)",
            NoteType::Cloze => "Cloze",
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            NoteType::Basic | NoteType::BasicReversed => &[FIELD_FRONT, FIELD_BACK],
            NoteType::Cloze => &[FIELD_TEXT],
        }
    }

    /// The field duplicate searches match against.
    pub fn primary_field(self) -> &'static str {
        self.required_fields()[0]
    }
}

impl From<DeckNoteType> for NoteType {
    fn from(value: DeckNoteType) -> Self {
        match value {
            DeckNoteType::Basic => NoteType::Basic,
            DeckNoteType::BasicReversed => NoteType::BasicReversed,
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_name())
    }
}

impl FromStr for NoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "basic" => Ok(NoteType::Basic),
            "basic (and reversed card)" | "basic-reversed" | "reversed" => {
                Ok(NoteType::BasicReversed)
            }
            "cloze" => Ok(NoteType::Cloze),
            _ => Err(format!(
                "Unknown note type \"{}\" (expected Basic, Basic (and reversed card) or Cloze)",
                s
            )),
        }
    }
}

/// How cards for one Anki deck should be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckConfiguration {
    pub deck_id: i64,
    pub deck_name: String,
    pub purpose: String,
    pub note_type: DeckNoteType,
    pub front_template: String,
    pub back_template: String,
    pub front_example: String,
    pub back_example: String,
}

/// Raw input for creating one card. Field names follow Anki's model field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRequest {
    #[serde(rename = "deckId")]
    pub deck_id: i64,
    #[serde(rename = "noteType", default, skip_serializing_if = "Option::is_none")]
    pub note_type: Option<NoteType>,
    #[serde(rename = "Front", default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(rename = "Back", default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(rename = "Text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "Extra", default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    /// Comma-separated tag list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl CardRequest {
    pub fn new(deck_id: i64) -> Self {
        Self {
            deck_id,
            ..Default::default()
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            FIELD_FRONT => self.front.as_deref(),
            FIELD_BACK => self.back.as_deref(),
            FIELD_TEXT => self.text.as_deref(),
            FIELD_EXTRA => self.extra.as_deref(),
            _ => None,
        }
    }
}
