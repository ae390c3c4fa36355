//! # Configuration Schema
//!
//! The shape and constraints of one [`DeckConfiguration`]. The store validates every
//! configuration through [`validate`] before persisting it, and the bulk importer checks
//! raw JSON through [`from_value`], so both paths enforce the same rules:
//!
//! - `deckId` is a positive integer
//! - every string field is non-empty once trimmed (and is stored trimmed)
//! - `noteType` is one of `"Basic"` or `"Basic (and reversed card)"`
//!
//! Violations carry the path of the offending field so a human can fix one field at a time.

use crate::error::DeckmapError;
use crate::model::{DeckConfiguration, DeckNoteType};
use serde_json::{Map, Value};
use std::fmt;

pub const DECK_ID: &str = "deckId";
pub const DECK_NAME: &str = "deckName";
pub const PURPOSE: &str = "purpose";
pub const NOTE_TYPE: &str = "noteType";
pub const FRONT_TEMPLATE: &str = "frontTemplate";
pub const BACK_TEMPLATE: &str = "backTemplate";
pub const FRONT_EXAMPLE: &str = "frontExample";
pub const BACK_EXAMPLE: &str = "backExample";

const REQUIRED: &str = "is required";
const EXPECTED_STRING: &str = "expected a string";
const EXPECTED_INTEGER: &str = "expected an integer";
const EXPECTED_OBJECT: &str = "expected an object";
const EMPTY: &str = "must not be empty";
const NOT_POSITIVE: &str = "must be a positive integer";

/// The first rule a configuration breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: Vec<String>,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    pub fn at(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: vec![key.into()],
            message: message.into(),
        }
    }

    /// Prefix the path with an enclosing segment (e.g. the element's array index).
    pub fn within(mut self, segment: impl ToString) -> Self {
        self.path.insert(0, segment.to_string());
        self
    }

    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

impl From<SchemaViolation> for DeckmapError {
    fn from(violation: SchemaViolation) -> Self {
        DeckmapError::validation(violation.dotted_path(), violation.message)
    }
}

/// Check a typed configuration, returning it with every string field trimmed.
pub fn validate(config: DeckConfiguration) -> Result<DeckConfiguration, SchemaViolation> {
    Ok(DeckConfiguration {
        deck_id: positive_id(config.deck_id)?,
        deck_name: non_empty(DECK_NAME, &config.deck_name)?,
        purpose: non_empty(PURPOSE, &config.purpose)?,
        note_type: config.note_type,
        front_template: non_empty(FRONT_TEMPLATE, &config.front_template)?,
        back_template: non_empty(BACK_TEMPLATE, &config.back_template)?,
        front_example: non_empty(FRONT_EXAMPLE, &config.front_example)?,
        back_example: non_empty(BACK_EXAMPLE, &config.back_example)?,
    })
}

/// Build a configuration from untyped JSON, checking fields in declaration order.
pub fn from_value(value: &Value) -> Result<DeckConfiguration, SchemaViolation> {
    let object = value
        .as_object()
        .ok_or_else(|| SchemaViolation::new(EXPECTED_OBJECT))?;

    Ok(DeckConfiguration {
        deck_id: deck_id_field(object)?,
        deck_name: text_field(object, DECK_NAME)?,
        purpose: text_field(object, PURPOSE)?,
        note_type: note_type_field(object)?,
        front_template: text_field(object, FRONT_TEMPLATE)?,
        back_template: text_field(object, BACK_TEMPLATE)?,
        front_example: text_field(object, FRONT_EXAMPLE)?,
        back_example: text_field(object, BACK_EXAMPLE)?,
    })
}

fn positive_id(id: i64) -> Result<i64, SchemaViolation> {
    if id > 0 {
        Ok(id)
    } else {
        Err(SchemaViolation::at(DECK_ID, NOT_POSITIVE))
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, SchemaViolation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SchemaViolation::at(key, EMPTY));
    }
    Ok(trimmed.to_string())
}

fn deck_id_field(object: &Map<String, Value>) -> Result<i64, SchemaViolation> {
    match object.get(DECK_ID) {
        None => Err(SchemaViolation::at(DECK_ID, REQUIRED)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(id) => positive_id(id),
            None => Err(SchemaViolation::at(DECK_ID, EXPECTED_INTEGER)),
        },
        Some(_) => Err(SchemaViolation::at(DECK_ID, EXPECTED_INTEGER)),
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Result<String, SchemaViolation> {
    match object.get(key) {
        None => Err(SchemaViolation::at(key, REQUIRED)),
        Some(Value::String(s)) => non_empty(key, s),
        Some(_) => Err(SchemaViolation::at(key, EXPECTED_STRING)),
    }
}

fn note_type_field(object: &Map<String, Value>) -> Result<DeckNoteType, SchemaViolation> {
    let expected = || {
        let names: Vec<String> = DeckNoteType::ALL
            .iter()
            .map(|t| format!("\"{}\"", t.model_name()))
            .collect();
        SchemaViolation::at(NOTE_TYPE, format!("expected {}", names.join(" or ")))
    };

    match object.get(NOTE_TYPE) {
        None => Err(SchemaViolation::at(NOTE_TYPE, REQUIRED)),
        Some(Value::String(s)) => DeckNoteType::from_model_name(s).ok_or_else(expected),
        Some(_) => Err(expected()),
    }
}
