//! Bulk import of deck configurations from a JSON document.
//!
//! The document is an array of configuration objects in the same shape `export` writes.
//! Validation is fail-fast: the first offending field is reported as
//! `<index>.<field>: <message>` and nothing is written.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::DeckConfiguration;
use crate::schema::{self, SchemaViolation};
use crate::store::{ConfigStore, StorageBackend};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const EXPECTED_ARRAY: &str = "expected an array of deck configurations";
const EXPECTED_NON_EMPTY: &str = "expected at least one deck configuration";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Invalid JSON format")]
    InvalidJson,

    #[error("{0}")]
    Schema(SchemaViolation),
}

impl From<SchemaViolation> for ImportError {
    fn from(violation: SchemaViolation) -> Self {
        ImportError::Schema(violation)
    }
}

/// Parse and check an import document without touching the store.
pub fn validate(raw: &str) -> std::result::Result<Vec<DeckConfiguration>, ImportError> {
    let document: Value = serde_json::from_str(raw).map_err(|_| ImportError::InvalidJson)?;

    let elements = document
        .as_array()
        .ok_or_else(|| SchemaViolation::new(EXPECTED_ARRAY))?;
    if elements.is_empty() {
        return Err(SchemaViolation::new(EXPECTED_NON_EMPTY).into());
    }

    elements
        .iter()
        .enumerate()
        .map(|(i, element)| {
            schema::from_value(element).map_err(|v| ImportError::from(v.within(i)))
        })
        .collect()
}

/// Validate `raw` and write it into the store, merging by `deckId` unless `replace` is set.
pub fn run<B: StorageBackend>(
    store: &ConfigStore<B>,
    raw: &str,
    replace: bool,
) -> Result<CmdResult> {
    let configs = validate(raw)?;
    let count = configs.len();
    debug!(count, replace, "importing deck configurations");

    let imported = if replace {
        store.replace_all(configs)?
    } else {
        store.merge(configs)?
    };

    let mut result = CmdResult::default().with_configurations(imported);
    let noun = if count == 1 {
        "configuration"
    } else {
        "configurations"
    };
    if replace {
        result.add_message(CmdMessage::success(format!(
            "Imported {} deck {}, replacing the previous set",
            count, noun
        )));
    } else {
        result.add_message(CmdMessage::success(format!("Imported {} deck {}", count, noun)));
    }
    Ok(result)
}
