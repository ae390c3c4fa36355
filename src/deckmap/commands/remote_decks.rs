use crate::commands::{CmdMessage, CmdResult, RemoteDeckRow};
use crate::error::{DeckmapError, Result};
use crate::remote::{NoteClient, RemoteDeck};
use crate::store::{ConfigStore, StorageBackend};
use std::collections::HashSet;

/// Decks Anki knows about, flagged with whether each has a configuration.
pub async fn run<B: StorageBackend, C: NoteClient + ?Sized>(
    store: &ConfigStore<B>,
    client: &C,
) -> Result<CmdResult> {
    let configured: HashSet<i64> = store.list()?.iter().map(|c| c.deck_id).collect();
    let decks = client.deck_names_and_ids().await?;

    let rows: Vec<RemoteDeckRow> = decks
        .into_iter()
        .map(|d| RemoteDeckRow {
            configured: configured.contains(&d.id),
            deck_id: d.id,
            deck_name: d.name,
        })
        .collect();

    let mut result = CmdResult::default();
    let missing = configured
        .iter()
        .filter(|id| !rows.iter().any(|r| r.deck_id == **id))
        .count();
    if missing > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} configured deck(s) no longer exist in Anki",
            missing
        )));
    }
    Ok(result.with_remote_decks(rows))
}

/// Find the Anki deck matching `deck_id` and/or `deck_name` (names compare exactly).
pub async fn resolve_deck<C: NoteClient + ?Sized>(
    client: &C,
    deck_id: Option<i64>,
    deck_name: Option<&str>,
) -> Result<RemoteDeck> {
    if deck_id.is_none() && deck_name.is_none() {
        return Err(DeckmapError::validation(
            "deck",
            "either a deck ID or a deck name is required",
        ));
    }

    let decks = client.deck_names_and_ids().await?;
    decks
        .into_iter()
        .find(|d| {
            deck_id.map_or(true, |id| d.id == id) && deck_name.map_or(true, |n| d.name == n.trim())
        })
        .ok_or_else(|| {
            let wanted = match (deck_id, deck_name) {
                (Some(id), Some(name)) => format!("{} ({})", name, id),
                (Some(id), None) => id.to_string(),
                (None, Some(name)) => name.to_string(),
                (None, None) => String::new(),
            };
            DeckmapError::validation("deck", format!("no deck {} in Anki", wanted))
        })
}
