use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::DeckConfiguration;
use crate::store::{ConfigStore, StorageBackend};

pub fn list<B: StorageBackend>(store: &ConfigStore<B>) -> Result<CmdResult> {
    let configs = store.list()?;
    let mut result = CmdResult::default();
    if configs.is_empty() {
        result.add_message(CmdMessage::info(
            "No deck configurations yet. Add one with `deckmap add` or `deckmap import`.",
        ));
    }
    Ok(result.with_configurations(configs))
}

pub fn add<B: StorageBackend>(
    store: &ConfigStore<B>,
    config: DeckConfiguration,
) -> Result<CmdResult> {
    let existed = store.is_configured(config.deck_id)?;
    let stored = store.add(config)?;

    let mut result = CmdResult::default();
    let verb = if existed { "Updated" } else { "Added" };
    result.add_message(CmdMessage::success(format!(
        "{} deck {} ({})",
        verb, stored.deck_name, stored.deck_id
    )));
    Ok(result.with_configurations(vec![stored]))
}

pub fn remove<B: StorageBackend>(store: &ConfigStore<B>, deck_id: i64) -> Result<CmdResult> {
    let removed = store.get(deck_id)?;
    store.remove(deck_id)?;

    let mut result = CmdResult::default();
    match removed {
        Some(config) => {
            result.add_message(CmdMessage::success(format!(
                "Removed deck {} ({})",
                config.deck_name, config.deck_id
            )));
            Ok(result.with_configurations(vec![config]))
        }
        None => {
            result.add_message(CmdMessage::info(format!(
                "Deck {} is not configured, nothing to remove",
                deck_id
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::{deck, StoreFixture};

    #[test]
    fn list_empty_store_hints_at_setup() {
        let fixture = StoreFixture::new();
        let result = list(&fixture.store).unwrap();
        assert!(result.configurations.is_empty());
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.contains("deckmap import"));
    }

    #[test]
    fn list_returns_persisted_order() {
        let fixture = StoreFixture::new().with_deck(2, "Spanish").with_deck(1, "Japanese");
        let result = list(&fixture.store).unwrap();
        let ids: Vec<_> = result.configurations.iter().map(|c| c.deck_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn add_reports_added_then_updated() {
        let fixture = StoreFixture::new();

        let first = add(&fixture.store, deck(1, "Japanese")).unwrap();
        assert!(first.messages[0].content.starts_with("Added"));

        let second = add(&fixture.store, deck(1, "日本語")).unwrap();
        assert!(second.messages[0].content.starts_with("Updated"));
        assert_eq!(fixture.store.list().unwrap().len(), 1);
    }

    #[test]
    fn add_invalid_config_is_an_error() {
        let fixture = StoreFixture::new();
        let mut config = deck(1, "Japanese");
        config.deck_name = " ".into();
        assert!(add(&fixture.store, config).is_err());
    }

    #[test]
    fn remove_present_and_absent() {
        let fixture = StoreFixture::new().with_deck(1, "Japanese");

        let result = remove(&fixture.store, 1).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(result.configurations[0].deck_name, "Japanese");

        let result = remove(&fixture.store, 1).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Info);
        assert!(result.configurations.is_empty());
    }
}
