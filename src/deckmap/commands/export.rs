use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{ConfigStore, StorageBackend};

/// Render the store as an import document.
pub fn run<B: StorageBackend>(store: &ConfigStore<B>) -> Result<CmdResult> {
    let configs = store.list()?;
    let document = serde_json::to_string_pretty(&configs)?;

    let mut result = CmdResult::default();
    if configs.is_empty() {
        result.add_message(CmdMessage::warning(
            "No deck configurations to export; the document cannot be imported as is.",
        ));
    }
    Ok(result.with_configurations(configs).with_exported(document))
}
