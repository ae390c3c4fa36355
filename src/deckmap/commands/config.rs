//! `deckmap config`: read or change the settings in `config.json`.
//!
//! Problems with the key or value come back as error messages, not `Err`, so the CLI
//! prints them like any other result. Only I/O and unreadable files are errors.

use crate::commands::{CmdMessage, CmdResult};
use crate::config::AppConfig;
use crate::error::Result;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(data_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = AppConfig::load(data_dir)?;
    let message = match action {
        ConfigAction::ShowAll => return Ok(CmdResult::default().with_config(config)),
        ConfigAction::ShowKey(key) => config
            .get(&key)
            .map(CmdMessage::info)
            .unwrap_or_else(|| unknown_key(&key)),
        ConfigAction::Set(key, value) => match config.set(&key, &value) {
            Err(reason) => CmdMessage::error(reason),
            Ok(()) => {
                config.save(data_dir)?;
                debug!(key = %key, "saved setting");
                let shown = config.get(&key).unwrap_or(value);
                CmdMessage::success(format!("{} set to {}", key, shown))
            }
        },
    };

    let mut result = CmdResult::default().with_config(config);
    result.add_message(message);
    Ok(result)
}

fn unknown_key(key: &str) -> CmdMessage {
    CmdMessage::error(format!("Unknown config key: {}", key))
}
