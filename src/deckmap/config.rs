//! # Configuration
//!
//! Settings live in `config.json` next to the configuration record. Missing keys fall back
//! to their defaults, so an absent or partial file is always valid.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `anki-connect-url` | `http://localhost:8765` | Where AnkiConnect listens |
//! | `request-timeout-secs` | `5` | Per-request HTTP timeout |
//! | `auto-launch` | `true` | Start Anki when the bridge does not answer |
//! | `launch-command` | platform default | Shell command that starts Anki |
//! | `launch-timeout-secs` | `30` | How long to wait for the bridge after launching |
//! | `poll-interval-ms` | `1000` | Delay between bridge probes while waiting |

use crate::error::{DeckmapError, Result};
use crate::remote::anki_connect::DEFAULT_URL;
use crate::remote::launcher::LaunchSettings;
use crate::store::fs::write_atomic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";

pub const KEYS: [&str; 6] = [
    "anki-connect-url",
    "request-timeout-secs",
    "auto-launch",
    "launch-command",
    "launch-timeout-secs",
    "poll-interval-ms",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_url")]
    pub anki_connect_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_auto_launch")]
    pub auto_launch: bool,

    /// Overrides the platform's launch command when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_command: Option<String>,

    #[serde(default = "default_launch_timeout")]
    pub launch_timeout_secs: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_request_timeout() -> u64 {
    5
}

fn default_auto_launch() -> bool {
    true
}

fn default_launch_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            anki_connect_url: default_url(),
            request_timeout_secs: default_request_timeout(),
            auto_launch: default_auto_launch(),
            launch_command: None,
            launch_timeout_secs: default_launch_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl AppConfig {
    /// Settings stored in `dir`. A missing file means all defaults; a file that does not
    /// parse is a `Config` error naming the file.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map_err(|e| DeckmapError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Persist to `dir` with the same temp-file-then-rename write as the configuration record.
    pub fn save(&self, dir: &Path) -> Result<()> {
        write_atomic(dir, CONFIG_FILENAME, &serde_json::to_string_pretty(self)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn launch_settings(&self) -> LaunchSettings {
        LaunchSettings {
            command: self.launch_command.clone(),
            timeout: Duration::from_secs(self.launch_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// Value of a key for display. `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "anki-connect-url" => Some(self.anki_connect_url.clone()),
            "request-timeout-secs" => Some(self.request_timeout_secs.to_string()),
            "auto-launch" => Some(self.auto_launch.to_string()),
            "launch-command" => Some(
                self.launch_command
                    .clone()
                    .unwrap_or_else(|| "(platform default)".to_string()),
            ),
            "launch-timeout-secs" => Some(self.launch_timeout_secs.to_string()),
            "poll-interval-ms" => Some(self.poll_interval_ms.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "anki-connect-url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(format!("anki-connect-url must be an http(s) URL: {}", value));
                }
                self.anki_connect_url = value.trim_end_matches('/').to_string();
            }
            "request-timeout-secs" => self.request_timeout_secs = parse_positive(key, value)?,
            "auto-launch" => {
                self.auto_launch = value
                    .parse()
                    .map_err(|_| format!("auto-launch must be true or false: {}", value))?
            }
            "launch-command" => {
                self.launch_command = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "launch-timeout-secs" => self.launch_timeout_secs = parse_positive(key, value)?,
            "poll-interval-ms" => self.poll_interval_ms = parse_positive(key, value)?,
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> std::result::Result<u64, String> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{} must be a positive whole number: {}", key, value)),
    }
}
