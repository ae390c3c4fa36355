use crate::api::DeckmapApi;
use crate::config::AppConfig;
use crate::error::{DeckmapError, Result};
use crate::remote::anki_connect::AnkiConnectClient;
use crate::store::fs::FsBackend;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

/// Overrides the platform data directory when set.
pub const HOME_ENV: &str = "DECKMAP_HOME";

pub struct DeckmapContext {
    pub api: DeckmapApi<FsBackend, AnkiConnectClient>,
    pub config: AppConfig,
}

/// `$DECKMAP_HOME` when set and non-empty, the platform data directory otherwise.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "deckmap", "deckmap")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| DeckmapError::Config("Could not determine the data directory".into()))
}

pub fn initialize() -> Result<DeckmapContext> {
    let dir = data_dir()?;
    initialize_in(dir)
}

pub fn initialize_in(dir: PathBuf) -> Result<DeckmapContext> {
    let config = AppConfig::load(&dir)?;
    debug!(data_dir = %dir.display(), url = %config.anki_connect_url, "initializing");

    let client = AnkiConnectClient::new(config.anki_connect_url.clone(), config.request_timeout())?;
    let api = DeckmapApi::new(FsBackend::new(dir.clone()), client, dir);

    Ok(DeckmapContext { api, config })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_in_empty_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = initialize_in(dir.path().to_path_buf()).unwrap();
        assert_eq!(ctx.config, AppConfig::default());
        assert_eq!(ctx.api.client().url(), "http://localhost:8765");
        assert!(ctx.api.list_decks().unwrap().configurations.is_empty());
    }

    #[test]
    fn initialize_in_reads_saved_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.set("anki-connect-url", "http://127.0.0.1:9000").unwrap();
        config.save(dir.path()).unwrap();

        let ctx = initialize_in(dir.path().to_path_buf()).unwrap();
        assert_eq!(ctx.api.client().url(), "http://127.0.0.1:9000");
    }
}
