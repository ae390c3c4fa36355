use super::{StorageBackend, RECORD_NAME};
use crate::error::{DeckmapError, Result};
use crate::model::DeckConfiguration;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores the configuration record as pretty-printed JSON inside `root`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self) -> PathBuf {
        self.root.join(RECORD_NAME)
    }
}

impl StorageBackend for FsBackend {
    fn load(&self) -> Result<Vec<DeckConfiguration>> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(DeckmapError::Io)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            DeckmapError::Store(format!("{} is not readable: {}", path.display(), e))
        })
    }

    fn save(&self, configs: &[DeckConfiguration]) -> Result<()> {
        let content = serde_json::to_string_pretty(configs)?;
        write_atomic(&self.root, RECORD_NAME, &content)
    }

    fn location(&self) -> PathBuf {
        self.record_path()
    }
}

/// Write `content` to `dir/name` through a uniquely named temp file and a rename, so readers
/// see either the old file or the new one. Creates `dir` when missing.
pub(crate) fn write_atomic(dir: &Path, name: &str, content: &str) -> Result<()> {
    fs::create_dir_all(dir)?;

    let tmp_file = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
    fs::write(&tmp_file, content)?;
    if let Err(e) = fs::rename(&tmp_file, dir.join(name)) {
        let _ = fs::remove_file(&tmp_file);
        return Err(DeckmapError::Io(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the rename fail.
        fs::create_dir(dir.path().join(RECORD_NAME)).unwrap();
        fs::write(dir.path().join(RECORD_NAME).join("keep"), "x").unwrap();

        let err = write_atomic(dir.path(), RECORD_NAME, "[]").unwrap_err();
        assert!(matches!(err, DeckmapError::Io(_)));

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
    }

    #[test]
    fn write_atomic_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        write_atomic(dir.path(), "config.json", "{}").unwrap();
        write_atomic(dir.path(), "config.json", "{\"a\": 1}").unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("config.json")).unwrap(),
            "{\"a\": 1}"
        );
    }
}
