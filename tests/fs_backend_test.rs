use deckmap::model::{DeckConfiguration, DeckNoteType};
use deckmap::store::fs::FsBackend;
use deckmap::store::{ConfigStore, StorageBackend, RECORD_NAME};
use std::fs;
use tempfile::TempDir;

fn config(deck_id: i64, deck_name: &str) -> DeckConfiguration {
    DeckConfiguration {
        deck_id,
        deck_name: deck_name.to_string(),
        purpose: "Vocabulary".to_string(),
        note_type: DeckNoteType::Basic,
        front_template: "Word".to_string(),
        back_template: "Meaning".to_string(),
        front_example: "猫".to_string(),
        back_example: "cat".to_string(),
    }
}

#[test]
fn missing_record_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    let backend = FsBackend::new(temp.path().join("not-created-yet"));
    assert!(backend.load().unwrap().is_empty());
}

#[test]
fn save_creates_dir_and_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("data");
    let store = ConfigStore::new(FsBackend::new(root.clone()));

    store.add(config(1, "Japanese")).unwrap();
    store.add(config(2, "Spanish")).unwrap();
    store.remove(1).unwrap();

    let entries: Vec<String> = fs::read_dir(&root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec![RECORD_NAME.to_string()]);

    let reopened = ConfigStore::new(FsBackend::new(root));
    let listed = reopened.list().unwrap();
    assert_eq!(listed, vec![config(2, "Spanish")]);
}

#[test]
fn record_is_a_camel_case_json_array() {
    let temp = TempDir::new().unwrap();
    let backend = FsBackend::new(temp.path().to_path_buf());
    backend.save(&[config(7, "German")]).unwrap();

    let raw = fs::read_to_string(backend.location()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["deckId"], 7);
    assert_eq!(value[0]["noteType"], "Basic");
}

#[test]
fn corrupt_record_is_a_store_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(RECORD_NAME), "[{\"deckId\": ").unwrap();

    let backend = FsBackend::new(temp.path().to_path_buf());
    let err = backend.load().unwrap_err();
    assert!(err.to_string().contains("is not readable"));
}

#[test]
fn blank_record_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(RECORD_NAME), "  \n").unwrap();

    let backend = FsBackend::new(temp.path().to_path_buf());
    assert!(backend.load().unwrap().is_empty());
}
