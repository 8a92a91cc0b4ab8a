//! Loading arbitrary bytes from the data file never fails and leaves a
//! file that loads cleanly to the same document.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tourismdb::storage::{JsonFileStorage, StorageEngine};
use tourismdb::{LoadOutcome, SyncMode};

fuzz_target!(|data: &[u8]| {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sample_data.json");
    std::fs::write(&path, data).expect("write data file");

    let storage = JsonFileStorage::new(&path, SyncMode::Fast);
    let (doc, _) = storage.load_with_outcome();

    let (reloaded, outcome) = storage.load_with_outcome();
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(reloaded, doc);

    storage.save(&reloaded).expect("save");
    assert_eq!(storage.load(), doc);
});
