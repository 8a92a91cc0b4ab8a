//! Document store integration tests for TourismDB.
//!
//! These tests exercise the JSON file through the public API: creation of
//! the default document, round trips, normalization of hand-edited files
//! and recovery from corrupt content.
//!
//! # Corruption Simulation
//!
//! We corrupt the data file by overwriting it with garbage after the
//! database has been opened. The next load must back it up exactly once
//! and replace it with the default document.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::tempdir;
use tourismdb::storage::schema::{default_document, DATA_PATH_ENV};
use tourismdb::{
    Collection, Config, Document, Item, LoadOutcome, NewReview, SyncMode, TourismDB,
};

/// Helper: open a TourismDB whose data file lives in `dir`.
fn open_db(dir: &Path) -> TourismDB {
    TourismDB::open(Config::with_data_path(data_file(dir))).unwrap()
}

fn data_file(dir: &Path) -> PathBuf {
    dir.join("sample_data.json")
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn backups_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().contains(".corrupt."))
        .collect()
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_missing_file_creates_default_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("sample_data.json");

    let db = TourismDB::open(Config::with_data_path(&path)).unwrap();
    assert!(path.exists(), "open must persist the default document");

    let on_disk = read_json(&path);
    assert_eq!(on_disk["experiences"], on_disk["featured_experiences"]);
    assert_eq!(on_disk["experiences"].as_array().unwrap().len(), 3);
    assert_eq!(on_disk["events"], json!([]));
    assert_eq!(on_disk["trails"], json!([]));
    assert_eq!(on_disk["bookings"], json!([]));
    assert_eq!(on_disk["reviews"], json!({}));

    let (doc, outcome) = db.load_with_outcome();
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(doc, default_document());
}

#[test]
fn test_seed_experiences() {
    let dir = tempdir().unwrap();
    let db = open_db(dir.path());

    let titles: Vec<_> = db
        .list(Collection::Experiences)
        .into_iter()
        .filter_map(|item| item.title)
        .collect();
    assert_eq!(
        titles,
        vec![
            "Netarhat Sunrise Point",
            "Santhal Village Immersion",
            "Hundru Falls Adventure"
        ]
    );
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_save_load_round_trip() {
    let dir = tempdir().unwrap();
    let db = open_db(dir.path());

    let mut doc = db.load();
    doc.events.push(Item::new(10, "Sarhul Festival").with_kind("Festival"));
    doc.trails.push(Item::new(30, "Parasnath Hill Trek"));
    db.save(&doc).unwrap();

    assert_eq!(db.load(), doc);

    // A second handle on the same file sees the same document
    let other = open_db(dir.path());
    assert_eq!(other.load(), doc);
}

#[test]
fn test_sync_modes_all_persist() {
    for mode in [SyncMode::Fast, SyncMode::Normal, SyncMode::Paranoid] {
        let dir = tempdir().unwrap();
        let config = Config {
            sync_mode: mode,
            ..Config::with_data_path(data_file(dir.path()))
        };
        let db = TourismDB::open(config).unwrap();

        let mut doc = db.load();
        doc.trails.push(Item::new(31, "Dassam Falls Walk"));
        db.save(&doc).unwrap();
        assert_eq!(db.load(), doc, "round trip failed for {:?}", mode);
    }
}

// ============================================================================
// Normalization Of Hand-Edited Files
// ============================================================================

#[test]
fn test_legacy_featured_experiences_key() {
    let dir = tempdir().unwrap();
    let path = data_file(dir.path());
    fs::write(
        &path,
        r#"{"featured_experiences": [{"id": 7, "title": "Betla National Park"}]}"#,
    )
    .unwrap();

    let db = open_db(dir.path());
    let doc = db.load();
    assert_eq!(doc.experiences.len(), 1);
    assert_eq!(doc.featured_experiences(), doc.experiences.as_slice());
    assert!(doc.events.is_empty());
    assert!(doc.reviews.is_empty());
}

#[test]
fn test_unknown_keys_survive_writes() {
    let dir = tempdir().unwrap();
    let path = data_file(dir.path());
    fs::write(
        &path,
        r#"{
            "experiences": [{"id": 1, "title": "Netarhat", "rating_badge": "gold"}],
            "site_banner": {"text": "Monsoon offers"},
            "events": "not a list"
        }"#,
    )
    .unwrap();

    let db = open_db(dir.path());
    db.submit_review(1, NewReview::new("Lovely place")).unwrap();

    let on_disk = read_json(&path);
    assert_eq!(on_disk["site_banner"], json!({ "text": "Monsoon offers" }));
    assert_eq!(on_disk["experiences"][0]["rating_badge"], json!("gold"));
    assert_eq!(on_disk["events"], json!([]));
    assert_eq!(on_disk["reviews"]["1"][0]["text"], json!("Lovely place"));
}

#[test]
fn test_empty_object_file_is_not_corrupt() {
    let dir = tempdir().unwrap();
    let path = data_file(dir.path());
    fs::write(&path, "{}").unwrap();

    let db = open_db(dir.path());
    let (doc, outcome) = db.load_with_outcome();
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(doc, Document::new());
    assert!(backups_in(dir.path()).is_empty());
}

// ============================================================================
// Corruption Recovery
// ============================================================================

#[test]
fn test_corrupt_file_is_backed_up_once_and_replaced() {
    let dir = tempdir().unwrap();
    let path = data_file(dir.path());
    let db = open_db(dir.path());

    let garbage = "{\"experiences\": [ this is not json";
    fs::write(&path, garbage).unwrap();

    let (doc, outcome) = db.load_with_outcome();
    assert_eq!(doc, default_document());

    let backups = backups_in(dir.path());
    assert_eq!(backups.len(), 1, "exactly one backup expected");
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), garbage);
    assert_eq!(
        outcome,
        LoadOutcome::Recovered {
            backup: Some(backups[0].clone())
        }
    );

    // The data file is valid again: the next load is a plain load
    let (_, outcome) = db.load_with_outcome();
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(backups_in(dir.path()).len(), 1);
}

#[test]
fn test_corrupt_file_at_open_is_recovered() {
    let dir = tempdir().unwrap();
    let path = data_file(dir.path());
    fs::write(&path, [0xff, 0xfe, 0x00, 0x42]).unwrap();

    let db = open_db(dir.path());
    assert_eq!(backups_in(dir.path()).len(), 1);
    assert_eq!(db.load(), default_document());
    assert_eq!(read_json(&path)["experiences"].as_array().unwrap().len(), 3);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_data_path_from_environment() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("from_env.json");

    std::env::set_var(DATA_PATH_ENV, &path);
    let config = Config::from_env();
    assert_eq!(config.data_path, path);

    std::env::set_var(DATA_PATH_ENV, "relative/site.json");
    let config = Config::from_env();
    assert!(config.data_path.is_absolute());
    assert!(config.data_path.ends_with("relative/site.json"));

    std::env::remove_var(DATA_PATH_ENV);
    let config = Config::from_env();
    assert!(config.data_path.ends_with("data/sample_data.json"));
}
