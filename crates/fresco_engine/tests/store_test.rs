//! Asset cache persistence: round-trip, merge, migration.

use fresco_core::{Character, Location};
use fresco_engine::AssetCache;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn open_on_missing_dir_is_empty() {
    let dir = TempDir::new().expect("temp dir");
    let cache = AssetCache::open(dir.path().join("output"));

    assert!(cache.catalog.characters.is_empty());
    assert!(cache.catalog.locations.is_empty());
}

#[test]
fn save_and_reopen_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let mut cache = AssetCache::open(dir.path());

    let mut kevin = Character::new("Kevin", "tall, red scarf");
    kevin.id = Some(1);
    kevin.full_body_path = Some("characters/1_kevin.jpeg".to_string());
    cache.catalog.characters.insert("Kevin".to_string(), kevin);

    let mut harbor = Location::new("Harbor", "old stone harbor");
    harbor.id = Some(1);
    cache.catalog.locations.insert("Harbor".to_string(), harbor);

    cache.save();

    let reopened = AssetCache::open(dir.path());
    let kevin = &reopened.catalog.characters["Kevin"];
    assert_eq!(kevin.id, Some(1));
    assert_eq!(kevin.full_body_path.as_deref(), Some("characters/1_kevin.jpeg"));
    // original_name defaults to the name on save.
    assert_eq!(kevin.original_name.as_deref(), Some("Kevin"));
    assert_eq!(reopened.catalog.locations["Harbor"].id, Some(1));
}

#[test]
fn save_preserves_foreign_document_fields() {
    let dir = TempDir::new().expect("temp dir");
    let data_path = dir.path().join("data.json");
    std::fs::write(
        &data_path,
        r#"{"style_prompt": "watercolor, soft light", "illustrations": [{"scene_id": 1}]}"#,
    )
    .expect("seed document");

    let mut cache = AssetCache::open(dir.path());
    cache
        .catalog
        .characters
        .insert("Anna".to_string(), Character::new("Anna", "blonde braids"));
    cache.save();

    let doc: Value =
        serde_json::from_str(&std::fs::read_to_string(&data_path).expect("read back"))
            .expect("parse back");
    assert_eq!(doc["style_prompt"], "watercolor, soft light");
    assert_eq!(doc["illustrations"][0]["scene_id"], 1);
    assert_eq!(doc["characters"][0]["name"], "Anna");
}

#[test]
fn save_replaces_stale_temp_and_never_shadows_document() {
    let dir = TempDir::new().expect("temp dir");
    // Leftover from an interrupted write: must not be read, must not survive.
    std::fs::write(dir.path().join("data.tmp"), "{\"characters\": [{\"truncat")
        .expect("stale temp");

    let cache = AssetCache::open(dir.path());
    assert!(cache.catalog.characters.is_empty());

    let mut cache = cache;
    cache
        .catalog
        .characters
        .insert("Kevin".to_string(), Character::new("Kevin", "tall, red scarf"));
    cache.save();

    // The write lands in data.json via rename; no temp sibling remains.
    assert!(!dir.path().join("data.tmp").exists());
    let doc: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("data.json")).expect("document"),
    )
    .expect("valid json");
    assert_eq!(doc["characters"][0]["name"], "Kevin");

    let reopened = AssetCache::open(dir.path());
    assert!(reopened.catalog.characters.contains_key("Kevin"));
}

#[test]
fn interrupted_save_keeps_previous_document() {
    let dir = TempDir::new().expect("temp dir");
    let mut cache = AssetCache::open(dir.path());
    cache
        .catalog
        .characters
        .insert("Kevin".to_string(), Character::new("Kevin", "tall, red scarf"));
    cache.save();

    // Simulate a crash after the temp file was written but before the
    // rename: the unified document must still parse with its old contents.
    std::fs::write(dir.path().join("data.tmp"), "garbage {").expect("partial write");

    let reopened = AssetCache::open(dir.path());
    assert!(reopened.catalog.characters.contains_key("Kevin"));
}

#[test]
fn malformed_document_starts_empty() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("data.json"), "not json {").expect("seed document");

    let cache = AssetCache::open(dir.path());
    assert!(cache.catalog.characters.is_empty());
}

#[test]
fn legacy_files_migrate_once() {
    let dir = TempDir::new().expect("temp dir");
    let char_dir = dir.path().join("characters");
    let loc_dir = dir.path().join("locations");
    std::fs::create_dir_all(&char_dir).expect("char dir");
    std::fs::create_dir_all(&loc_dir).expect("loc dir");
    std::fs::write(
        char_dir.join("characters.json"),
        r#"[{"id": 2, "name": "Kevin", "description": "tall, red scarf"}]"#,
    )
    .expect("legacy characters");
    std::fs::write(
        loc_dir.join("locations.json"),
        r#"[{"id": 1, "name": "Harbor", "description": "old stone harbor"}]"#,
    )
    .expect("legacy locations");

    let cache = AssetCache::open(dir.path());
    assert_eq!(cache.catalog.characters["Kevin"].id, Some(2));
    assert_eq!(cache.catalog.locations["Harbor"].id, Some(1));
    // Migration persists the unified document immediately.
    assert!(dir.path().join("data.json").exists());

    // The unified document now wins: legacy files are no longer consulted.
    std::fs::remove_file(char_dir.join("characters.json")).expect("remove legacy");
    let reopened = AssetCache::open(dir.path());
    assert_eq!(reopened.catalog.characters["Kevin"].id, Some(2));
}

#[tokio::test]
async fn write_artifact_creates_parent_dirs() {
    let dir = TempDir::new().expect("temp dir");
    let cache = AssetCache::open(dir.path());
    let target = cache.illustration_dir().join("1_storm.jpeg");

    cache
        .write_artifact(&target, &[1, 2, 3])
        .await
        .expect("artifact write");

    assert_eq!(std::fs::read(&target).expect("read artifact"), vec![1, 2, 3]);
    // No temp file left behind.
    assert!(!target.with_extension("tmp").exists());
}
