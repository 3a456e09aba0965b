//! End-to-end pipeline runs against a scripted oracle.

mod test_utils;

use fresco_engine::Pipeline;
use serde_json::Value;
use tempfile::TempDir;
use test_utils::MockOracle;

const STORY: &str = "Kevin stood at the harbor as the storm rolled in. \
     The Hero returned to the harbor at dusk.";

const SCENES_JSON: &str = r#"[
  {
    "id": 1,
    "start_index": 0,
    "end_index": 49,
    "time_of_day": "afternoon",
    "location_name": "Harbor",
    "characters_present": ["Kevin"],
    "action_description": "Kevin watches the storm approach",
    "visual_description": "a lone figure on a stone pier under dark clouds",
    "mood": "ominous",
    "summary": "Storm arrives at the harbor",
    "original_text_segment": "Kevin stood at the harbor as the storm rolled in."
  },
  {
    "id": 2,
    "start_index": 50,
    "end_index": 90,
    "time_of_day": "dusk",
    "location_name": "Harbor",
    "characters_present": ["The Hero"],
    "action_description": "The Hero walks back along the pier",
    "visual_description": "a weary man returning to the harbor at dusk",
    "mood": "melancholic",
    "summary": "The Hero returns",
    "original_text_segment": "The Hero returned to the harbor at dusk."
  }
]"#;

/// Scripted text responses for a full first run over [`STORY`].
fn first_run_oracle() -> MockOracle {
    MockOracle::new(vec![
        // style detection
        "Watercolor style, soft diffuse light, muted coastal palette.",
        // scene extraction (single chunk)
        SCENES_JSON,
        // scene 1: character extraction
        r#"[{"name": "Kevin", "description": "tall, red scarf, tired eyes"}]"#,
        // scene 1: translate "Kevin" for the filename slug
        "Kevin",
        // scene 1: location extraction
        r#"[{"name": "Harbor", "description": "old stone harbor with wooden piers"}]"#,
        // scene 1: translate "Harbor"
        "Harbor",
        // scene 1: illustration filename slug
        "storm arrival",
        // scene 1: highlight selection
        r#"{"highlight_description": "storm hits", "image_prompt": "wind tearing at a red scarf on the pier", "active_characters": ["Kevin"]}"#,
        // scene 2: character extraction ("The Hero" is Kevin under another name)
        r#"[{"name": "The Hero", "description": "tall man with a red scarf"}]"#,
        // scene 2: semantic match verdict
        r#"{"match_id": 1, "reason": "same scarf, same build, same role"}"#,
        // scene 2: location extraction (exact catalog hit, no further calls)
        r#"[{"name": "Harbor", "description": "old stone harbor"}]"#,
        // scene 2: illustration filename slug
        "hero returns",
        // scene 2: highlight selection
        r#"{"highlight_description": "homecoming", "image_prompt": "a silhouette walking the pier at dusk", "active_characters": ["The Hero"]}"#,
    ])
}

#[tokio::test]
async fn full_run_produces_artifacts_and_manifest() {
    let dir = TempDir::new().expect("temp dir");
    let oracle = first_run_oracle();
    let pipeline = Pipeline::new(&oracle);

    let report = pipeline
        .run(STORY, "", dir.path())
        .await
        .expect("pipeline run");

    assert_eq!(*report.scene_count(), 2);
    // Kevin and The Hero share one identity; one location.
    assert_eq!(*report.character_count(), 1);
    assert_eq!(*report.location_count(), 1);
    assert!(report.style_prompt().starts_with("Watercolor"));

    // 3 style templates + 1 character card + 1 location shot + 2 illustrations.
    assert_eq!(oracle.image_call_count(), 7);

    for template in [
        "bg_location_16_9.jpg",
        "bg_fullbody.jpg",
        "style_reference_fullbody.jpg",
    ] {
        assert!(dir.path().join("style_templates").join(template).exists());
    }
    assert!(dir.path().join("characters/1_kevin.jpeg").exists());
    assert!(dir.path().join("locations/1_harbor.jpeg").exists());
    assert!(dir.path().join("illustrations/1_storm_arrival.jpeg").exists());
    assert!(dir.path().join("illustrations/2_hero_returns.jpeg").exists());
    // The alias reuses Kevin's card: no second character file.
    assert_eq!(
        std::fs::read_dir(dir.path().join("characters"))
            .expect("characters dir")
            .count(),
        1
    );

    let doc: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("data.json")).expect("manifest"),
    )
    .expect("manifest json");

    assert!(doc["style_prompt"].as_str().unwrap().starts_with("Watercolor"));

    // Both names are recorded, pointing at the same identity.
    let characters = doc["characters"].as_array().expect("characters");
    assert_eq!(characters.len(), 2);
    assert!(characters.iter().all(|c| c["id"] == 1));

    let illustrations = doc["illustrations"].as_array().expect("illustrations");
    assert_eq!(illustrations.len(), 2);
    assert_eq!(illustrations[0]["scene_id"], 1);
    assert_eq!(illustrations[1]["scene_id"], 2);
    assert_eq!(
        illustrations[0]["illustration_path"],
        "illustrations/1_storm_arrival.jpeg"
    );
    assert_eq!(illustrations[1]["location"]["id"], 1);
    assert_eq!(illustrations[1]["characters"][0]["id"], 1);
    assert!(illustrations[0]["generation_prompt"].as_str().is_some());
}

#[tokio::test]
async fn second_run_skips_all_generation() {
    let dir = TempDir::new().expect("temp dir");
    let pipeline_oracle = first_run_oracle();
    Pipeline::new(&pipeline_oracle)
        .run(STORY, "", dir.path())
        .await
        .expect("first run");

    // Every entity is now an exact catalog hit, and existing illustration
    // files are matched by scene-id prefix, so no slug calls are needed.
    let rerun_oracle = MockOracle::new(vec![
        "Watercolor style, soft diffuse light, muted coastal palette.",
        SCENES_JSON,
        r#"[{"name": "Kevin", "description": "tall, red scarf, tired eyes"}]"#,
        r#"[{"name": "Harbor", "description": "old stone harbor"}]"#,
        r#"[{"name": "The Hero", "description": "tall man with a red scarf"}]"#,
        r#"[{"name": "Harbor", "description": "old stone harbor"}]"#,
    ]);

    let report = Pipeline::new(&rerun_oracle)
        .run(STORY, "", dir.path())
        .await
        .expect("second run");

    assert_eq!(*report.scene_count(), 2);
    // Everything already exists on disk: no image generation at all.
    assert_eq!(rerun_oracle.image_call_count(), 0);
    // And no slug, highlight, or semantic-match calls either.
    assert_eq!(rerun_oracle.text_call_count(), 6);
}

#[tokio::test]
async fn empty_input_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let oracle = MockOracle::new(vec![]);
    let pipeline = Pipeline::new(&oracle);

    let result = pipeline.run("   \n  ", "", dir.path()).await;

    assert!(result.is_err());
    assert_eq!(oracle.text_call_count(), 0);
}

#[tokio::test]
async fn no_scenes_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let oracle = MockOracle::new(vec![
        "Flat vector style.",
        // scene extraction yields an empty list
        "[]",
    ]);
    let pipeline = Pipeline::new(&oracle);

    let result = pipeline.run("Some text.", "", dir.path()).await;

    assert!(result.is_err());
}
