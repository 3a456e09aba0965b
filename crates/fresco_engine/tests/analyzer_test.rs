//! Story analysis against a scripted oracle.

mod test_utils;

use fresco_engine::StoryAnalyzer;
use test_utils::MockOracle;

#[tokio::test]
async fn scene_ids_are_global_and_ordered_by_offset() {
    // The oracle returns scenes out of order with arbitrary ids.
    let oracle = MockOracle::new(vec![
        r#"[
          {"id": 9, "start_index": 40, "end_index": 80, "location_name": "Harbor",
           "original_text_segment": "second part"},
          {"id": 2, "start_index": 0, "end_index": 39, "location_name": "Kitchen",
           "original_text_segment": "first part"}
        ]"#,
    ]);
    let analyzer = StoryAnalyzer::new(&oracle);

    let scenes = analyzer.extract_scenes("first part second part").await;

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].id, 1);
    assert_eq!(scenes[0].location_name, "Kitchen");
    assert_eq!(scenes[1].id, 2);
    assert_eq!(scenes[1].location_name, "Harbor");
}

#[tokio::test]
async fn unparsable_chunk_yields_no_scenes() {
    let oracle = MockOracle::new(vec!["I could not find any scenes, sorry."]);
    let analyzer = StoryAnalyzer::new(&oracle);

    let scenes = analyzer.extract_scenes("some text").await;

    assert!(scenes.is_empty());
}

#[tokio::test]
async fn style_is_trimmed_model_output() {
    let oracle = MockOracle::new(vec!["  Ink wash style, muted grays.  \n"]);
    let analyzer = StoryAnalyzer::new(&oracle);

    let style = analyzer
        .extract_style("Rain fell on the rooftops.", "")
        .await
        .expect("style");

    assert_eq!(style, "Ink wash style, muted grays.");
}

#[tokio::test]
async fn entity_extraction_degrades_to_empty() {
    let oracle = MockOracle::new(vec!["no json here", "also no json"]);
    let analyzer = StoryAnalyzer::new(&oracle);

    assert!(analyzer.extract_characters("text").await.is_empty());
    assert!(analyzer.extract_locations("text").await.is_empty());
}
