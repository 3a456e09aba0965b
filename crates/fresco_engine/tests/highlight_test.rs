//! Highlight selection and hallucination filtering.

mod test_utils;

use fresco_engine::select_highlight;
use test_utils::MockOracle;

#[tokio::test]
async fn parses_highlight_and_filters_hallucinated_names() {
    let oracle = MockOracle::new(vec![
        r#"```json
{"highlight_description": "the lantern drops", "image_prompt": "a lantern shattering on wet stone", "active_characters": ["Kevin", "Napoleon"]}
```"#,
    ]);
    let available = vec!["Kevin".to_string(), "Anna".to_string()];

    let highlight = select_highlight(&oracle, "Kevin dropped the lantern.", &available).await;

    assert_eq!(highlight.image_prompt, "a lantern shattering on wet stone");
    // "Napoleon" is not in the scene's known set and is dropped.
    assert_eq!(highlight.active_characters, vec!["Kevin"]);
}

#[tokio::test]
async fn empty_available_list_skips_filtering() {
    let oracle = MockOracle::new(vec![
        r#"{"highlight_description": "d", "image_prompt": "p", "active_characters": ["Stranger"]}"#,
    ]);

    let highlight = select_highlight(&oracle, "A stranger passed by.", &[]).await;

    assert_eq!(highlight.active_characters, vec!["Stranger"]);
}

#[tokio::test]
async fn unparsable_response_degrades_to_full_scene() {
    let oracle = MockOracle::new(vec!["the best moment is probably the duel"]);
    let available = vec!["Kevin".to_string()];

    let highlight = select_highlight(&oracle, "They drew swords at dawn.", &available).await;

    assert_eq!(highlight.image_prompt, "They drew swords at dawn.");
    assert_eq!(highlight.active_characters, available);
    assert!(highlight.highlight_description.contains("Fallback"));
}
