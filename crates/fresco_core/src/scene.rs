//! Scene records extracted from narrative chunks.

use serde::{Deserialize, Serialize};

/// One scene of the narrative, as partitioned by the text oracle.
///
/// `start_index`/`end_index` are chunk-relative offsets reported by the
/// oracle; they are informational once global ordering is established. The
/// `id` is reassigned to a global 1-based counter during extraction, after
/// which the scene is immutable.
///
/// All fields default so that a sparsely filled model response still parses;
/// a scene with no usable text is dropped downstream rather than aborting
/// the chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Scene {
    /// Globally unique sequence number, 1-based across all chunks.
    #[serde(default)]
    pub id: u32,
    /// Chunk-relative offset of the scene start.
    #[serde(default)]
    pub start_index: usize,
    /// Chunk-relative offset of the scene end.
    #[serde(default)]
    pub end_index: usize,
    /// Time of day: day, night, twilight, etc.
    #[serde(default)]
    pub time_of_day: String,
    /// Name of the location where the scene takes place.
    #[serde(default)]
    pub location_name: String,
    /// Names of characters present, as written in the text (unresolved).
    #[serde(default)]
    pub characters_present: Vec<String>,
    /// What is happening (e.g. chase, conversation).
    #[serde(default)]
    pub action_description: String,
    /// Detailed visual description for the illustrator.
    #[serde(default)]
    pub visual_description: String,
    /// Mood of the scene: tense, joyful, gloomy, etc.
    #[serde(default)]
    pub mood: String,
    /// Brief summary of the scene events.
    #[serde(default)]
    pub summary: String,
    /// Verbatim source text of the scene.
    #[serde(default)]
    pub original_text_segment: String,
}
