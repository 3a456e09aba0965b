//! Manifest records: one entry per illustrated scene.

use serde::{Deserialize, Serialize};

/// Location summary embedded in a manifest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LocationRef {
    /// Resolved location id, if the location was matched in the catalog.
    #[serde(default)]
    pub id: Option<u32>,
    /// Location name as written in the scene.
    pub name: String,
}

/// Character summary embedded in a manifest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CharacterRef {
    /// Resolved character id, if the character was matched in the catalog.
    #[serde(default)]
    pub id: Option<u32>,
    /// Character name as written in the scene.
    pub name: String,
    /// Path to the character's full-body card, if generated.
    #[serde(default)]
    pub full_body_path: Option<String>,
}

/// One manifest entry per processed scene.
///
/// Records what was illustrated and with which prompt, enabling auditability
/// and re-generation without re-deriving the prompt. The manifest is kept
/// sorted by `scene_id` on write regardless of processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    /// Global scene id.
    pub scene_id: u32,
    /// Verbatim source text of the scene.
    pub source_text_segment: String,
    /// Filename slug chosen for the illustration.
    pub name: String,
    /// Location the scene was set in.
    pub location: LocationRef,
    /// Characters referenced when composing the illustration.
    pub characters: Vec<CharacterRef>,
    /// Path of the illustration, relative to the output directory.
    pub illustration_path: String,
    /// The exact prompt used, `None` when generation failed or was skipped.
    #[serde(default)]
    pub generation_prompt: Option<String>,
}
