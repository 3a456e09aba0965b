//! Story analysis: style detection, scene extraction, entity sheets.

use fresco_core::{Character, Location, Scene};
use fresco_error::FrescoResult;
use fresco_oracle::TextOracle;
use tracing::{info, warn};

use crate::extraction::parse_json;
use crate::segment::segment;

/// Default chunk size for scene analysis, large enough for semantic context.
const CHUNK_SIZE: usize = 50_000;
/// Boundary search window when cutting chunks.
const CHUNK_OVERLAP: usize = 1_000;
/// How much of the text the style analysis samples.
const STYLE_SAMPLE_LEN: usize = 5_000;

/// Converts narrative text into structured scenes and entity sheets via the
/// text oracle.
///
/// Chunk-local scene numbering from the oracle is reconciled into a single
/// global 1-based ordering; a chunk whose oracle call or parse fails loses
/// its scenes but never aborts the document.
pub struct StoryAnalyzer<'o, O: TextOracle> {
    oracle: &'o O,
}

impl<'o, O: TextOracle> StoryAnalyzer<'o, O> {
    /// Create an analyzer over the given text oracle.
    pub fn new(oracle: &'o O) -> Self {
        Self { oracle }
    }

    /// Determine the visual art style for the document.
    ///
    /// Samples the opening of the text and acts as an art director,
    /// folding in optional user preferences.
    pub async fn extract_style(&self, text: &str, user_style_hint: &str) -> FrescoResult<String> {
        let mut sample_end = STYLE_SAMPLE_LEN.min(text.len());
        while !text.is_char_boundary(sample_end) {
            sample_end -= 1;
        }
        let sample = &text[..sample_end];

        let prompt = format!(
            "Role: Art Director.\n\
             Analyze the following text from a story and determine the most appropriate \
             visual art style for illustrations. Consider the tone, genre, and setting.\n\n\
             Text sample:\n\"{sample}...\"\n\n\
             User preferences (if any): {user_style_hint}\n\n\
             Output a detailed style description string. \
             Focus on medium, lighting, color palette, and mood.\n\
             Example output: \"Graphic novel style, high contrast, chiaroscuro lighting, \
             black and white with red accents, sharp ink lines, dramatic shadows, \
             gritty texture.\""
        );

        let style = self.oracle.generate_text(&prompt).await?;
        Ok(style.trim().to_string())
    }

    /// Split the full text into an ordered sequence of scenes.
    ///
    /// The text is chunked on safe boundaries first, then each chunk is
    /// partitioned into scenes by the oracle. Scene ids are reassigned to a
    /// strictly increasing global counter starting at 1; the oracle's own
    /// ids are discarded, since they are meaningless across chunks.
    pub async fn extract_scenes(&self, text: &str) -> Vec<Scene> {
        let chunks = segment(text, CHUNK_SIZE, CHUNK_OVERLAP);

        let mut all_scenes = Vec::new();
        let mut scene_counter = 1u32;

        for (chunk_idx, chunk) in chunks.iter().enumerate() {
            info!(
                chunk = chunk_idx + 1,
                total = chunks.len(),
                "Analyzing chunk for scenes"
            );

            let prompt = format!(
                "Analyze the following text and split it into logical Scenes.\n\
                 A new scene starts when there is a change in:\n\
                 1. Time (e.g., day to night, later that day)\n\
                 2. Location (e.g., moving from indoors to outdoors)\n\
                 3. Major Action (e.g., conversation ends, chase begins)\n\n\
                 Return ONLY a JSON list of scene objects with these keys:\n\
                 \"id\" (sequence number), \"start_index\" and \"end_index\" \
                 (character offsets relative to the provided text), \"time_of_day\", \
                 \"location_name\", \"characters_present\" (list of names as written), \
                 \"action_description\", \"visual_description\", \"mood\", \"summary\", \
                 \"original_text_segment\" (the exact text of the scene).\n\
                 Text:\n{chunk}"
            );

            let response = match self.oracle.generate_text(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(chunk = chunk_idx + 1, error = %e, "Scene extraction failed for chunk, skipping");
                    continue;
                }
            };

            let mut scenes: Vec<Scene> = match parse_json(&response) {
                Ok(scenes) => scenes,
                Err(e) => {
                    warn!(chunk = chunk_idx + 1, error = %e, "Could not parse scene list, skipping chunk");
                    continue;
                }
            };

            // The oracle does not guarantee in-order delivery within a chunk.
            scenes.sort_by_key(|s| s.start_index);

            for mut scene in scenes {
                scene.id = scene_counter;
                scene_counter += 1;
                all_scenes.push(scene);
            }
        }

        all_scenes
    }

    /// Extract character sheets (visual descriptions) from a text segment.
    ///
    /// Parse or oracle failures yield an empty list: a scene with no
    /// recognized characters still gets illustrated.
    pub async fn extract_characters(&self, text: &str) -> Vec<Character> {
        let prompt = format!(
            "Analyze the text and identify key characters.\n\
             Create a Visual Portrait for each.\n\
             Focus on: Hair color/style, Eye color, Clothing, Body type, Age, \
             Distinctive features (scars, glasses).\n\
             Ignore abstract personality traits. Focus ONLY on visual traits.\n\
             Return ONLY a JSON list of objects with keys \"name\" and \"description\".\n\
             Text:\n{text}"
        );

        match self.oracle.generate_text(&prompt).await {
            Ok(response) => match parse_json::<Vec<Character>>(&response) {
                Ok(characters) => characters,
                Err(e) => {
                    warn!(error = %e, "Could not parse character list");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "Character extraction failed");
                Vec::new()
            }
        }
    }

    /// Extract location sheets from a text segment.
    pub async fn extract_locations(&self, text: &str) -> Vec<Location> {
        let prompt = format!(
            "Identify main locations in the text.\n\
             Provide a detailed visual description for each \
             (Architecture, Mood, Colors, Lighting).\n\
             Return ONLY a JSON list of objects with keys \"name\" and \"description\".\n\
             Text:\n{text}"
        );

        match self.oracle.generate_text(&prompt).await {
            Ok(response) => match parse_json::<Vec<Location>>(&response) {
                Ok(locations) => locations,
                Err(e) => {
                    warn!(error = %e, "Could not parse location list");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "Location extraction failed");
                Vec::new()
            }
        }
    }
}
