//! Highlight: the single illustratable instant chosen from a scene.

use serde::{Deserialize, Serialize};

/// The narrowed visual instant selected to represent a scene.
///
/// Scenes can span multiple actions and times; rendering the whole span as
/// one image produces contradictions (a character doing two things at once).
/// The highlight pins the illustration to one split-second moment.
///
/// # Examples
///
/// ```
/// use fresco_core::Highlight;
///
/// let h = Highlight::full_scene("they argued in the kitchen", &["Alice".to_string()]);
/// assert_eq!(h.active_characters, vec!["Alice"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Highlight {
    /// Brief explanation of the chosen moment.
    #[serde(default)]
    pub highlight_description: String,
    /// Detailed visual description of this specific moment only.
    #[serde(default)]
    pub image_prompt: String,
    /// Characters visible at the chosen instant, filtered to known names.
    #[serde(default)]
    pub active_characters: Vec<String>,
}

impl Highlight {
    /// Fallback highlight covering the entire scene.
    ///
    /// Used when the oracle call fails or returns an unparsable response:
    /// illustrate everything rather than fail the scene.
    pub fn full_scene(scene_text: &str, available_characters: &[String]) -> Self {
        Self {
            highlight_description: "Fallback: full scene context".to_string(),
            image_prompt: scene_text.to_string(),
            active_characters: available_characters.to_vec(),
        }
    }
}
