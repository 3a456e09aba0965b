//! Highlight selection: narrowing a scene to one illustratable instant.

use fresco_core::Highlight;
use fresco_oracle::TextOracle;
use tracing::warn;

use crate::extraction::parse_json;

/// Ask the oracle for the single most illustratable instant of a scene.
///
/// Scenes can cover a span of time with multiple actions; rendering the whole
/// span as one image produces visual contradictions. The oracle picks one
/// split-second moment and reports which of the known characters are visible
/// in it.
///
/// The returned `active_characters` are filtered to the intersection with
/// `available_characters`: the oracle may hallucinate names, and any name not
/// in the known set is discarded silently. No filtering happens when the
/// available list is empty.
///
/// Any oracle error or unparsable response degrades to the full scene text as
/// the prompt with the full available list active, never a failed scene.
pub async fn select_highlight<O: TextOracle>(
    oracle: &O,
    scene_text: &str,
    available_characters: &[String],
) -> Highlight {
    let char_context = if available_characters.is_empty() {
        String::new()
    } else {
        format!(
            "The following characters are present in the full scene: {}.\n\
             Identify EXACTLY which of these characters are visible in the specific \
             highlight moment you chose. Only list characters that are visually \
             present in this split-second.",
            available_characters.join(", ")
        )
    };

    let prompt = format!(
        "Analyze the following scene text. This scene might cover a period of time \
         with multiple actions.\n\
         To create a SINGLE cohesive illustration, identify the MOST visually \
         striking, dramatic, or significant split-second moment.\n\
         Ignore everything that happens before or after this specific moment to \
         avoid generated artifacts (like a character doing two things at once).\n\n\
         Scene Text: \"{scene_text}\"\n\n\
         {char_context}\n\n\
         Return a JSON object with exactly these keys:\n\
         - \"highlight_description\": A brief explanation of the chosen moment.\n\
         - \"image_prompt\": A highly detailed visual description of THIS SPECIFIC \
         MOMENT ONLY. Describe the subjects, action, lighting, and camera angle. \
         Do NOT mention that it is a 'highlight' or 'moment', just describe the \
         visual content.\n\
         - \"active_characters\": A list of strings containing ONLY the names of \
         characters from the provided list that are in this moment."
    );

    let mut highlight = match oracle.generate_text(&prompt).await {
        Ok(response) => match parse_json::<Highlight>(&response) {
            Ok(highlight) => highlight,
            Err(e) => {
                warn!(error = %e, "Could not parse highlight response, using full scene");
                return Highlight::full_scene(scene_text, available_characters);
            }
        },
        Err(e) => {
            warn!(error = %e, "Highlight analysis failed, using full scene");
            return Highlight::full_scene(scene_text, available_characters);
        }
    };

    if !available_characters.is_empty() {
        highlight
            .active_characters
            .retain(|name| available_characters.contains(name));
    }

    highlight
}
