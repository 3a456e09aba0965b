//! Asset lifecycle: style templates, character cards, location shots.

use fresco_core::{Character, Location};
use fresco_error::FrescoResult;
use fresco_oracle::{AspectRatio, ImageOracle, ReferenceImage, TextOracle};
use std::path::Path;
use tracing::{error, info, warn};

use crate::resolver::{Resolution, resolve_character, resolve_location};
use crate::slug::sanitize_slug;
use crate::store::AssetCache;

/// Trailing prompt modifier that steers output away from photographed-art
/// artifacts (paper texture, desk glare, camera grain).
const DIGITAL_FIX: &str = "direct digital render, high-quality digital art, clean edges, \
     no paper texture, no camera grain.";

/// Generates and reuses per-entity artwork through the asset cache.
///
/// Each entity is generated at most once per identity: resolution runs first,
/// and only a `New` verdict triggers a generation call. Even then, an
/// artifact file already on disk is adopted instead of regenerated, so an
/// interrupted run resumes where it stopped.
pub struct AssetManager<'o, O: TextOracle + ImageOracle> {
    oracle: &'o O,
}

impl<'o, O: TextOracle + ImageOracle> AssetManager<'o, O> {
    /// Create an asset manager over the given oracle.
    pub fn new(oracle: &'o O) -> Self {
        Self { oracle }
    }

    /// Generate the per-run style templates, in dependency order.
    ///
    /// The 16:9 landscape background is generated first from the style prompt
    /// alone; the 9:16 background inherits its style by reference, and the
    /// full-body style reference inherits from the 9:16 background in turn.
    /// Each template is skipped when its file already exists.
    pub async fn prepare_templates(&self, cache: &AssetCache, style_prompt: &str) -> FrescoResult<()> {
        info!("Preparing global style templates");
        let template_dir = cache.template_dir();
        let bg_landscape = template_dir.join("bg_location_16_9.jpg");
        let bg_portrait = template_dir.join("bg_fullbody.jpg");
        let style_ref = template_dir.join("style_reference_fullbody.jpg");

        let landscape_fix = "direct digital render, high-quality digital art, clean edges, \
             no paper texture, no camera grain, no desk, no glare.";
        if !bg_landscape.exists() {
            let prompt = format!(
                "{style_prompt}. 16:9 aspect ratio, horizontal orientation. \
                 Pure digital environment art, empty scenery, no buildings, no people, \
                 no text, no borders. Cinematic wide shot. {landscape_fix}"
            );
            let bytes = self
                .oracle
                .generate_image(&prompt, &[], AspectRatio::Landscape)
                .await?;
            cache.write_artifact(&bg_landscape, &bytes).await?;
        }

        let portrait_fix = "direct digital render, high-quality digital art, clean edges, \
             no paper texture, no camera grain, no desk, no hands, no glare.";
        if !bg_portrait.exists() {
            let prompt = format!(
                "{style_prompt}. 9:16 aspect ratio. \
                 Vertical crop of the environment, no characters, no text. \
                 The visual style, colors, and lighting MUST be an exact match to the \
                 reference image. {portrait_fix}"
            );
            let references = [ReferenceImage::new(
                &bg_landscape,
                "Style Foundation",
                "This image is the absolute source of truth for visual style, colors, \
                 and brushwork. Inherit everything from it.",
            )];
            let bytes = self
                .oracle
                .generate_image(&prompt, &references, AspectRatio::Portrait)
                .await?;
            cache.write_artifact(&bg_portrait, &bytes).await?;
        }

        if !style_ref.exists() {
            let prompt = format!(
                "Character design sheet, {style_prompt} style. Full digital artwork. \
                 Single character, no text, no frames, no split screens, {portrait_fix}. \
                 Full body shot, standing."
            );
            let references = [ReferenceImage::new(
                &bg_portrait,
                "Background Style Reference",
                "Ensure consistent background style.",
            )];
            let bytes = self
                .oracle
                .generate_image(&prompt, &references, AspectRatio::Portrait)
                .await?;
            cache.write_artifact(&style_ref, &bytes).await?;
        }

        Ok(())
    }

    /// Resolve and, where new, generate character cards.
    ///
    /// Matched characters reuse the existing id and artifact paths; the new
    /// spelling is recorded as a catalog alias pointing at the same identity.
    /// New characters get the next id, a `{id}_{slug}.jpeg` full-body card in
    /// 9:16, and are persisted immediately.
    pub async fn generate_character_assets(
        &self,
        cache: &mut AssetCache,
        characters: Vec<Character>,
        style_prompt: &str,
    ) {
        for mut character in characters {
            match resolve_character(self.oracle, &cache.catalog, &character).await {
                Resolution::ExactMatch(_) => continue,
                Resolution::SemanticMatch(existing) => {
                    character.id = existing.id;
                    character.full_body_path = existing.full_body_path.clone();
                    character.reference_image_path = existing
                        .reference_image_path
                        .clone()
                        .or(existing.full_body_path);
                    // Keep the new name in the story, reuse the visual assets.
                    cache
                        .catalog
                        .characters
                        .insert(character.name.clone(), character);
                    cache.save();
                    continue;
                }
                Resolution::New(id) => {
                    character.id = Some(id);
                }
            }

            let slug = self.filename_slug_for(&character.name).await;
            let filename = format!("{}_{}.jpeg", character.id.unwrap_or(0), slug);
            let output_file = cache.character_dir().join(filename);

            if self
                .generate_character_card(cache, &mut character, style_prompt, &output_file)
                .await
            {
                character.original_name = Some(character.name.clone());
            }

            cache
                .catalog
                .characters
                .insert(character.name.clone(), character);
            cache.save();
        }
    }

    /// Generate a single full-body character card, unless it already exists.
    async fn generate_character_card(
        &self,
        cache: &AssetCache,
        character: &mut Character,
        style_prompt: &str,
        output_file: &Path,
    ) -> bool {
        if output_file.exists() {
            info!(name = %character.name, "Character card exists, adopting");
            character.full_body_path = Some(output_file.display().to_string());
            character.reference_image_path = character.full_body_path.clone();
            return true;
        }

        let prompt = format!(
            "full body shot of {}, {}. {style_prompt}. \
             9:16 aspect ratio. Single character only. No text, no labels, no frames, \
             no UI, no infographics. Exactly one depiction of the character. {DIGITAL_FIX}",
            character.name, character.description
        );

        let references = [ReferenceImage::new(
            cache.template_dir().join("style_reference_fullbody.jpg"),
            "Character Style Reference",
            "Adopt the art style, line quality, and coloring.",
        )];

        info!(name = %character.name, "Generating full-body card");
        let bytes = match self
            .oracle
            .generate_image(&prompt, &references, AspectRatio::Portrait)
            .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(name = %character.name, error = %e, "Failed to generate character card");
                return false;
            }
        };
        if let Err(e) = cache.write_artifact(output_file, &bytes).await {
            error!(name = %character.name, error = %e, "Failed to write character card");
            return false;
        }

        character.full_body_path = Some(output_file.display().to_string());
        character.reference_image_path = character.full_body_path.clone();
        character.generation_prompt = Some(prompt);
        true
    }

    /// Resolve and, where new, generate 16:9 location shots.
    pub async fn generate_location_assets(
        &self,
        cache: &mut AssetCache,
        locations: Vec<Location>,
        style_prompt: &str,
    ) {
        for mut location in locations {
            match resolve_location(self.oracle, &cache.catalog, &location).await {
                Resolution::ExactMatch(_) => continue,
                Resolution::SemanticMatch(existing) => {
                    location.id = existing.id;
                    location.reference_image_path = existing.reference_image_path;
                    location.generation_prompt = existing.generation_prompt;
                    cache
                        .catalog
                        .locations
                        .insert(location.name.clone(), location);
                    cache.save();
                    continue;
                }
                Resolution::New(id) => {
                    location.id = Some(id);
                }
            }

            let slug = self.filename_slug_for(&location.name).await;
            let filename = format!("{}_{}.jpeg", location.id.unwrap_or(0), slug);
            let output_file = cache.location_dir().join(filename);

            if output_file.exists() {
                info!(name = %location.name, "Location shot exists, adopting");
                location.reference_image_path = Some(output_file.display().to_string());
            } else {
                let prompt = format!(
                    "Digital landscape art of {}, {}. {style_prompt}. \
                     16:9 aspect ratio, cinematic wide shot. \
                     Single view, no text, no labels, no split screen, no frames. \
                     No people, no characters, no figures, no humans, no living beings. \
                     Empty scene, architecture and nature only. \
                     High quality environment design. {DIGITAL_FIX}",
                    location.name, location.description
                );

                let references = [ReferenceImage::new(
                    cache.template_dir().join("bg_location_16_9.jpg"),
                    "Environment Style Template",
                    "Use as stylistic foundation.",
                )];

                info!(name = %location.name, "Generating location shot");
                let bytes = match self
                    .oracle
                    .generate_image(&prompt, &references, AspectRatio::Landscape)
                    .await
                {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        error!(name = %location.name, error = %e, "Failed to generate location shot");
                        continue;
                    }
                };
                if let Err(e) = cache.write_artifact(&output_file, &bytes).await {
                    error!(name = %location.name, error = %e, "Failed to write location shot");
                    continue;
                }
                location.reference_image_path = Some(output_file.display().to_string());
                location.generation_prompt = Some(prompt);
            }

            if location.original_name.is_none() {
                location.original_name = Some(location.name.clone());
            }
            cache
                .catalog
                .locations
                .insert(location.name.clone(), location);
            cache.save();
        }
    }

    /// Build a filename slug for an entity name.
    ///
    /// Asks the oracle for an English rendering of the name (names in the
    /// source language would otherwise produce unreadable or empty slugs) and
    /// sanitizes the result. Falls back to sanitizing the raw name.
    async fn filename_slug_for(&self, name: &str) -> String {
        let prompt = format!(
            "Translate the following name or phrase to English, providing only the \
             translation, no extra text or punctuation: {name}"
        );
        match self.oracle.generate_text(&prompt).await {
            Ok(translated) => sanitize_slug(&translated),
            Err(e) => {
                warn!(name, error = %e, "Translation failed, using original name");
                sanitize_slug(name)
            }
        }
    }
}
