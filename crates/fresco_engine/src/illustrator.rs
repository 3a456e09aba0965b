//! Scene illustration: reference selection, prompt assembly, manifest records.

use fresco_core::{CharacterRef, LocationRef, Scene, SceneRecord};
use fresco_oracle::{AspectRatio, ImageOracle, ReferenceImage, TextOracle};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::highlight::select_highlight;
use crate::slug::sanitize_slug;
use crate::store::{AssetCache, merge_into_document};

/// Renders one 16:9 illustration per scene and keeps the manifest registry.
///
/// Every processed scene gets a manifest record, whether or not an image was
/// generated this run. Scenes whose illustration file already exists are
/// recorded and skipped, so a re-run only pays for the scenes that are
/// actually missing.
pub struct Illustrator<'o, O: TextOracle + ImageOracle> {
    oracle: &'o O,
    records: Vec<SceneRecord>,
}

impl<'o, O: TextOracle + ImageOracle> Illustrator<'o, O> {
    /// Create an illustrator over the given oracle.
    pub fn new(oracle: &'o O) -> Self {
        Self {
            oracle,
            records: Vec::new(),
        }
    }

    /// Manifest records accumulated so far.
    pub fn records(&self) -> &[SceneRecord] {
        &self.records
    }

    /// Illustrate a single scene and append its manifest record.
    ///
    /// An illustration already on disk for this scene id is adopted as-is,
    /// before any oracle call: slugs are oracle-generated, so re-run skipping
    /// cannot depend on the oracle reproducing the same slug.
    pub async fn illustrate_scene(&mut self, cache: &AssetCache, scene: &Scene, style_prompt: &str) {
        let slug = match existing_illustration(cache, scene.id) {
            Some(slug) => slug,
            None => self.scene_slug(scene).await,
        };
        let filename = format!("{}_{}.jpeg", scene.id, slug);
        let img_file = cache.illustration_dir().join(&filename);

        let location = LocationRef {
            id: cache
                .catalog
                .lookup_location(&scene.location_name)
                .and_then(|l| l.id),
            name: scene.location_name.clone(),
        };
        let characters: Vec<CharacterRef> = scene
            .characters_present
            .iter()
            .filter_map(|name| {
                cache.catalog.lookup_character(name).map(|c| CharacterRef {
                    id: c.id,
                    name: name.clone(),
                    full_body_path: c.full_body_path.clone(),
                })
            })
            .collect();

        let mut record = SceneRecord {
            scene_id: scene.id,
            source_text_segment: scene.original_text_segment.clone(),
            name: slug,
            location,
            characters,
            illustration_path: format!("illustrations/{filename}"),
            generation_prompt: None,
        };

        if img_file.exists() {
            info!(scene = scene.id, "Illustration exists, skipping generation");
            self.records.push(record);
            return;
        }

        info!(scene = scene.id, "Analyzing scene for highlight moment");
        let highlight = select_highlight(
            self.oracle,
            &scene.original_text_segment,
            &scene.characters_present,
        )
        .await;

        let mut references = Vec::new();
        for name in &highlight.active_characters {
            match cache
                .catalog
                .lookup_character(name)
                .and_then(|c| c.artifact_path())
            {
                Some(path) => references.push(ReferenceImage::new(
                    path,
                    format!("Character Appearance Reference for {name}"),
                    "Maintain consistency with this character design.",
                )),
                None => warn!(scene = scene.id, name, "No artifact for active character"),
            }
        }
        if let Some(path) = cache
            .catalog
            .lookup_location(&scene.location_name)
            .and_then(|l| l.reference_image_path.as_deref())
        {
            references.push(ReferenceImage::new(
                path,
                "Location Environment Reference",
                "Set the scene in this environment.",
            ));
        }

        let visual_core = if highlight.image_prompt.is_empty() {
            &scene.visual_description
        } else {
            &highlight.image_prompt
        };
        let prompt = format!(
            "{style_prompt}. **Single cinematic frame. One single cohesive image.**\n\
             **STRICTLY NO multi-panels, NO comic book layout, NO grid, NO split screen, \
             NO storyboard, NO frames.**\n\
             **NO text, NO captions, NO speech bubbles.**\n\
             Scene context: {visual_core}\n\
             Action taking place: {}\n\
             Setting: {}, {}. Mood: {}.",
            scene.action_description, scene.location_name, scene.time_of_day, scene.mood
        );

        info!(scene = scene.id, "Generating illustration");
        match self
            .oracle
            .generate_image(&prompt, &references, AspectRatio::Landscape)
            .await
        {
            Ok(bytes) => match cache.write_artifact(&img_file, &bytes).await {
                Ok(()) => record.generation_prompt = Some(prompt),
                Err(e) => error!(scene = scene.id, error = %e, "Failed to write illustration"),
            },
            Err(e) => error!(scene = scene.id, error = %e, "Failed to illustrate scene"),
        }

        self.records.push(record);
    }

    /// Persist the manifest into the unified document.
    ///
    /// Writes `style_prompt` and the `illustrations` list sorted by scene id;
    /// the catalog's `characters` and `locations` fields are left to the
    /// cache's own save and survive the merge untouched.
    pub fn save_manifest(&self, cache: &AssetCache, style_prompt: &str) {
        let mut ordered = self.records.clone();
        ordered.sort_by_key(|r| r.scene_id);
        let illustrations: Vec<Value> = ordered
            .iter()
            .map(|r| serde_json::to_value(r).unwrap_or(Value::Null))
            .collect();

        let style_prompt = style_prompt.to_string();
        if let Err(e) = merge_into_document(cache.data_path(), move |doc| {
            doc.insert("style_prompt".to_string(), Value::String(style_prompt));
            doc.insert("illustrations".to_string(), Value::Array(illustrations));
        }) {
            error!(error = %e, "Error saving manifest");
        } else {
            info!(path = %cache.data_path().display(), "Global manifest saved");
        }
    }

    /// Choose a short snake_case filename slug for a scene.
    ///
    /// The visual description gives better slugs than the location name; the
    /// oracle condenses it and any failure falls back to "scene".
    async fn scene_slug(&self, scene: &Scene) -> String {
        let source = if scene.visual_description.is_empty() {
            &scene.summary
        } else {
            &scene.visual_description
        };
        let prompt = format!(
            "Create a short, concise filename slug (max 4 words, snake_case) that \
             summarizes this scene. Return ONLY the slug, no extension, no other text. \
             Input: {source}"
        );
        match self.oracle.generate_text(&prompt).await {
            Ok(raw) => sanitize_slug(&raw),
            Err(e) => {
                warn!(scene = scene.id, error = %e, "Slug generation failed, using fallback");
                "scene".to_string()
            }
        }
    }
}

/// Slug of an illustration already on disk for this scene id, if any.
///
/// Scans the illustrations directory for a `{scene_id}_{slug}.jpeg` entry.
fn existing_illustration(cache: &AssetCache, scene_id: u32) -> Option<String> {
    let entries = std::fs::read_dir(cache.illustration_dir()).ok()?;
    let prefix = format!("{scene_id}_");
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(slug) = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".jpeg"))
        {
            return Some(slug.to_string());
        }
    }
    None
}
