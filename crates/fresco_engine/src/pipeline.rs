//! End-to-end orchestration: text in, illustrated catalog out.

use derive_getters::Getters;
use fresco_core::Scene;
use fresco_error::{FrescoResult, PipelineError, PipelineErrorKind};
use fresco_oracle::{ImageOracle, TextOracle};
use std::path::Path;
use tracing::info;

use crate::analyzer::StoryAnalyzer;
use crate::assets::AssetManager;
use crate::illustrator::Illustrator;
use crate::store::AssetCache;

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct PipelineReport {
    /// The detected style prompt used for every generation call.
    style_prompt: String,
    /// Number of scenes identified in the text.
    scene_count: usize,
    /// Characters in the catalog after the run.
    character_count: usize,
    /// Locations in the catalog after the run.
    location_count: usize,
}

/// Drives the full illustration flow over a single oracle.
///
/// Order per scene: entity extraction, asset generation, then illustration,
/// so that every reference an illustration needs exists before the
/// illustration call. The catalog and manifest are persisted after every
/// scene; an interrupted run resumes from its artifacts.
pub struct Pipeline<'o, O: TextOracle + ImageOracle> {
    oracle: &'o O,
}

impl<'o, O: TextOracle + ImageOracle> Pipeline<'o, O> {
    /// Create a pipeline over the given oracle.
    pub fn new(oracle: &'o O) -> Self {
        Self { oracle }
    }

    /// Run the full pipeline for a document.
    ///
    /// `style_hint` carries optional user style preferences folded into style
    /// detection. Fails fast on empty input, style detection failure,
    /// template generation failure, or a text that yields no scenes;
    /// per-scene failures inside the loop degrade instead of aborting.
    #[tracing::instrument(skip_all, fields(output_dir = %output_dir.display()))]
    pub async fn run(
        &self,
        text: &str,
        style_hint: &str,
        output_dir: &Path,
    ) -> FrescoResult<PipelineReport> {
        if text.trim().is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::EmptyInput).into());
        }

        let mut cache = AssetCache::open(output_dir);
        let analyzer = StoryAnalyzer::new(self.oracle);
        let assets = AssetManager::new(self.oracle);
        let mut illustrator = Illustrator::new(self.oracle);

        info!(chars = text.len(), "Analyzing text for style");
        let style_prompt = analyzer.extract_style(text, style_hint).await?;
        info!(style = %style_prompt, "Detected style");

        // Locations template first: the character templates chain off it.
        assets.prepare_templates(&cache, &style_prompt).await?;

        info!("Splitting text into scenes");
        let scenes = analyzer.extract_scenes(text).await;
        if scenes.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::NoScenes).into());
        }
        info!(count = scenes.len(), "Identified scenes");

        for scene in &scenes {
            self.process_scene(
                &analyzer,
                &assets,
                &mut illustrator,
                &mut cache,
                scene,
                &style_prompt,
            )
            .await;
        }

        illustrator.save_manifest(&cache, &style_prompt);

        Ok(PipelineReport {
            style_prompt,
            scene_count: scenes.len(),
            character_count: cache.catalog.characters_by_id().len(),
            location_count: cache.catalog.locations_by_id().len(),
        })
    }

    /// Process one scene: extract entities, materialize assets, illustrate.
    async fn process_scene(
        &self,
        analyzer: &StoryAnalyzer<'o, O>,
        assets: &AssetManager<'o, O>,
        illustrator: &mut Illustrator<'o, O>,
        cache: &mut AssetCache,
        scene: &Scene,
        style_prompt: &str,
    ) {
        info!(scene = scene.id, location = %scene.location_name, "Processing scene");

        let scene_text = &scene.original_text_segment;

        let characters = analyzer.extract_characters(scene_text).await;
        assets
            .generate_character_assets(cache, characters, style_prompt)
            .await;

        let locations = analyzer.extract_locations(scene_text).await;
        assets
            .generate_location_assets(cache, locations, style_prompt)
            .await;

        illustrator.illustrate_scene(cache, scene, style_prompt).await;
        // Persist progress so an interrupted run keeps its manifest entries.
        illustrator.save_manifest(cache, style_prompt);
    }
}
