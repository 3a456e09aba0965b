//! Fresco: narrative text in, consistent scene illustrations out.
//!
//! This facade crate re-exports the public surface of the workspace and
//! provides the command-line entry point. The heavy lifting lives in the
//! member crates:
//!
//! - [`fresco_core`]: entity, scene, and manifest types plus the catalog.
//! - [`fresco_oracle`]: the generation oracle traits and the Gemini client.
//! - [`fresco_engine`]: segmentation, analysis, resolution, assets, and the
//!   pipeline itself.
//! - [`fresco_error`]: the shared error hierarchy.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cli;

pub use cli::Cli;
pub use fresco_core::{
    Catalog, Character, CharacterRef, Highlight, Location, LocationRef, Scene,
    SceneRecord,
};
pub use fresco_engine::{
    AssetCache, AssetManager, Illustrator, Pipeline, PipelineReport, Resolution, StoryAnalyzer,
};
pub use fresco_error::{FrescoError, FrescoErrorKind, FrescoResult};
pub use fresco_oracle::{AspectRatio, GeminiOracle, ImageOracle, ReferenceImage, TextOracle};
