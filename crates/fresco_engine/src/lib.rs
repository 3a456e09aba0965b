//! Scene segmentation, entity resolution, and asset lifecycle engine.
//!
//! This crate contains the algorithmic core of Fresco:
//!
//! - **Segmenter**: splits raw narrative text into bounded chunks on safe
//!   natural boundaries.
//! - **Analyzer**: converts chunks into ordered [`fresco_core::Scene`]
//!   records and extracts character/location sheets via the text oracle.
//! - **Highlight selection**: narrows a time-spanning scene to one
//!   illustratable instant.
//! - **Entity resolution**: two-tier deduplication (exact name match, then
//!   semantic match via the oracle) with conservative fall-through to New.
//! - **Asset cache**: durable, crash-resilient catalog persistence with
//!   legacy migration and idempotent artifact generation.
//! - **Illustrator**: reference selection, prompt assembly, and manifest
//!   records for per-scene illustrations.
//! - **Pipeline**: end-to-end orchestration of the above.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod assets;
mod extraction;
mod highlight;
mod illustrator;
mod pipeline;
mod resolver;
mod segment;
mod slug;
mod store;

pub use analyzer::StoryAnalyzer;
pub use assets::AssetManager;
pub use extraction::{extract_json, parse_json};
pub use highlight::select_highlight;
pub use illustrator::Illustrator;
pub use pipeline::{Pipeline, PipelineReport};
pub use resolver::{Resolution, resolve_character, resolve_location};
pub use segment::segment;
pub use slug::sanitize_slug;
pub use store::AssetCache;
