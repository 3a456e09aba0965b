//! Core data types for the Fresco illustration pipeline.
//!
//! This crate provides the foundation data types shared across the Fresco
//! workspace: the entity model (characters and locations with stable ids),
//! scenes, highlights, the persisted catalog, and manifest records.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod entity;
mod highlight;
mod manifest;
mod scene;

pub use catalog::Catalog;
pub use entity::{Character, Location};
pub use highlight::Highlight;
pub use manifest::{CharacterRef, LocationRef, SceneRecord};
pub use scene::Scene;
