//! Entity types: characters and locations with stable visual identities.

use serde::{Deserialize, Serialize};

/// A character with a stable visual identity.
///
/// The `id` is the true identity key: it is assigned exactly once, and every
/// later mention that resolves to the same id reuses the same generated
/// artwork. `name` tracks the newest mention's spelling while `original_name`
/// preserves the first name ever seen for the asset.
///
/// # Examples
///
/// ```
/// use fresco_core::Character;
///
/// let hero = Character::new("Kevin", "tall, red scarf, tired eyes");
/// assert!(hero.id.is_none());
/// assert_eq!(hero.name, "Kevin");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Stable integer id, `None` until resolved.
    #[serde(default)]
    pub id: Option<u32>,
    /// Current display name (newest mention wins).
    pub name: String,
    /// First name ever seen for this asset.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Free-text visual description used to generate or match the entity.
    #[serde(default)]
    pub description: String,
    /// Exact prompt used for the generated artifact, if any.
    #[serde(default)]
    pub generation_prompt: Option<String>,
    /// Path to the generated reference image, if any.
    #[serde(default)]
    pub reference_image_path: Option<String>,
    /// Path to the generated full-body card, if any.
    #[serde(default)]
    pub full_body_path: Option<String>,
}

impl Character {
    /// Create an unresolved character from a mention in the text.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            original_name: None,
            description: description.into(),
            generation_prompt: None,
            reference_image_path: None,
            full_body_path: None,
        }
    }

    /// The best available artifact path for use as an image reference.
    pub fn artifact_path(&self) -> Option<&str> {
        self.full_body_path
            .as_deref()
            .or(self.reference_image_path.as_deref())
    }
}

/// A location with a stable visual identity.
///
/// Same lifecycle as [`Character`], minus the full-body card: locations get a
/// single 16:9 environment shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Stable integer id, `None` until resolved.
    #[serde(default)]
    pub id: Option<u32>,
    /// Current display name (newest mention wins).
    pub name: String,
    /// First name ever seen for this asset.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Free-text visual description used to generate or match the entity.
    #[serde(default)]
    pub description: String,
    /// Exact prompt used for the generated artifact, if any.
    #[serde(default)]
    pub generation_prompt: Option<String>,
    /// Path to the generated environment image, if any.
    #[serde(default)]
    pub reference_image_path: Option<String>,
}

impl Location {
    /// Create an unresolved location from a mention in the text.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            original_name: None,
            description: description.into(),
            generation_prompt: None,
            reference_image_path: None,
        }
    }
}
