//! Trait definitions for the generation oracle boundary.

use async_trait::async_trait;
use fresco_error::FrescoResult;
use std::path::PathBuf;

/// Aspect ratio requested for generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AspectRatio {
    /// 9:16 portrait, used for character cards.
    #[display("9:16")]
    Portrait,
    /// 16:9 landscape, used for environments and scene illustrations.
    #[display("16:9")]
    Landscape,
}

/// A reference image attached to an image-generation request.
///
/// References are supplementary context rather than strict input constraints:
/// each carries a purpose label and a usage instruction that are also spelled
/// out in natural language in the final prompt.
///
/// # Examples
///
/// ```
/// use fresco_oracle::ReferenceImage;
///
/// let style_ref = ReferenceImage::new(
///     "output/style_templates/style_reference_fullbody.jpeg",
///     "Character Style Reference",
///     "Adopt the art style, line quality, and coloring.",
/// );
/// assert!(style_ref.purpose.contains("Style"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    /// Path of the artifact on disk. Missing files are skipped with a warning.
    pub path: PathBuf,
    /// Short label for why this reference is attached.
    pub purpose: String,
    /// Instruction for how the model should use the reference.
    pub usage: String,
}

impl ReferenceImage {
    /// Create a reference image descriptor.
    pub fn new(
        path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            purpose: purpose.into(),
            usage: usage.into(),
        }
    }
}

/// Text generation capability.
///
/// Returns raw model output: it may or may not be valid JSON even when JSON
/// was requested, and may wrap JSON in markdown fences. Transport, auth, and
/// quota failures propagate as errors.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Generate raw text for the given prompt.
    async fn generate_text(&self, prompt: &str) -> FrescoResult<String>;
}

/// Image generation capability.
///
/// Best-effort: reference images whose paths cannot be read are tolerated
/// (skipped with a warning), but failure to produce any image at all is an
/// error, never a silent no-op.
#[async_trait]
pub trait ImageOracle: Send + Sync {
    /// Generate image bytes for the given prompt and references.
    async fn generate_image(
        &self,
        prompt: &str,
        references: &[ReferenceImage],
        aspect_ratio: AspectRatio,
    ) -> FrescoResult<Vec<u8>>;
}
