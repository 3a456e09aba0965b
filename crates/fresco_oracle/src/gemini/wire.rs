//! Serde types for the Gemini REST `generateContent` wire format.
//!
//! The `gemini-rust` SDK covers plain text generation, but its builder has no
//! path for multimodal requests with inline image data or image response
//! modalities. Image generation therefore talks to the REST endpoint
//! directly; these types mirror the JSON protocol.

use serde::{Deserialize, Serialize};

/// Top-level request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents; a single user turn for image generation.
    pub contents: Vec<Content>,
    /// Generation configuration (response modalities, image config).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Ordered parts of the turn: text and/or inline media.
    #[serde(default)]
    pub parts: Vec<Part>,
    /// Role of the turn ("user" / "model"); absent on requests here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// One part of a turn: either text or inline binary data.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline media payload (base64-encoded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Base64-encoded inline media with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type, e.g. "image/jpeg" or "image/png".
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Generation configuration for image output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Requested response modalities, e.g. `["IMAGE"]`.
    pub response_modalities: Vec<String>,
    /// Image-specific configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Image-specific generation settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Aspect ratio string, e.g. "16:9" or "9:16".
    pub aspect_ratio: String,
}

/// Top-level response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; the first is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The candidate's content, absent when generation was blocked.
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// First inline media payload in the response, if any.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .find_map(|part| part.inline_data.as_ref())
    }
}
