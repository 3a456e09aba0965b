//! Google Gemini oracle implementation.
//!
//! Text generation goes through the `gemini-rust` SDK; image generation
//! talks to the REST `generateContent` endpoint directly, because the SDK's
//! builder has no path for inline image references or image response
//! modalities. Both paths share the same retry policy: transient failures
//! (429/5xx) back off exponentially with jitter, permanent failures surface
//! immediately.

mod wire;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use gemini_rust::{Gemini, client::Model};
use std::env;
use std::path::Path;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

use fresco_error::{FrescoResult, OracleError, OracleErrorKind, RetryableError};

use crate::{AspectRatio, ImageOracle, ReferenceImage, TextOracle};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

type OracleResult<T> = std::result::Result<T, OracleError>;

//
// ─── ORACLE ─────────────────────────────────────────────────────────────────────
//

/// Gemini-backed generation oracle.
///
/// Holds one SDK client for the text model and a plain HTTP client for the
/// image endpoint. The oracle is stateless across calls; identity and caching
/// concerns live entirely in the pipeline.
pub struct GeminiOracle {
    text_client: Gemini,
    http: reqwest::Client,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl std::fmt::Debug for GeminiOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiOracle")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl GeminiOracle {
    /// Create an oracle from environment configuration.
    ///
    /// Reads the API key from `GEMINI_API_KEY` (required) and the model names
    /// from `FRESCO_TEXT_MODEL` / `FRESCO_IMAGE_MODEL` (optional, with
    /// current defaults).
    ///
    /// # Errors
    ///
    /// Returns an error when the API key is missing or the SDK client cannot
    /// be constructed.
    #[instrument(name = "gemini_oracle_from_env")]
    pub fn from_env() -> FrescoResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| OracleError::new(OracleErrorKind::MissingApiKey))?;
        let text_model =
            env::var("FRESCO_TEXT_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string());
        let image_model =
            env::var("FRESCO_IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string());
        Self::with_models(api_key, text_model, image_model).map_err(Into::into)
    }

    /// Create an oracle with explicit models.
    pub fn with_models(
        api_key: String,
        text_model: String,
        image_model: String,
    ) -> FrescoResult<Self> {
        let model_enum = Self::model_name_to_enum(&text_model);
        let text_client = Gemini::with_model(&api_key, model_enum)
            .map_err(|e| OracleError::new(OracleErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            text_client,
            http: reqwest::Client::new(),
            api_key,
            text_model,
            image_model,
        })
    }

    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Unrecognized names fall back to `Model::Custom` with the "models/"
    /// prefix the API requires.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => {
                if other.starts_with("models/") {
                    Model::Custom(other.to_string())
                } else {
                    Model::Custom(format!("models/{}", other))
                }
            }
        }
    }

    /// Parse API errors to extract HTTP status codes.
    ///
    /// Converts generic error strings into structured [`OracleError`]s with
    /// status codes when one can be recovered, so the retry policy can
    /// distinguish transient from permanent failures.
    fn parse_api_error(err: impl std::fmt::Display) -> OracleError {
        let err_msg = err.to_string();
        if let Some(status_code) = Self::extract_status_code(&err_msg) {
            OracleError::new(OracleErrorKind::HttpError {
                status_code,
                message: err_msg,
            })
        } else {
            OracleError::new(OracleErrorKind::ApiRequest(err_msg))
        }
    }

    /// Extract an HTTP status code from an error message string.
    ///
    /// Parses strings like "bad response from server; code 503; description: ...".
    fn extract_status_code(error_msg: &str) -> Option<u16> {
        if let Some(code_start) = error_msg.find("code ") {
            let code_str = &error_msg[code_start + 5..];
            let end = code_str
                .find(|c: char| !c.is_numeric())
                .unwrap_or(code_str.len());
            return code_str[..end].parse().ok();
        }
        None
    }

    /// Run an oracle call with transient-error retry.
    ///
    /// The first attempt determines the backoff parameters from the error it
    /// produced; permanent errors fail immediately.
    async fn with_retry<T, F, Fut>(&self, operation: &str, call: F) -> OracleResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = OracleResult<T>>,
    {
        let first_error = match call().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !first_error.is_retryable() {
            warn!(error = %first_error, operation, "Permanent oracle error, failing immediately");
            return Err(first_error);
        }

        let (initial_ms, max_retries, max_delay_secs) = first_error.retry_strategy_params();
        warn!(
            error = %first_error,
            operation,
            initial_backoff_ms = initial_ms,
            max_retries,
            "Transient oracle error, retrying with backoff"
        );

        let retry_strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(std::time::Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(max_retries);

        Retry::spawn(retry_strategy, || {
            let fut = call();
            async move {
                fut.await.map_err(|e| {
                    if e.is_retryable() {
                        warn!(error = %e, "Oracle call failed, will retry");
                        RetryError::Transient {
                            err: e,
                            retry_after: None,
                        }
                    } else {
                        RetryError::Permanent(e)
                    }
                })
            }
        })
        .await
    }

    /// Encode readable reference images as inline data parts.
    ///
    /// Unreadable paths are skipped with a warning rather than failing the
    /// request: a missing reference degrades quality, not correctness.
    async fn load_references(&self, references: &[ReferenceImage]) -> Vec<wire::InlineData> {
        let mut inline = Vec::with_capacity(references.len());
        for reference in references {
            match tokio::fs::read(&reference.path).await {
                Ok(bytes) => {
                    inline.push(wire::InlineData {
                        mime_type: mime_for_path(&reference.path).to_string(),
                        data: BASE64.encode(&bytes),
                    });
                }
                Err(e) => {
                    warn!(
                        path = %reference.path.display(),
                        error = %e,
                        "Could not load reference image, skipping"
                    );
                }
            }
        }
        inline
    }

    /// Build the final image prompt with the reference context block.
    ///
    /// Reference images are supplementary context for the model, so each one
    /// is also described in natural language: file name, purpose, and usage
    /// instruction.
    fn image_prompt_with_references(prompt: &str, references: &[ReferenceImage]) -> String {
        if references.is_empty() {
            return prompt.to_string();
        }
        let mut final_prompt = format!("{prompt}\n\nReference Images Context:");
        for reference in references {
            let filename = reference
                .path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| reference.path.display().to_string());
            final_prompt.push_str(&format!(
                "\n- File: {}\n  Purpose: {}\n  Instruction: {}",
                filename, reference.purpose, reference.usage
            ));
        }
        final_prompt
    }

    async fn generate_image_internal(
        &self,
        prompt: &str,
        references: &[ReferenceImage],
        aspect_ratio: AspectRatio,
    ) -> OracleResult<Vec<u8>> {
        let inline_refs = self.load_references(references).await;
        let final_prompt = Self::image_prompt_with_references(prompt, references);

        let mut parts = vec![wire::Part {
            text: Some(final_prompt),
            inline_data: None,
        }];
        for data in inline_refs {
            parts.push(wire::Part {
                text: None,
                inline_data: Some(data),
            });
        }

        let request = wire::GenerateContentRequest {
            contents: vec![wire::Content { parts, role: None }],
            generation_config: Some(wire::GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: Some(wire::ImageConfig {
                    aspect_ratio: aspect_ratio.to_string(),
                }),
            }),
        };

        let url = format!(
            "{}/models/{}:generateContent",
            API_BASE_URL, self.image_model
        );
        debug!(model = %self.image_model, references = references.len(), "Sending image generation request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::new(OracleErrorKind::ApiRequest(e.to_string())))?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::new(OracleErrorKind::HttpError {
                status_code,
                message,
            }));
        }

        let body: wire::GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| OracleError::new(OracleErrorKind::ApiRequest(e.to_string())))?;

        let inline = body
            .first_inline_data()
            .ok_or_else(|| OracleError::new(OracleErrorKind::NoImageReturned))?;

        BASE64
            .decode(&inline.data)
            .map_err(|e| OracleError::new(OracleErrorKind::Base64Decode(e.to_string())))
    }
}

#[async_trait]
impl TextOracle for GeminiOracle {
    #[instrument(skip(self, prompt), fields(model = %self.text_model, prompt_len = prompt.len()))]
    async fn generate_text(&self, prompt: &str) -> FrescoResult<String> {
        let response = self
            .with_retry("generate_text", || async {
                self.text_client
                    .generate_content()
                    .with_user_message(prompt)
                    .execute()
                    .await
                    .map_err(Self::parse_api_error)
            })
            .await?;

        Ok(response.text())
    }
}

#[async_trait]
impl ImageOracle for GeminiOracle {
    #[instrument(skip(self, prompt, references), fields(model = %self.image_model, references = references.len()))]
    async fn generate_image(
        &self,
        prompt: &str,
        references: &[ReferenceImage],
        aspect_ratio: AspectRatio,
    ) -> FrescoResult<Vec<u8>> {
        self.with_retry("generate_image", || {
            self.generate_image_internal(prompt, references, aspect_ratio)
        })
        .await
        .map_err(Into::into)
    }
}

/// MIME type guessed from a file extension, defaulting to JPEG.
fn mime_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extract_status_code() {
        let msg = "bad response from server; code 503; description: overloaded";
        assert_eq!(GeminiOracle::extract_status_code(msg), Some(503));
        assert_eq!(GeminiOracle::extract_status_code("no code here"), None);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a/b/card.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("a/b/card.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("no_extension")), "image/jpeg");
    }

    #[test]
    fn test_image_prompt_references_block() {
        let refs = vec![ReferenceImage::new(
            PathBuf::from("out/characters/1_kevin.jpeg"),
            "Character Appearance Reference for Kevin",
            "Maintain consistency with this character design.",
        )];
        let prompt = GeminiOracle::image_prompt_with_references("a duel at dawn", &refs);
        assert!(prompt.starts_with("a duel at dawn"));
        assert!(prompt.contains("Reference Images Context:"));
        assert!(prompt.contains("File: 1_kevin.jpeg"));
        assert!(prompt.contains("Purpose: Character Appearance Reference for Kevin"));
    }

    #[test]
    fn test_image_prompt_without_references() {
        let prompt = GeminiOracle::image_prompt_with_references("a duel at dawn", &[]);
        assert_eq!(prompt, "a duel at dawn");
    }
}
