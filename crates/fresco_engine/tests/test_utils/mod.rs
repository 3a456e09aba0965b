//! Shared scripted oracle for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use fresco_error::{FrescoResult, OracleError, OracleErrorKind};
use fresco_oracle::{AspectRatio, ImageOracle, ReferenceImage, TextOracle};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A deterministic oracle that replays scripted text responses.
///
/// Text responses are consumed in FIFO order; when the script runs dry every
/// further call answers with the configured default. Image calls return a
/// fixed byte pattern, or an error when `fail_images` is set. All calls are
/// counted so tests can assert on how many oracle round-trips a flow costs.
pub struct MockOracle {
    responses: Mutex<VecDeque<String>>,
    default_response: String,
    fail_images: bool,
    pub text_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
}

impl MockOracle {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            default_response: "mock response".to_string(),
            fail_images: false,
            text_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_default(mut self, default_response: &str) -> Self {
        self.default_response = default_response.to_string();
        self
    }

    pub fn failing_images(mut self) -> Self {
        self.fail_images = true;
        self
    }

    pub fn text_call_count(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn image_call_count(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextOracle for MockOracle {
    async fn generate_text(&self, _prompt: &str) -> FrescoResult<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .expect("mock responses lock")
            .pop_front();
        Ok(next.unwrap_or_else(|| self.default_response.clone()))
    }
}

#[async_trait]
impl ImageOracle for MockOracle {
    async fn generate_image(
        &self,
        _prompt: &str,
        _references: &[ReferenceImage],
        _aspect_ratio: AspectRatio,
    ) -> FrescoResult<Vec<u8>> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_images {
            return Err(OracleError::new(OracleErrorKind::NoImageReturned).into());
        }
        Ok(vec![0xFF, 0xD8, 0xFF, 0xE0])
    }
}
