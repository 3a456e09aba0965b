//! Generation oracle interface and Gemini implementation for Fresco.
//!
//! The pipeline treats text and image generation as an opaque, fallible
//! black box behind two narrow traits: [`TextOracle`] and [`ImageOracle`].
//! The [`GeminiOracle`] implements both against the Google Gemini API, using
//! the `gemini-rust` SDK for text generation and the REST `generateContent`
//! endpoint directly for multimodal image generation.
//!
//! # Example
//!
//! ```no_run
//! use fresco_oracle::{GeminiOracle, TextOracle};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let oracle = GeminiOracle::from_env()?;
//! let reply = oracle.generate_text("Describe a rainy harbor at dusk.").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod traits;

pub use gemini::GeminiOracle;
pub use traits::{AspectRatio, ImageOracle, ReferenceImage, TextOracle};
