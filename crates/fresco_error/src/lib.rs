//! Error types for the Fresco illustration pipeline.
//!
//! This crate provides the foundation error types used throughout the Fresco
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use fresco_error::{FrescoResult, OracleError, OracleErrorKind};
//!
//! fn call_model() -> FrescoResult<String> {
//!     Err(OracleError::new(OracleErrorKind::ApiRequest(
//!         "connection refused".to_string(),
//!     )))?
//! }
//!
//! match call_model() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod json;
mod oracle;
mod pipeline;
mod storage;

pub use config::ConfigError;
pub use error::{FrescoError, FrescoErrorKind, FrescoResult};
pub use json::JsonError;
pub use oracle::{OracleError, OracleErrorKind, RetryableError};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use storage::{StorageError, StorageErrorKind};
