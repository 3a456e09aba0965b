//! Top-level error wrapper types.

use crate::{ConfigError, JsonError, OracleError, PipelineError, StorageError};

/// This is the foundation error enum for the Fresco workspace.
///
/// # Examples
///
/// ```
/// use fresco_error::{ConfigError, FrescoError};
///
/// let config_err = ConfigError::new("Missing API key");
/// let err: FrescoError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FrescoErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Generation oracle error
    #[from(OracleError)]
    Oracle(OracleError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Fresco error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fresco_error::{ConfigError, FrescoResult};
///
/// fn might_fail() -> FrescoResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fresco Error: {}", _0)]
pub struct FrescoError(Box<FrescoErrorKind>);

impl FrescoError {
    /// Create a new error from a kind.
    pub fn new(kind: FrescoErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FrescoErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to FrescoErrorKind
impl<T> From<T> for FrescoError
where
    T: Into<FrescoErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fresco operations.
///
/// # Examples
///
/// ```
/// use fresco_error::{FrescoResult, JsonError};
///
/// fn parse_reply() -> FrescoResult<String> {
///     Err(JsonError::new("no JSON found in response"))?
/// }
/// ```
pub type FrescoResult<T> = std::result::Result<T, FrescoError>;
