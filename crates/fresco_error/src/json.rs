//! JSON serialization error types.

/// JSON error with source location.
///
/// Covers both serde failures and structurally unusable model output, e.g. a
/// response where no JSON payload could be located at all.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fresco_error::JsonError;
    ///
    /// let err = JsonError::new("expected a list of scenes");
    /// assert!(format!("{}", err).contains("list of scenes"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
