//! Generation oracle error types and retry logic.

/// Oracle-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OracleErrorKind {
    /// API key not found in environment
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Failed to create the underlying client
    #[display("Failed to create oracle client: {}", _0)]
    ClientCreation(String),
    /// API request failed
    #[display("Oracle API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Base64 decoding of returned media failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// The model returned a response with no image payload
    #[display("Image generation returned no image parts")]
    NoImageReturned,
}

impl OracleErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            OracleErrorKind::HttpError { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            OracleErrorKind::HttpError { status_code, .. } => match *status_code {
                429 => (5000, 3, 40),
                503 => (2000, 5, 60),
                500 | 502 | 504 => (1000, 3, 8),
                408 => (2000, 4, 30),
                _ => (2000, 5, 60),
            },
            _ => (2000, 5, 60),
        }
    }
}

/// Oracle error with source location tracking.
///
/// # Examples
///
/// ```
/// use fresco_error::{OracleError, OracleErrorKind};
///
/// let err = OracleError::new(OracleErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Oracle Error: {} at line {} in {}", kind, line, file)]
pub struct OracleError {
    /// The kind of error that occurred
    pub kind: OracleErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl OracleError {
    /// Create a new OracleError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OracleErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// Transient errors like 503 (service unavailable) or 429 (rate limit) should
/// trigger a retry with backoff; permanent errors like 401 (unauthorized) or
/// 400 (bad request) should fail immediately.
///
/// # Examples
///
/// ```
/// use fresco_error::{OracleError, OracleErrorKind, RetryableError};
///
/// let err = OracleError::new(OracleErrorKind::HttpError {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (backoff, retries, _max_delay) = err.retry_strategy_params();
/// assert_eq!(backoff, 2000);
/// assert_eq!(retries, 5);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64);
}

impl RetryableError for OracleError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}
