use thiserror::Error;

/// Centralized error types for the application
///
/// All errors in the application are converted to this enum for consistent error handling.
/// Uses `thiserror` for automatic error conversion and display formatting.
///
/// Note that most of these never cross the gateway boundary: the catalog
/// always degrades to an empty or seed result (see `catalog::gateway`), so
/// `AppError` mostly shows up in logs and inside the backend source itself.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP status code errors
    #[error("HTTP request failed with status: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Backend (PostgREST) errors that are not plain transport failures
    #[error("Backend error: {0}")]
    Backend(String),

    /// JSON decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Helper function to convert String to AppError::Backend
impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Backend(err)
    }
}

/// Helper function to convert &str to AppError::Backend
impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Backend(err.to_string())
    }
}
