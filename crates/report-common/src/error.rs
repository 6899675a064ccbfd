//! Error types for site report rendering.

use thiserror::Error;

/// Result type alias using ReportError.
pub type ReportResult<T> = Result<T, ReportError>;

/// Primary error type for report operations.
///
/// Missing resources and chart backend failures are recovered inside the
/// renderer and never show up here.
#[derive(Debug, Error)]
pub enum ReportError {
    // === Input Errors ===
    #[error("Latitude must be between -90 and 90 degrees, got {0}")]
    InvalidLatitude(f64),

    #[error("Longitude must be between -180 and 180 degrees, got {0}")]
    InvalidLongitude(f64),

    #[error("Scalar must be a finite number, got {0}")]
    NonFiniteScalar(f64),

    // === Rendering Errors ===
    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error("Canvas error: {0}")]
    Canvas(String),

    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ReportError {
    /// Whether the error was caused by the caller's input rather than the renderer.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ReportError::InvalidLatitude(_)
                | ReportError::InvalidLongitude(_)
                | ReportError::NonFiniteScalar(_)
        )
    }

    /// Get the HTTP status code a transport layer should report for this error.
    pub fn http_status_code(&self) -> u16 {
        if self.is_input_error() {
            400
        } else {
            500
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Config(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ReportError {
    fn from(err: serde_yaml::Error) -> Self {
        ReportError::Config(format!("YAML error: {}", err))
    }
}
