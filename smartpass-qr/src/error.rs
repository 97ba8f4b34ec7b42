//! Error types for the QR codec

use thiserror::Error;

/// QR codec error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// Identifier is empty or cannot live in a URL path segment.
    /// Caller error, never retried.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Origin is not an absolute http(s) URL without a path
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),

    /// Rendering options out of range (zero width, bad color)
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The QR algorithm or the image encoder could not represent the payload
    #[error("Could not generate code: {0}")]
    EncodingFailure(String),

    /// Stored value is not a base64 image data URL
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}

impl QrError {
    /// Whether the failure is the caller's fault (bad input) rather than internal
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, QrError::EncodingFailure(_))
    }
}

impl From<qrcode::types::QrError> for QrError {
    fn from(e: qrcode::types::QrError) -> Self {
        QrError::EncodingFailure(e.to_string())
    }
}

impl From<image::ImageError> for QrError {
    fn from(e: image::ImageError) -> Self {
        QrError::EncodingFailure(e.to_string())
    }
}

/// Result type for codec operations
pub type QrResult<T> = Result<T, QrError>;
