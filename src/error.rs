//! Error types for the export pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or exporting a QR code
#[derive(Error, Debug)]
pub enum Error {
    /// The payload could not be turned into a QR symbol
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// The intermediate vector image could not be decoded or drawn
    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    /// The artifact source could not be serialized to the requested format
    #[error("Format encoding failed: {0}")]
    Format(String),

    /// The host clipboard refused the image or is unavailable
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// An export was requested while nothing is rendered
    #[error("Nothing to export: enter text to generate a QR code")]
    NoContent,

    /// The request violates an input constraint
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Writing the artifact to its destination failed
    #[error("Delivery failed: {0}")]
    Delivery(#[from] std::io::Error),

    /// Invalid export settings
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Payload-free classification of an [`Error`], cheap to store in state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Encoding,
    Rasterization,
    Format,
    Clipboard,
    NoContent,
    InvalidRequest,
    Delivery,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::Rasterization(_) => ErrorKind::Rasterization,
            Error::Format(_) => ErrorKind::Format,
            Error::Clipboard(_) => ErrorKind::Clipboard,
            Error::NoContent => ErrorKind::NoContent,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::Delivery(_) => ErrorKind::Delivery,
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(err: qrcode::types::QrError) -> Self {
        Error::Encoding(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Format(err.to_string())
    }
}
