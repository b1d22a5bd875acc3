//! Resource loading error types.

use thiserror::Error;

/// Errors that can occur while loading images or fonts.
///
/// All of these are recoverable: a failed load aborts the current render
/// pass and leaves the previous result in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Network, filesystem or data URL payload could not be read
    #[error("Failed to fetch image: {0}")]
    Fetch(String),

    /// Bytes were read but are not a supported image
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The reference uses a scheme this crate cannot load
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),

    /// Font file could not be read or parsed
    #[error("Failed to load font: {0}")]
    Font(String),

    /// Loader could not be constructed
    #[error("Resource loader configuration error: {0}")]
    Config(String),
}
