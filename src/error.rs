use crate::camera::{Capability, DenialReason};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the caller.
///
/// Encoding and classification never fail; everything here comes from
/// device negotiation, decoding or external services.
#[derive(Debug, Error)]
pub enum Error {
    /// Camera access was refused or is not available
    #[error("camera access denied: {0}")]
    PermissionDenied(DenialReason),

    /// Torch or zoom requested on a device that does not offer it
    #[error("{0} not available on this device")]
    UnsupportedCapability(Capability),

    /// The device offers the control but rejected the change
    #[error("camera control failed: {0}")]
    ControlFailed(String),

    /// A still image was decoded and held no symbol
    #[error("no QR code found in the selected image")]
    NoCodeFound,

    /// The text generation service failed; `fallback` is the text to keep on screen
    #[error("generation failed: {message}")]
    GenerationFailure {
        /// Service error message
        message: String,
        /// User-entered text that must be preserved
        fallback: String,
    },

    /// Generation requested with an empty topic or question
    #[error("prompt is empty")]
    EmptyPrompt,

    /// A still image could not be read
    #[error("failed to load image {}: {source}", path.display())]
    ImageLoad {
        /// File that failed
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },

    /// Operation not valid in the current scan state
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, Error>;
