//! qreator - QR payload encoding and camera scanning
//!
//! Builds the text that goes into a QR symbol (links, plain text, hosted
//! images and PDFs, tour-guide handoffs, UPI payment requests), classifies
//! what a scan returns, and drives live camera scanning through a
//! cancellable per-frame loop.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Camera session, capabilities and media backends
pub mod camera;
/// Link / payment / plain-text classification of decoded strings
pub mod classifier;
/// Environment-derived settings
pub mod config;
/// Scanner state machine
pub mod controller;
/// Payload encoders (tour links, UPI payment URIs)
pub mod encoder;
/// Crate error type
pub mod error;
/// Core data structures (payloads, pixel buffers, scan results)
pub mod models;
/// Rasterizer request (colours, size, logo, export names)
pub mod render;
/// Live scan loop and decode boundary
pub mod scan;
/// Still-image loading helpers
pub mod tools;
/// Tour-guide links and conversation
pub mod tour;
/// Frame utilities (grayscale, buffer reuse)
pub mod utils;

pub use camera::{CameraDevice, Facing, SessionState};
pub use classifier::{classify, recommended_action};
pub use controller::{Controller, ScanState};
pub use encoder::encode;
pub use error::{Error, Result};
pub use models::{Action, CanonicalPayload, Classification, DecodedResult, PayloadSpec, PixelBuffer};
pub use render::{ExportFormat, RenderRequest};
pub use scan::{DecodeOutcome, Decoder, RqrrDecoder, ScanLoop, TickOutcome};
