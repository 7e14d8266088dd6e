//! Utility functions for frame handling
//!
//! - Grayscale conversion (RGBA to luminance) for the decoder
//! - Frame pool (buffer reuse across scan ticks)

pub mod grayscale;
pub mod memory_pool;
