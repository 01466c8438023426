#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access and encoding/decoding failures.
pub mod error;

/// High-level mask reading functions.
///
/// See [`functional::read_mask`] for automatic format detection.
pub mod functional;

/// PNG mask encoding and decoding.
///
/// Read masks from PNG images of any common bit depth and color type, and
/// write masks as 8-bit grayscale PNG.
pub mod png;

pub use crate::error::IoError;
