#![deny(missing_docs)]
//! Binary mask types used to restrict a similarity metric to a region of interest.

/// binary mask representation.
pub mod mask;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::mask::{ImageSize, Mask};
