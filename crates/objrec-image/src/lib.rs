#![deny(missing_docs)]
//! Dense image buffers for color, mask and point grids

/// image representation for the per-pixel grids.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
