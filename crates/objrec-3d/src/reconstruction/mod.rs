//! # Reconstruction
//!
//! Operations feeding object reconstruction from registered views.
//!
//! - [`point_cloud_transform()`]: mask an organized point grid, color it and move it from camera
//!   coordinates into object coordinates.

mod point_cloud_transform;
pub use point_cloud_transform::*;
