#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Linear algebra utilities.
pub mod linalg;

/// Masked point cloud construction from organized point grids.
pub mod masked_cloud;

/// Point cloud types.
pub mod pointcloud;

/// Reconstruction operations moving views into object coordinates.
pub mod reconstruction;

/// 3D transforms algorithms.
pub mod transforms;

mod utils;
