use objrec_image::{Image, ImageSize};

use crate::pointcloud::PointCloud;

/// Error type for masked point cloud construction.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MaskedCloudError {
    /// The input grids do not share the same size.
    #[error("Shape mismatch: points3d {points3d}, image {image}, mask {mask}")]
    ShapeMismatch {
        /// Size of the point grid.
        points3d: ImageSize,
        /// Size of the color image.
        image: ImageSize,
        /// Size of the validity mask.
        mask: ImageSize,
    },
}

/// Build a colored point cloud from an organized point grid, keeping only masked-in pixels.
///
/// The grid is scanned in row-major order. For every pixel whose mask value is non-zero, the
/// point at that pixel is appended together with the color of the same pixel. Masked-out pixels
/// are skipped. Non-finite points under the mask are kept as they are.
///
/// # Arguments
///
/// * `points3d` - The per-pixel camera space points with shape (H, W, 3).
/// * `image` - The rgb image with shape (H, W, 3).
/// * `mask` - The validity mask with shape (H, W, 1), zero means invalid.
///
/// # Returns
///
/// The masked cloud, one point per valid mask entry, in scan order.
///
/// # Errors
///
/// Returns [`MaskedCloudError::ShapeMismatch`] if the three grids do not have the same size.
///
/// Example:
///
/// ```
/// use objrec_image::{Image, ImageSize};
/// use objrec_3d::masked_cloud::masked_cloud_from_points3d;
///
/// let size = ImageSize { width: 2, height: 1 };
/// let points3d = Image::<f64, 3>::new(size, vec![0.0, 0.0, 1.0, 1.0, 0.0, 1.0]).unwrap();
/// let image = Image::<u8, 3>::new(size, vec![255, 0, 0, 0, 255, 0]).unwrap();
/// let mask = Image::<u8, 1>::new(size, vec![0, 255]).unwrap();
///
/// let cloud = masked_cloud_from_points3d(&points3d, &image, &mask).unwrap();
/// assert_eq!(cloud.points(), &[[1.0, 0.0, 1.0]]);
/// assert_eq!(cloud.colors(), &[[0, 255, 0]]);
/// ```
pub fn masked_cloud_from_points3d(
    points3d: &Image<f64, 3>,
    image: &Image<u8, 3>,
    mask: &Image<u8, 1>,
) -> Result<PointCloud, MaskedCloudError> {
    if points3d.size() != image.size() || points3d.size() != mask.size() {
        return Err(MaskedCloudError::ShapeMismatch {
            points3d: points3d.size(),
            image: image.size(),
            mask: mask.size(),
        });
    }

    let num_valid = mask.as_slice().iter().filter(|&&m| m != 0).count();
    let mut cloud = PointCloud::with_capacity(num_valid);

    points3d
        .pixels()
        .zip(image.pixels())
        .zip(mask.as_slice())
        .filter(|&(_, &m)| m != 0)
        .for_each(|((point, color), _)| {
            cloud.push([point[0], point[1], point[2]], [color[0], color[1], color[2]]);
        });

    Ok(cloud)
}
