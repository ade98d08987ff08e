use objrec_image::Image;

use crate::{
    linalg::LinalgError,
    masked_cloud::{masked_cloud_from_points3d, MaskedCloudError},
    pointcloud::PointCloud,
    transforms::RigidTransform,
};

/// Tolerance used to report rotations that are not orthonormal.
const ORTHONORMAL_TOLERANCE: f64 = 1e-6;

/// Error type for the point cloud transform.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PointCloudTransformError {
    /// A required input binding has no value.
    #[error("Missing required input `{0}`")]
    MissingInput(&'static str),

    /// The point grid, image and mask disagree in size.
    #[error(transparent)]
    ShapeMismatch(#[from] MaskedCloudError),

    /// A matrix input does not have the expected number of elements.
    #[error("Input `{name}` must have {expected} elements, got {got}")]
    MatrixShapeMismatch {
        /// Name of the input binding.
        name: &'static str,
        /// Expected number of elements.
        expected: usize,
        /// Actual number of elements.
        got: usize,
    },

    /// Failed to apply the transform to the points.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Inputs of [`point_cloud_transform`].
///
/// `rotation` and `translation` describe the object pose in the camera frame,
/// `p_cam = rotation * p_obj + translation`.
#[derive(Debug, Clone, Copy)]
pub struct PointCloudTransformInput<'a> {
    /// The rotation matrix R, 3x3 row-major.
    pub rotation: &'a [[f64; 3]; 3],
    /// The translation vector T, 3x1.
    pub translation: &'a [f64; 3],
    /// The rgb image.
    pub image: &'a Image<u8, 3>,
    /// The binary mask for valid points, non-zero means valid.
    pub mask: &'a Image<u8, 1>,
    /// The 3d points in camera coordinates.
    pub points3d: &'a Image<f64, 3>,
}

/// Outputs of [`point_cloud_transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloudTransformOutput {
    /// The current 3d view, masked and transformed into object coordinates.
    pub view: PointCloud,
}

/// Collects the named input bindings of [`point_cloud_transform`].
///
/// Mirrors a host that hands over inputs one by one and checks that every required binding is
/// set before running the operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointCloudTransformInputBuilder<'a> {
    rotation: Option<&'a [[f64; 3]; 3]>,
    translation: Option<&'a [f64; 3]>,
    image: Option<&'a Image<u8, 3>>,
    mask: Option<&'a Image<u8, 1>>,
    points3d: Option<&'a Image<f64, 3>>,
}

impl<'a> PointCloudTransformInputBuilder<'a> {
    /// Create a builder with no bindings set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `R` binding.
    pub fn rotation(mut self, rotation: &'a [[f64; 3]; 3]) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Set the `T` binding.
    pub fn translation(mut self, translation: &'a [f64; 3]) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Set the `image` binding.
    pub fn image(mut self, image: &'a Image<u8, 3>) -> Self {
        self.image = Some(image);
        self
    }

    /// Set the `mask` binding.
    pub fn mask(mut self, mask: &'a Image<u8, 1>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Set the `points3d` binding.
    pub fn points3d(mut self, points3d: &'a Image<f64, 3>) -> Self {
        self.points3d = Some(points3d);
        self
    }

    /// Check that every binding is set.
    ///
    /// # Errors
    ///
    /// Returns [`PointCloudTransformError::MissingInput`] naming the first unset binding.
    pub fn build(self) -> Result<PointCloudTransformInput<'a>, PointCloudTransformError> {
        Ok(PointCloudTransformInput {
            rotation: self
                .rotation
                .ok_or(PointCloudTransformError::MissingInput("R"))?,
            translation: self
                .translation
                .ok_or(PointCloudTransformError::MissingInput("T"))?,
            image: self
                .image
                .ok_or(PointCloudTransformError::MissingInput("image"))?,
            mask: self
                .mask
                .ok_or(PointCloudTransformError::MissingInput("mask"))?,
            points3d: self
                .points3d
                .ok_or(PointCloudTransformError::MissingInput("points3d"))?,
        })
    }
}

/// Read a 3x3 rotation from a flat row-major buffer of 9 elements.
///
/// # Errors
///
/// Returns [`PointCloudTransformError::MatrixShapeMismatch`] if the buffer is not 9 long.
pub fn rotation_from_slice(data: &[f64]) -> Result<[[f64; 3]; 3], PointCloudTransformError> {
    if data.len() != 9 {
        return Err(PointCloudTransformError::MatrixShapeMismatch {
            name: "R",
            expected: 9,
            got: data.len(),
        });
    }
    let mut rotation = [[0.0; 3]; 3];
    for (row, chunk) in rotation.iter_mut().zip(data.chunks_exact(3)) {
        row.copy_from_slice(chunk);
    }
    Ok(rotation)
}

/// Read a 3x1 translation from a flat buffer of 3 elements.
///
/// # Errors
///
/// Returns [`PointCloudTransformError::MatrixShapeMismatch`] if the buffer is not 3 long.
pub fn translation_from_slice(data: &[f64]) -> Result<[f64; 3], PointCloudTransformError> {
    match data {
        &[x, y, z] => Ok([x, y, z]),
        _ => Err(PointCloudTransformError::MatrixShapeMismatch {
            name: "T",
            expected: 3,
            got: data.len(),
        }),
    }
}

/// Transform a masked point grid into object coordinates.
///
/// Builds a colored cloud from the pixels selected by `mask`, in row-major scan order, then
/// applies the inverse of the object pose `(R, T)` so that every point ends up expressed as
/// `p_obj = R^T * (p_cam - T)`. Colors and point order are preserved. Points that are not finite
/// are passed through.
///
/// # Arguments
///
/// * `input` - The rotation, translation, rgb image, mask and 3d points.
///
/// # Returns
///
/// The masked view in object coordinates.
///
/// # Errors
///
/// Returns [`PointCloudTransformError::ShapeMismatch`] if the image, mask and points do not
/// share the same size.
///
/// Example:
///
/// ```
/// use objrec_image::{Image, ImageSize};
/// use objrec_3d::reconstruction::{point_cloud_transform, PointCloudTransformInput};
///
/// let size = ImageSize { width: 1, height: 1 };
/// let image = Image::<u8, 3>::new(size, vec![10, 20, 30]).unwrap();
/// let mask = Image::<u8, 1>::new(size, vec![255]).unwrap();
/// let points3d = Image::<f64, 3>::new(size, vec![1.0, 2.0, 3.0]).unwrap();
/// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
///
/// let output = point_cloud_transform(&PointCloudTransformInput {
///     rotation: &rotation,
///     translation: &[0.0, 0.0, 1.0],
///     image: &image,
///     mask: &mask,
///     points3d: &points3d,
/// })
/// .unwrap();
///
/// assert_eq!(output.view.points(), &[[1.0, 2.0, 2.0]]);
/// assert_eq!(output.view.colors(), &[[10, 20, 30]]);
/// ```
pub fn point_cloud_transform(
    input: &PointCloudTransformInput<'_>,
) -> Result<PointCloudTransformOutput, PointCloudTransformError> {
    let now = std::time::Instant::now();

    // extract the cloud
    let cloud = masked_cloud_from_points3d(input.points3d, input.image, input.mask)?;

    // compute the inverse transform, camera to object
    let obj_from_cam = RigidTransform::from_rt(input.rotation, input.translation, true);
    if !obj_from_cam.is_orthonormal(ORTHONORMAL_TOLERANCE) {
        log::warn!(
            "rotation is not orthonormal, the transformed view will be distorted: {:?}",
            input.rotation
        );
    }

    let view = cloud.transform(&obj_from_cam)?;

    let num_finite = view.num_finite();
    if num_finite != view.len() {
        log::warn!(
            "view contains {} non-finite points out of {}",
            view.len() - num_finite,
            view.len()
        );
    }

    log::debug!(
        "masked {} of {} pixels into object coordinates in {:?}",
        view.len(),
        input.mask.size().num_pixels(),
        now.elapsed()
    );

    Ok(PointCloudTransformOutput { view })
}
