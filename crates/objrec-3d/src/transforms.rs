use crate::linalg::{self, LinalgError};

/// Error type for the transforms module.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TransformError {
    /// The rotation axis has zero length.
    #[error("Cannot compute rotation matrix from a zero vector")]
    ZeroAxis,
}

/// A rigid motion `p_dst = rotation * p_src + translation`.
///
/// The rotation is stored row-major and is expected to be orthonormal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// Rotation matrix, row-major.
    pub rotation: [[f64; 3]; 3],
    /// Translation vector.
    pub translation: [f64; 3],
}

impl RigidTransform {
    /// Create a transform from a rotation and a translation.
    pub fn new(rotation: [[f64; 3]; 3], translation: [f64; 3]) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            [0.0, 0.0, 0.0],
        )
    }

    /// Build a transform from a pose `(R, T)` describing `p_cam = R * p_obj + T`.
    ///
    /// # Arguments
    ///
    /// * `rotation` - The rotation R, object to camera.
    /// * `translation` - The translation T, object to camera.
    /// * `inverse` - When true, return the camera to object transform
    ///   `p_obj = R^T * (p_cam - T)` instead.
    ///
    /// PRECONDITION: rotation is orthonormal, so its transpose is its inverse.
    ///
    /// Example:
    ///
    /// ```
    /// use objrec_3d::transforms::RigidTransform;
    ///
    /// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    /// let obj_from_cam = RigidTransform::from_rt(&rotation, &[0.0, 0.0, 1.0], true);
    /// assert_eq!(obj_from_cam.translation, [0.0, 0.0, -1.0]);
    /// ```
    pub fn from_rt(rotation: &[[f64; 3]; 3], translation: &[f64; 3], inverse: bool) -> Self {
        let transform = Self::new(*rotation, *translation);
        match inverse {
            true => transform.inverse(),
            false => transform,
        }
    }

    /// Invert the rigid motion: `R' = R^T`, `t' = -R^T * t`.
    pub fn inverse(&self) -> Self {
        let rotation = linalg::transpose33(&self.rotation);
        let t = linalg::mat33_mul_vec3(&rotation, &self.translation);
        Self::new(rotation, [-t[0], -t[1], -t[2]])
    }

    /// Compose two transforms, `self * other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &RigidTransform) -> Self {
        let mut rotation = [[0.0; 3]; 3];
        linalg::matmul33(&self.rotation, &other.rotation, &mut rotation);
        let t = linalg::mat33_mul_vec3(&self.rotation, &other.translation);
        Self::new(
            rotation,
            [
                t[0] + self.translation[0],
                t[1] + self.translation[1],
                t[2] + self.translation[2],
            ],
        )
    }

    /// Apply the transform to a single point.
    pub fn apply(&self, point: &[f64; 3]) -> [f64; 3] {
        let p = linalg::mat33_mul_vec3(&self.rotation, point);
        [
            p[0] + self.translation[0],
            p[1] + self.translation[1],
            p[2] + self.translation[2],
        ]
    }

    /// Apply the transform to a set of points.
    ///
    /// PRECONDITION: dst_points is a pre-allocated vector of the same size as source.
    pub fn transform_points(
        &self,
        src_points: &[[f64; 3]],
        dst_points: &mut [[f64; 3]],
    ) -> Result<(), LinalgError> {
        linalg::transform_points3d(src_points, &self.rotation, &self.translation, dst_points)
    }

    /// Check whether `R * R^T` is the identity within `tol` and `det(R)` is positive.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        let mut rrt = [[0.0; 3]; 3];
        linalg::matmul33(
            &self.rotation,
            &linalg::transpose33(&self.rotation),
            &mut rrt,
        );
        let near_identity = rrt.iter().enumerate().all(|(i, row)| {
            row.iter().enumerate().all(|(j, &v)| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (v - expected).abs() <= tol
            })
        });
        near_identity && determinant33(&self.rotation) > 0.0
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

fn determinant33(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Compute the rotation matrix from an axis and angle.
///
/// # Arguments
///
/// * `axis` - The axis of rotation. It is normalized internally.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The rotation matrix.
///
/// Example:
///
/// ```
/// use objrec_3d::transforms::axis_angle_to_rotation_matrix;
///
/// let axis = [1.0, 0.0, 0.0];
/// let angle = std::f64::consts::PI / 2.0;
/// let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap();
/// assert!((rotation[1][2] + 1.0).abs() < 1e-12);
/// ```
pub fn axis_angle_to_rotation_matrix(
    axis: &[f64; 3],
    angle: f64,
) -> Result<[[f64; 3]; 3], TransformError> {
    let magnitude = linalg::dot_product3(axis, axis).sqrt();
    if magnitude < 1e-10 {
        return Err(TransformError::ZeroAxis);
    }

    let x = axis[0] / magnitude;
    let y = axis[1] / magnitude;
    let z = axis[2] / magnitude;

    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    Ok([
        [c + x * x * t, x * y * t - z * s, x * z * t + y * s],
        [x * y * t + z * s, c + y * y * t, y * z * t - x * s],
        [x * z * t - y * s, y * z * t + x * s, c + z * z * t],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_mat33_eq(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) {
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a[i][j], b[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_axis_angle_to_rotation_matrix() -> Result<(), TransformError> {
        let axis = [1.0, 0.0, 0.0];
        let angle = std::f64::consts::PI / 2.0;
        let rotation = axis_angle_to_rotation_matrix(&axis, angle)?;
        let expected = [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
        assert_mat33_eq(&rotation, &expected);
        Ok(())
    }

    #[test]
    fn test_axis_angle_zero_axis() {
        let res = axis_angle_to_rotation_matrix(&[0.0, 0.0, 0.0], 1.0);
        assert_eq!(res, Err(TransformError::ZeroAxis));
    }

    #[test]
    fn test_from_rt_forward_and_inverse() {
        let rotation = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let translation = [1.0, 2.0, 3.0];

        let cam_from_obj = RigidTransform::from_rt(&rotation, &translation, false);
        assert_eq!(cam_from_obj, RigidTransform::new(rotation, translation));

        let obj_from_cam = RigidTransform::from_rt(&rotation, &translation, true);
        assert_mat33_eq(
            &obj_from_cam.rotation,
            &[[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        );
        // -R^T * t
        assert_eq!(obj_from_cam.translation, [-2.0, 1.0, -3.0]);

        let p_obj = [0.5, -1.0, 2.0];
        let p_cam = cam_from_obj.apply(&p_obj);
        let p_back = obj_from_cam.apply(&p_cam);
        for i in 0..3 {
            assert_relative_eq!(p_back[i], p_obj[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inverse_compose_is_identity() -> Result<(), TransformError> {
        let rotation = axis_angle_to_rotation_matrix(&[1.0, 2.0, -0.5], 0.7)?;
        let transform = RigidTransform::new(rotation, [0.3, -4.0, 2.5]);
        let composed = transform.compose(&transform.inverse());
        let identity = RigidTransform::identity();
        assert_mat33_eq(&composed.rotation, &identity.rotation);
        for i in 0..3 {
            assert_relative_eq!(composed.translation[i], 0.0, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_transform_points_matches_apply() -> Result<(), Box<dyn std::error::Error>> {
        let rotation = axis_angle_to_rotation_matrix(&[0.0, 1.0, 1.0], -1.2)?;
        let transform = RigidTransform::new(rotation, [1.0, 0.0, -2.0]);
        let src = vec![[1.0, 2.0, 3.0], [-4.0, 0.5, 9.0]];
        let mut dst = vec![[0.0; 3]; src.len()];
        transform.transform_points(&src, &mut dst)?;
        for (d, s) in dst.iter().zip(src.iter()) {
            let expected = transform.apply(s);
            for i in 0..3 {
                assert_relative_eq!(d[i], expected[i], epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_is_orthonormal() -> Result<(), TransformError> {
        let rotation = axis_angle_to_rotation_matrix(&[0.2, 0.1, 1.0], 2.1)?;
        assert!(RigidTransform::new(rotation, [0.0; 3]).is_orthonormal(1e-9));
        assert!(RigidTransform::identity().is_orthonormal(1e-9));

        let scaled = [[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert!(!RigidTransform::new(scaled, [0.0; 3]).is_orthonormal(1e-6));

        let reflection = [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert!(!RigidTransform::new(reflection, [0.0; 3]).is_orthonormal(1e-6));
        Ok(())
    }
}
