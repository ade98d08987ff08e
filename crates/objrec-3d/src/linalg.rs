use crate::utils;

/// Error type for linear algebra operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LinalgError {
    /// The source and destination point buffers differ in length.
    #[error("Source and destination must have the same length ({0} != {1})")]
    LengthMismatch(usize, usize),
}

/// Transform a set of points using a rotation and translation.
///
/// Computes `dst = dst_r_src * src + dst_t_src` for every point.
///
/// # Arguments
///
/// * `src_points` - A set of points to be transformed.
/// * `dst_r_src` - A row-major rotation matrix.
/// * `dst_t_src` - A translation vector.
/// * `dst_points` - A pre-allocated vector to store the transformed points.
///
/// PRECONDITION: dst_points is a pre-allocated vector of the same size as source.
///
/// Example:
///
/// ```
/// use objrec_3d::linalg::transform_points3d;
///
/// let src_points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
/// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let translation = [0.0, 0.0, 1.0];
/// let mut dst_points = vec![[0.0; 3]; src_points.len()];
/// transform_points3d(&src_points, &rotation, &translation, &mut dst_points).unwrap();
/// assert_eq!(dst_points[1], [3.0, 4.0, 6.0]);
/// ```
pub fn transform_points3d(
    src_points: &[[f64; 3]],
    dst_r_src: &[[f64; 3]; 3],
    dst_t_src: &[f64; 3],
    dst_points: &mut [[f64; 3]],
) -> Result<(), LinalgError> {
    if src_points.len() != dst_points.len() {
        return Err(LinalgError::LengthMismatch(
            src_points.len(),
            dst_points.len(),
        ));
    }

    if src_points.is_empty() {
        return Ok(());
    }

    {
        let dst_r_src_mat = utils::array33_to_faer_mat33(dst_r_src);
        // Nx3, one point per row
        let points_in_src = utils::points_to_faer_mat(src_points);
        // 3xN, one point per column
        let mut points_in_dst = utils::points_to_faer_mat_mut(dst_points);

        faer::linalg::matmul::matmul(
            &mut points_in_dst,
            dst_r_src_mat,
            points_in_src.transpose(),
            None,
            1.0,
            faer::Parallelism::None,
        );
    }

    let [tx, ty, tz] = *dst_t_src;
    for point in dst_points.iter_mut() {
        point[0] += tx;
        point[1] += ty;
        point[2] += tz;
    }

    Ok(())
}

/// Compute the dot product of two 3-vectors.
#[inline]
pub fn dot_product3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Transpose a 3x3 matrix.
pub fn transpose33(m: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Multiply two 3x3 matrices, `m = a * b`.
pub fn matmul33(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3], m: &mut [[f64; 3]; 3]) {
    for (i, row) in m.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
}

/// Multiply a 3x3 matrix by a 3-vector.
pub fn mat33_mul_vec3(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        dot_product3(&m[0], v),
        dot_product3(&m[1], v),
        dot_product3(&m[2], v),
    ]
}
