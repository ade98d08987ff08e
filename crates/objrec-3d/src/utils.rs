/// Utility function to view a 3x3 row-major array as a faer matrix.
///
/// # Arguments
///
/// * `array` - A 3x3 array.
///
/// # Returns
///
/// A faer matrix 3x3.
pub(crate) fn array33_to_faer_mat33(array: &[[f64; 3]; 3]) -> faer::MatRef<'_, f64> {
    faer::mat::from_row_major_slice(array.as_flattened(), 3, 3)
}

/// Utility function to view a slice of points as a faer Nx3 matrix, one point per row.
pub(crate) fn points_to_faer_mat(points: &[[f64; 3]]) -> faer::MatRef<'_, f64> {
    faer::mat::from_row_major_slice(points.as_flattened(), points.len(), 3)
}

/// Utility function to view a mutable slice of points as a faer 3xN matrix, one point per column.
pub(crate) fn points_to_faer_mat_mut(points: &mut [[f64; 3]]) -> faer::MatMut<'_, f64> {
    let num_points = points.len();
    faer::mat::from_column_major_slice_mut(points.as_flattened_mut(), 3, num_points)
}
