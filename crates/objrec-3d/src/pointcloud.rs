use crate::{linalg::LinalgError, transforms::RigidTransform};

/// Error type for point cloud construction.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PointCloudError {
    /// The number of colors does not match the number of points.
    #[error("Number of points ({0}) does not match number of colors ({1})")]
    LengthMismatch(usize, usize),
}

/// A colored point cloud.
///
/// Points and colors are stored in insertion order and always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    // The points in the point cloud.
    points: Vec<[f64; 3]>,
    // The colors of the points.
    colors: Vec<[u8; 3]>,
}

impl PointCloud {
    /// Create a new point cloud from points and their colors.
    ///
    /// # Errors
    ///
    /// Returns [`PointCloudError::LengthMismatch`] if the number of colors differs from the
    /// number of points.
    pub fn new(points: Vec<[f64; 3]>, colors: Vec<[u8; 3]>) -> Result<Self, PointCloudError> {
        if points.len() != colors.len() {
            return Err(PointCloudError::LengthMismatch(points.len(), colors.len()));
        }
        Ok(Self { points, colors })
    }

    /// Create an empty point cloud with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Append a colored point at the end of the cloud.
    #[inline]
    pub fn push(&mut self, point: [f64; 3], color: [u8; 3]) {
        self.points.push(point);
        self.colors.push(color);
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Get as reference the colors of the points in the point cloud.
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Iterate over `(point, color)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64; 3], &[u8; 3])> + '_ {
        self.points.iter().zip(self.colors.iter())
    }

    /// Count the points whose three coordinates are finite.
    pub fn num_finite(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.iter().all(|v| v.is_finite()))
            .count()
    }

    /// Apply a rigid transform to every point.
    ///
    /// Returns a new cloud with the same colors and point order.
    pub fn transform(&self, transform: &RigidTransform) -> Result<PointCloud, LinalgError> {
        let mut points = vec![[0.0; 3]; self.points.len()];
        transform.transform_points(&self.points, &mut points)?;
        Ok(Self {
            points,
            colors: self.colors.clone(),
        })
    }
}
