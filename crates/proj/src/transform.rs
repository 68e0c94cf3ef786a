//! The coordinate transform interface consumed by the series containers.

use crate::error::ProjError;

/// Transforms coordinates between coordinate reference systems identified
/// by EPSG code.
///
/// Coordinates are ordered `(x, y)`; for geographic systems that is
/// `(longitude, latitude)` in degrees.
pub trait CoordinateTransform {
    /// Transforms a batch of coordinates from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjError::UnknownCrs`] if either code is not recognised,
    /// [`ProjError::Unavailable`] if the transform cannot be performed,
    /// [`ProjError::LengthMismatch`] if `x` and `y` differ in length, and
    /// [`ProjError::Empty`] if there is nothing to transform.
    fn transform_batch(
        &self,
        from: i32,
        to: i32,
        x: &[f64],
        y: &[f64],
    ) -> Result<(Vec<f64>, Vec<f64>), ProjError>;

    /// Whether the transformer knows the given EPSG code.
    fn contains_epsg(&self, epsg: i32) -> bool;

    /// Transforms a single coordinate.
    ///
    /// # Errors
    ///
    /// Same as [`CoordinateTransform::transform_batch`].
    fn transform(&self, from: i32, to: i32, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (xs, ys) = self.transform_batch(from, to, &[x], &[y])?;
        match (xs.first(), ys.first()) {
            (Some(&x), Some(&y)) => Ok((x, y)),
            _ => Err(ProjError::Empty),
        }
    }
}

/// Checks the shared batch preconditions.
///
/// # Errors
///
/// Returns [`ProjError::LengthMismatch`] or [`ProjError::Empty`].
pub fn check_batch(x: &[f64], y: &[f64]) -> Result<(), ProjError> {
    if x.len() != y.len() {
        return Err(ProjError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.is_empty() {
        return Err(ProjError::Empty);
    }
    Ok(())
}
