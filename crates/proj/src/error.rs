//! Error types for the hmdf-proj crate.

/// Error type for all fallible operations in the hmdf-proj crate.
///
/// Callers distinguish a coordinate system the transformer has never heard
/// of from a transform that is known but cannot be carried out.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjError {
    /// Returned when an EPSG code is not recognised by the transformer.
    #[error("unknown coordinate reference system EPSG:{epsg}")]
    UnknownCrs {
        /// The unrecognised EPSG code.
        epsg: i32,
    },

    /// Returned when both systems are known but the transform cannot be
    /// performed.
    #[error("transform EPSG:{from} -> EPSG:{to} unavailable: {reason}")]
    Unavailable {
        /// Source EPSG code.
        from: i32,
        /// Target EPSG code.
        to: i32,
        /// Why the transform failed.
        reason: String,
    },

    /// Returned when the x and y coordinate slices differ in length.
    #[error("coordinate length mismatch: {x_len} x values, {y_len} y values")]
    LengthMismatch {
        /// Number of x values.
        x_len: usize,
        /// Number of y values.
        y_len: usize,
    },

    /// Returned when a batch transform is given no coordinates.
    #[error("no coordinates to transform")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_unknown_crs() {
        let err = ProjError::UnknownCrs { epsg: 99999 };
        assert_eq!(
            err.to_string(),
            "unknown coordinate reference system EPSG:99999"
        );
    }

    #[test]
    fn error_unavailable() {
        let err = ProjError::Unavailable {
            from: 4326,
            to: 3857,
            reason: "latitude 90 outside projection domain".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "transform EPSG:4326 -> EPSG:3857 unavailable: latitude 90 outside projection domain"
        );
    }

    #[test]
    fn error_length_mismatch() {
        let err = ProjError::LengthMismatch { x_len: 3, y_len: 2 };
        assert_eq!(
            err.to_string(),
            "coordinate length mismatch: 3 x values, 2 y values"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<ProjError>();
    }
}
