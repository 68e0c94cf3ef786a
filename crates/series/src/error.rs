//! Error types for the hmdf-series crate.

use hmdf_calendar::CalendarError;
use hmdf_proj::ProjError;

/// Error type for all fallible operations in the hmdf-series crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a sample is built with a component count outside 1..=3.
    #[error("invalid sample dimension {dimension}, expected 1, 2 or 3")]
    InvalidDimension {
        /// The rejected component count.
        dimension: usize,
    },

    /// Returned when a sample's dimension differs from the station's.
    #[error("sample dimension mismatch: station holds {expected}-component samples, got {got}")]
    DimensionMismatch {
        /// Dimension of the samples already in the station.
        expected: usize,
        /// Dimension of the rejected sample.
        got: usize,
    },

    /// Returned when a component index is not present in a sample.
    #[error("component {index} out of range for a {dimension}-component sample")]
    ComponentOutOfRange {
        /// Requested component.
        index: usize,
        /// Dimension of the sample.
        dimension: usize,
    },

    /// Returned when a sample index is past the end of a station.
    #[error("sample index {index} out of range for station of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of samples in the station.
        len: usize,
    },

    /// Wraps a date arithmetic failure.
    #[error("calendar error: {source}")]
    Calendar {
        /// The underlying calendar error.
        #[from]
        source: CalendarError,
    },

    /// Wraps a coordinate transform failure.
    #[error("projection error: {source}")]
    Projection {
        /// The underlying transform error.
        #[from]
        source: ProjError,
    },
}
