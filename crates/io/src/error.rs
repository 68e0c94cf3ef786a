//! Error types for hmdf-io.

use std::path::PathBuf;

use hmdf_calendar::CalendarError;
use hmdf_series::SeriesError;

use crate::nefis::NefisError;

/// Error type for all fallible operations in the hmdf-io crate.
///
/// Variants fall into three groups: the input does not have the expected
/// shape, a collaborator library reported a failure, or an operation was
/// called in the wrong state or with arguments the data cannot satisfy.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when no reader recognises the file.
    #[error("no usable format for {}", path.display())]
    UnknownFormat {
        /// Path that was inspected.
        path: PathBuf,
    },

    /// Returned when an ADCIRC ASCII file is read without a station file.
    #[error("{} needs a station location file", path.display())]
    StationFileRequired {
        /// The data file being read.
        path: PathBuf,
    },

    /// Returned when the station file and data file disagree on the number
    /// of stations.
    #[error("station count mismatch: station file has {station_file}, data file has {data_file}")]
    StationCountMismatch {
        /// Count from the station location file.
        station_file: usize,
        /// Count from the data file header.
        data_file: usize,
    },

    /// Returned when a text line cannot be parsed.
    #[error("{}:{line}: {reason}", path.display())]
    MalformedLine {
        /// File containing the line.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a station output file has none of the known payload
    /// variables.
    #[error("no valid variables found in {}", path.display())]
    NoPayload {
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a required dimension is not present in a file.
    #[error("dimension '{name}' not found in {}", path.display())]
    MissingDimension {
        /// Name of the missing dimension.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a required attribute is absent or has the wrong type.
    #[error("attribute '{name}' on '{variable}' missing or invalid in {}", path.display())]
    MissingAttribute {
        /// Attribute name.
        name: String,
        /// Variable carrying the attribute.
        variable: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a dimension or buffer has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a time value cannot be parsed or is out of range.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the time parsing issue.
        reason: String,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Wraps an error originating from the NEFIS library.
    #[error("nefis error: {reason}")]
    Nefis {
        /// Description of the underlying NEFIS failure.
        reason: String,
    },

    /// Wraps a coordinate transform failure.
    #[error("projection error: {reason}")]
    Projection {
        /// Description of the transform failure.
        reason: String,
    },

    /// Wraps an operating system I/O failure.
    #[error("i/o error: {reason}")]
    Io {
        /// Description of the I/O failure.
        reason: String,
    },

    /// Wraps an error originating from the hmdf-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// Wraps a series container error other than a projection failure.
    #[error("series error: {reason}")]
    Series {
        /// Description of the underlying series failure.
        reason: String,
    },

    /// Returned when an operation needs state that has not been loaded.
    #[error("{operation} called before the file header was read")]
    NotReady {
        /// The operation that was attempted.
        operation: String,
    },

    /// Returned when a named series is not in the catalog.
    #[error("series '{name}' not found in catalog")]
    UnknownSeries {
        /// The requested series name.
        name: String,
    },

    /// Returned when a layer index is outside the variable's layers.
    #[error("layer {layer} out of range for '{name}' (1..={layers})")]
    InvalidLayer {
        /// Series name.
        name: String,
        /// Requested 1-based layer.
        layer: usize,
        /// Number of layers the series declares.
        layers: usize,
    },

    /// Returned when a series has a storage type that cannot be decoded.
    #[error("series '{name}' has unsupported storage type '{type_name}'")]
    UnsupportedType {
        /// Series name.
        name: String,
        /// The storage type tag.
        type_name: String,
    },

    /// Returned when a station index is past the end of the dataset.
    #[error("station index {index} out of range for dataset of {len} stations")]
    StationIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of stations.
        len: usize,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<NefisError> for IoError {
    fn from(e: NefisError) -> Self {
        IoError::Nefis {
            reason: e.to_string(),
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io {
            reason: e.to_string(),
        }
    }
}

impl From<CalendarError> for IoError {
    fn from(e: CalendarError) -> Self {
        IoError::Calendar {
            reason: e.to_string(),
        }
    }
}

impl From<SeriesError> for IoError {
    fn from(e: SeriesError) -> Self {
        match e {
            SeriesError::Projection { source } => IoError::Projection {
                reason: source.to_string(),
            },
            other => IoError::Series {
                reason: other.to_string(),
            },
        }
    }
}
