//! One timestamped observation of one to three components.

use std::cmp::Ordering;

use hmdf_calendar::Date;

use crate::error::SeriesError;

/// Marks a missing component.
pub const NULL_VALUE: f64 = f64::MAX;

/// Values at or below this are missing-data flags in every supported format.
pub const MISSING_THRESHOLD: f64 = -9999.0;

/// Maps source missing-data flags to [`NULL_VALUE`].
pub fn null_if_missing(value: f64) -> f64 {
    if value <= MISSING_THRESHOLD {
        NULL_VALUE
    } else {
        value
    }
}

/// A timestamp with a fixed number (1..=3) of components.
///
/// Equality compares the timestamp and every component. There is no
/// `PartialOrd`: use [`Sample::cmp_by_date`] for ordering, which ignores the
/// values.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    date: Date,
    values: [f64; 3],
    dimension: u8,
}

impl Sample {
    /// A one-component sample.
    pub fn scalar(date: Date, value: f64) -> Self {
        Self {
            date,
            values: [value, 0.0, 0.0],
            dimension: 1,
        }
    }

    /// A two-component sample, e.g. `(u, v)`.
    pub fn vector(date: Date, u: f64, v: f64) -> Self {
        Self {
            date,
            values: [u, v, 0.0],
            dimension: 2,
        }
    }

    /// A three-component sample.
    pub fn triple(date: Date, a: f64, b: f64, c: f64) -> Self {
        Self {
            date,
            values: [a, b, c],
            dimension: 3,
        }
    }

    /// A sample from a slice of components.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidDimension`] unless `values` has 1 to 3
    /// elements.
    pub fn new(date: Date, values: &[f64]) -> Result<Self, SeriesError> {
        match *values {
            [a] => Ok(Self::scalar(date, a)),
            [a, b] => Ok(Self::vector(date, a, b)),
            [a, b, c] => Ok(Self::triple(date, a, b, c)),
            _ => Err(SeriesError::InvalidDimension {
                dimension: values.len(),
            }),
        }
    }

    /// A sample whose components are all [`NULL_VALUE`].
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidDimension`] unless `dimension` is 1..=3.
    pub fn null(date: Date, dimension: usize) -> Result<Self, SeriesError> {
        if !(1..=3).contains(&dimension) {
            return Err(SeriesError::InvalidDimension { dimension });
        }
        Ok(Self {
            date,
            values: [NULL_VALUE; 3],
            dimension: dimension as u8,
        })
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn set_date(&mut self, date: Date) {
        self.date = date;
    }

    /// Number of components.
    pub fn dimension(&self) -> usize {
        usize::from(self.dimension)
    }

    pub fn values(&self) -> &[f64] {
        &self.values[..self.dimension()]
    }

    /// Component `index`, or `None` past the sample's dimension.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values().get(index).copied()
    }

    /// The first component.
    pub fn value(&self) -> f64 {
        self.values[0]
    }

    /// Replaces component `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::ComponentOutOfRange`] past the sample's
    /// dimension.
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<(), SeriesError> {
        let dimension = self.dimension();
        let slot = self.values[..dimension]
            .get_mut(index)
            .ok_or(SeriesError::ComponentOutOfRange { index, dimension })?;
        *slot = value;
        Ok(())
    }

    /// Whether component `index` is missing. Components past the sample's
    /// dimension count as missing.
    pub fn is_null(&self, index: usize) -> bool {
        self.get(index).is_none_or(|v| v == NULL_VALUE)
    }

    /// Euclidean norm of the components, or `None` if any is missing.
    pub fn magnitude(&self) -> Option<f64> {
        if self.values().contains(&NULL_VALUE) {
            return None;
        }
        Some(self.values().iter().map(|v| v * v).sum::<f64>().sqrt())
    }

    /// Direction of a two-component sample in degrees, in `[0, 360)`,
    /// measured counterclockwise from the first axis.
    pub fn direction(&self) -> Option<f64> {
        if self.dimension != 2 || self.is_null(0) || self.is_null(1) {
            return None;
        }
        let degrees = self.values[1].atan2(self.values[0]).to_degrees();
        Some(if degrees < 0.0 { degrees + 360.0 } else { degrees })
    }

    /// Moves the timestamp by `seconds` and adds `offset` to the first
    /// component unless it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Calendar`] if the new timestamp is out of
    /// range.
    pub fn shift(&mut self, seconds: i64, offset: f64) -> Result<(), SeriesError> {
        self.date = self.date.add_seconds(seconds)?;
        if !self.is_null(0) {
            self.values[0] += offset;
        }
        Ok(())
    }

    /// Orders two samples by timestamp only.
    pub fn cmp_by_date(&self, other: &Sample) -> Ordering {
        self.date.cmp(&other.date)
    }

    /// Whether two samples share a timestamp, regardless of values.
    pub fn date_equal(&self, other: &Sample) -> bool {
        self.date == other.date
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.values() == other.values()
    }
}
