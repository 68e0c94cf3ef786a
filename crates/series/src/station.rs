//! The per-station series container.

use std::fmt;

use hmdf_proj::{CoordinateTransform, WGS84};
use tracing::debug;

use crate::error::SeriesError;
use crate::sample::Sample;

/// Name given to stations whose source carries none.
pub const DEFAULT_NAME: &str = "noname";

/// Placeholder for absent datum, units and timezone metadata.
pub const NONE_TOKEN: &str = "none";

/// A coordinate tagged with its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub epsg: i32,
}

/// Samples and site metadata for one station.
///
/// Two locations are kept. The original location is the one read from the
/// source; the current location is the result of the latest
/// [`reproject`](Station::reproject). Reprojection always starts from the
/// original, so repeated calls never accumulate error.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    index: usize,
    id: String,
    name: String,
    datum: String,
    units: String,
    timezone: String,
    original: Location,
    current: Location,
    samples: Vec<Sample>,
}

impl Default for Station {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Station {
    /// An empty station at `(0, 0)` in EPSG:4326.
    pub fn new(index: usize) -> Self {
        let origin = Location {
            x: 0.0,
            y: 0.0,
            epsg: WGS84,
        };
        Self {
            index,
            id: index.to_string(),
            name: DEFAULT_NAME.to_string(),
            datum: NONE_TOKEN.to_string(),
            units: NONE_TOKEN.to_string(),
            timezone: NONE_TOKEN.to_string(),
            original: origin,
            current: origin,
            samples: Vec::new(),
        }
    }

    /// An empty station at `(x, y)` in the given coordinate system.
    pub fn at(index: usize, x: f64, y: f64, epsg: i32) -> Self {
        let mut station = Self::new(index);
        station.set_location(x, y);
        station.set_epsg(epsg);
        station
    }

    // -----------------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------------

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn datum(&self) -> &str {
        &self.datum
    }

    pub fn set_datum(&mut self, datum: impl Into<String>) {
        self.datum = datum.into();
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = units.into();
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn set_timezone(&mut self, timezone: impl Into<String>) {
        self.timezone = timezone.into();
    }

    // -----------------------------------------------------------------------
    // Location
    // -----------------------------------------------------------------------

    /// Current x (longitude for geographic systems).
    pub fn x(&self) -> f64 {
        self.current.x
    }

    /// Current y (latitude for geographic systems).
    pub fn y(&self) -> f64 {
        self.current.y
    }

    /// EPSG code of the current location.
    pub fn epsg(&self) -> i32 {
        self.current.epsg
    }

    pub fn location(&self) -> Location {
        self.current
    }

    pub fn original_location(&self) -> Location {
        self.original
    }

    /// Sets both the original and current coordinate.
    pub fn set_location(&mut self, x: f64, y: f64) {
        self.original.x = x;
        self.original.y = y;
        self.current.x = x;
        self.current.y = y;
    }

    /// Tags both the original and current coordinate with `epsg` without
    /// transforming anything.
    pub fn set_epsg(&mut self, epsg: i32) {
        self.original.epsg = epsg;
        self.current.epsg = epsg;
    }

    /// Recomputes the current location in `epsg` from the original location.
    ///
    /// On error the current location is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Projection`] if the transform fails.
    pub fn reproject(
        &mut self,
        epsg: i32,
        transform: &dyn CoordinateTransform,
    ) -> Result<(), SeriesError> {
        self.current = self.projected(epsg, transform)?;
        Ok(())
    }

    /// The original location transformed to `epsg`, without changing the
    /// station.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Projection`] if the transform fails.
    pub fn projected(
        &self,
        epsg: i32,
        transform: &dyn CoordinateTransform,
    ) -> Result<Location, SeriesError> {
        if epsg == self.original.epsg {
            return Ok(self.original);
        }
        let (x, y) = transform.transform(self.original.epsg, epsg, self.original.x, self.original.y)?;
        Ok(Location { x, y, epsg })
    }

    /// Replaces the current location with one computed by
    /// [`projected`](Station::projected). The original location is kept.
    pub fn set_projected(&mut self, location: Location) {
        self.current = location;
    }

    // -----------------------------------------------------------------------
    // Samples
    // -----------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Component count of the stored samples, or 0 while empty.
    pub fn dimension(&self) -> usize {
        self.samples.first().map_or(0, Sample::dimension)
    }

    /// Appends a sample.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::DimensionMismatch`] if the station already
    /// holds samples of a different dimension.
    pub fn push(&mut self, sample: Sample) -> Result<(), SeriesError> {
        let expected = self.dimension();
        if expected != 0 && sample.dimension() != expected {
            return Err(SeriesError::DimensionMismatch {
                expected,
                got: sample.dimension(),
            });
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Appends every sample, stopping at the first dimension mismatch.
    ///
    /// # Errors
    ///
    /// Same as [`Station::push`].
    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) -> Result<(), SeriesError> {
        for sample in samples {
            self.push(sample)?;
        }
        Ok(())
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Sample> {
        self.samples.get_mut(index)
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Removes and returns the sample at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::IndexOutOfRange`] past the end.
    pub fn delete_at(&mut self, index: usize) -> Result<Sample, SeriesError> {
        if index >= self.samples.len() {
            return Err(SeriesError::IndexOutOfRange {
                index,
                len: self.samples.len(),
            });
        }
        Ok(self.samples.remove(index))
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Reserves capacity for `additional` more samples.
    pub fn reserve(&mut self, additional: usize) {
        self.samples.reserve(additional);
    }

    /// Sorts samples by timestamp and drops repeated timestamps.
    ///
    /// The sort is stable, so of several samples sharing a timestamp the one
    /// inserted first survives. Calling it again has no effect.
    pub fn sanitize(&mut self) {
        let before = self.samples.len();
        self.samples.sort_by_key(Sample::date);
        self.samples.dedup_by(|later, earlier| later.date_equal(earlier));
        debug!(
            station = self.index,
            removed = before - self.samples.len(),
            "sanitized station"
        );
    }

    /// Moves every timestamp by `seconds` and adds `offset` to the first
    /// component of every non-missing sample.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Calendar`] if a timestamp leaves the
    /// representable range; earlier samples are already shifted.
    pub fn shift(&mut self, seconds: i64, offset: f64) -> Result<(), SeriesError> {
        for sample in &mut self.samples {
            sample.shift(seconds, offset)?;
        }
        Ok(())
    }

    /// Mean spacing between consecutive samples, in seconds.
    ///
    /// `None` with fewer than two samples.
    pub fn mean_dt(&self) -> Option<f64> {
        let (first, last) = (self.samples.first()?, self.samples.last()?);
        if self.samples.len() < 2 {
            return None;
        }
        let span = last.date().millis_since(first.date()) as f64 / 1000.0;
        Some(span / (self.samples.len() - 1) as f64)
    }
}

impl<'a> IntoIterator for &'a Station {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Multi-line summary: identity, location, metadata, per-component
/// statistics and time extent.
impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.name == DEFAULT_NAME { &self.id } else { &self.name };
        writeln!(f, "Station: {title}")?;
        writeln!(f, "             ID: {}", self.id)?;
        if self.current.epsg != self.original.epsg {
            writeln!(f, "   X Coordinate: {:.6} ({:.6})", self.current.x, self.original.x)?;
            writeln!(f, "   Y Coordinate: {:.6} ({:.6})", self.current.y, self.original.y)?;
            writeln!(f, "     Projection: {} ({})", self.current.epsg, self.original.epsg)?;
        } else {
            writeln!(f, "   X Coordinate: {:.6}", self.current.x)?;
            writeln!(f, "   Y Coordinate: {:.6}", self.current.y)?;
            writeln!(f, "     Projection: {}", self.current.epsg)?;
        }
        writeln!(f, "          Datum: {}", self.datum)?;
        writeln!(f, "          Units: {}", self.units)?;
        writeln!(f, "       Timezone: {}", self.timezone)?;
        writeln!(f, "      Dimension: {}", self.dimension())?;
        writeln!(f, "         Length: {}", self.len())?;
        match self.mean_dt() {
            Some(dt) => writeln!(f, "  Mean Timestep: {dt}")?,
            None => writeln!(f, "  Mean Timestep: empty")?,
        }

        let per_component = |stat: &dyn Fn(usize) -> Option<f64>| -> String {
            if self.is_empty() {
                return "empty".to_string();
            }
            (0..self.dimension())
                .map(|c| stat(c).map_or_else(|| "empty".to_string(), |v| format!("{v:.6}")))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(f, "            Min: {}", per_component(&|c| self.min(c)))?;
        writeln!(f, "            Max: {}", per_component(&|c| self.max(c)))?;
        writeln!(f, "           Mean: {}", per_component(&|c| self.mean(c)))?;
        let nulls = if self.is_empty() {
            "empty".to_string()
        } else {
            (0..self.dimension())
                .map(|c| (self.len() - self.n_not_null(c)).to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(f, "          nNull: {nulls}")?;
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => {
                writeln!(f, "          Begin: {}", first.date())?;
                writeln!(f, "            End: {}", last.date())
            }
            _ => {
                writeln!(f, "          Begin: empty")?;
                writeln!(f, "            End: empty")
            }
        }
    }
}
