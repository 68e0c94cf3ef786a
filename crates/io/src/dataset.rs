//! The dataset: one file's stations plus the reader configuration that
//! produced them.

use std::fmt;
use std::path::{Path, PathBuf};

use hmdf_calendar::Date;
use hmdf_proj::{CoordinateTransform, EpsgTransformer, WGS84};
use hmdf_series::Station;
use tracing::{debug, info};

use crate::detect::FileFormat;
use crate::error::IoError;
use crate::ingest::Ingest;
use crate::nefis::NefisLibrary;
use crate::nefis_read::{self, NefisCatalog, NefisPaths};
use crate::{adcirc_ascii, adcirc_netcdf, generic_netcdf, imeds};

/// Aggregate time and value extent over every non-empty station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Earliest first-sample time.
    pub begin: Date,
    /// Latest last-sample time.
    pub end: Date,
    /// Smallest non-null value of the first component, if any.
    pub min: Option<f64>,
    /// Largest non-null value of the first component, if any.
    pub max: Option<f64>,
}

/// Header state kept between a NEFIS header read and value reads.
#[derive(Debug)]
struct NefisState {
    paths: NefisPaths,
    catalog: NefisCatalog,
    stations: usize,
}

/// A set of stations read from one file.
///
/// Configure with the `with_*` builders, then call [`read`](Dataset::read).
/// A failed read leaves the dataset empty with [`null`](Dataset::null) set.
///
/// ```no_run
/// use hmdf_calendar::Date;
/// use hmdf_io::Dataset;
///
/// let mut data = Dataset::new("fort.61")
///     .with_station_file("stations.txt")
///     .with_coldstart(Date::ymd(2020, 8, 1)?)
///     .with_sanitize(true);
/// data.read()?;
/// println!("{} stations", data.n_stations());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Dataset {
    path: PathBuf,
    station_file: Option<PathBuf>,
    coldstart: Date,
    target_epsg: Option<i32>,
    sanitize: bool,
    nefis_library: Option<Box<dyn NefisLibrary>>,
    transform: Box<dyn CoordinateTransform>,

    format: Option<FileFormat>,
    header: Vec<String>,
    epsg: i32,
    stations: Vec<Station>,
    nefis: Option<NefisState>,
    success: bool,
    null: bool,
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("path", &self.path)
            .field("station_file", &self.station_file)
            .field("coldstart", &self.coldstart)
            .field("target_epsg", &self.target_epsg)
            .field("sanitize", &self.sanitize)
            .field("format", &self.format)
            .field("epsg", &self.epsg)
            .field("stations", &self.stations.len())
            .field("success", &self.success)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

impl Dataset {
    /// An empty dataset for `path` with a cold start at the Unix epoch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            station_file: None,
            coldstart: Date::EPOCH,
            target_epsg: None,
            sanitize: false,
            nefis_library: None,
            transform: Box::new(EpsgTransformer::new()),
            format: None,
            header: Vec::new(),
            epsg: WGS84,
            stations: Vec::new(),
            nefis: None,
            success: false,
            null: true,
        }
    }

    /// Reference time that ADCIRC time offsets count from.
    pub fn with_coldstart(mut self, coldstart: Date) -> Self {
        self.coldstart = coldstart;
        self
    }

    /// Station location file for ADCIRC text output.
    pub fn with_station_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.station_file = Some(path.into());
        self
    }

    /// Library used to open NEFIS files. Required for `.def`/`.dat` input.
    pub fn with_nefis_library(mut self, library: impl NefisLibrary + 'static) -> Self {
        self.nefis_library = Some(Box::new(library));
        self
    }

    /// Reproject every station to `epsg` after reading.
    pub fn with_epsg(mut self, epsg: i32) -> Self {
        self.target_epsg = Some(epsg);
        self
    }

    /// Sort and deduplicate every station after reading.
    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    /// Coordinate transform used by reprojection. Defaults to
    /// [`EpsgTransformer`].
    pub fn with_transform(mut self, transform: impl CoordinateTransform + 'static) -> Self {
        self.transform = Box::new(transform);
        self
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

impl Dataset {
    /// Detects the file format and reads every station.
    ///
    /// Any previous contents are discarded first. For NEFIS input only the
    /// header is read; fetch values with
    /// [`read_nefis_value`](Dataset::read_nefis_value).
    ///
    /// # Errors
    ///
    /// Returns the first error from detection, reading, or post-read
    /// reprojection. The dataset is left empty.
    pub fn read(&mut self) -> Result<(), IoError> {
        self.reset();
        info!(path = %self.path.display(), "reading dataset");
        match self.read_file() {
            Ok(()) => {
                self.success = true;
                self.null = false;
                info!(
                    format = ?self.format,
                    stations = self.stations.len(),
                    "dataset ready"
                );
                Ok(())
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    fn read_file(&mut self) -> Result<(), IoError> {
        if !self.path.exists() {
            return Err(IoError::FileNotFound {
                path: self.path.clone(),
            });
        }
        let format = FileFormat::detect(&self.path)?;

        let ingest = match format {
            FileFormat::AdcircAscii => {
                let station_file =
                    self.station_file
                        .as_deref()
                        .ok_or_else(|| IoError::StationFileRequired {
                            path: self.path.clone(),
                        })?;
                adcirc_ascii::read(&self.path, station_file, self.coldstart)?
            }
            FileFormat::AdcircNetcdf => adcirc_netcdf::read(&self.path, self.coldstart)?,
            FileFormat::Imeds => imeds::read(&self.path)?,
            FileFormat::GenericNetcdf => generic_netcdf::read(&self.path)?,
            FileFormat::Nefis => {
                let library = self.nefis_library.as_deref().ok_or_else(|| IoError::Nefis {
                    reason: "no NEFIS library configured".to_string(),
                })?;
                let paths = NefisPaths::from_path(&self.path);
                let (stations, catalog) = nefis_read::read_header(library, &paths)?;
                self.nefis = Some(NefisState {
                    paths,
                    catalog,
                    stations: stations.len(),
                });
                Ingest {
                    stations,
                    header: Vec::new(),
                    epsg: None,
                }
            }
        };

        let Ingest {
            mut stations,
            header,
            epsg,
        } = ingest;
        let mut epsg = epsg.unwrap_or(WGS84);

        if let Some(target) = self.target_epsg {
            for station in &mut stations {
                station.reproject(target, &*self.transform)?;
            }
            epsg = target;
        }
        if self.sanitize {
            stations.iter_mut().for_each(Station::sanitize);
        }

        self.format = Some(format);
        self.header = header;
        self.epsg = epsg;
        self.stations = stations;
        Ok(())
    }

    /// Appends the named NEFIS series to every station.
    ///
    /// `layer` is 1-based and defaults to 1; it must not exceed the series'
    /// layer count.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::NotReady`] if no NEFIS header has been read,
    /// [`IoError::UnknownSeries`], [`IoError::InvalidLayer`] or
    /// [`IoError::UnsupportedType`] for bad requests, or the library's
    /// error. Stations are unchanged on error.
    pub fn read_nefis_value(&mut self, name: &str, layer: Option<usize>) -> Result<(), IoError> {
        let not_ready = || IoError::NotReady {
            operation: "read_nefis_value".to_string(),
        };
        let state = self.nefis.as_ref().ok_or_else(not_ready)?;
        let library = self.nefis_library.as_deref().ok_or_else(not_ready)?;
        if self.stations.len() != state.stations {
            return Err(IoError::DimensionMismatch {
                name: "stations".to_string(),
                expected: state.stations,
                got: self.stations.len(),
            });
        }
        nefis_read::read_value(
            library,
            &state.paths,
            &state.catalog,
            &mut self.stations,
            name,
            layer,
        )
    }

    /// Series available from the last NEFIS header read.
    pub fn nefis_catalog(&self) -> Option<&NefisCatalog> {
        self.nefis.as_ref().map(|state| &state.catalog)
    }

    fn reset(&mut self) {
        self.format = None;
        self.header.clear();
        self.epsg = WGS84;
        self.stations.clear();
        self.nefis = None;
        self.success = false;
        self.null = true;
    }
}

// ---------------------------------------------------------------------------
// Stations
// ---------------------------------------------------------------------------

impl Dataset {
    pub fn add_station(&mut self, station: Station) {
        self.stations.push(station);
        self.null = false;
    }

    /// Replaces the station at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::StationIndexOutOfRange`] if `index` is past the end.
    pub fn set_station(&mut self, index: usize, station: Station) -> Result<(), IoError> {
        let len = self.stations.len();
        let slot = self
            .stations
            .get_mut(index)
            .ok_or(IoError::StationIndexOutOfRange { index, len })?;
        *slot = station;
        Ok(())
    }

    /// Removes and returns the station at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::StationIndexOutOfRange`] if `index` is past the end.
    pub fn delete_station(&mut self, index: usize) -> Result<Station, IoError> {
        if index >= self.stations.len() {
            return Err(IoError::StationIndexOutOfRange {
                index,
                len: self.stations.len(),
            });
        }
        Ok(self.stations.remove(index))
    }

    /// Truncates to `n` stations, or pads with empty stations indexed by
    /// position.
    pub fn resize(&mut self, n: usize) {
        if n <= self.stations.len() {
            self.stations.truncate(n);
        } else {
            let start = self.stations.len();
            self.stations.extend((start..n).map(Station::new));
        }
    }

    pub fn station(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    pub fn station_mut(&mut self, index: usize) -> Option<&mut Station> {
        self.stations.get_mut(index)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    pub fn n_stations(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Reprojects every station from its original location.
    ///
    /// Either every station moves to `epsg` or none does.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Projection`] for the first station that cannot be
    /// transformed; the dataset is left unchanged.
    pub fn reproject(&mut self, epsg: i32) -> Result<(), IoError> {
        let locations = self
            .stations
            .iter()
            .map(|station| station.projected(epsg, &*self.transform))
            .collect::<Result<Vec<_>, _>>()?;
        for (station, location) in self.stations.iter_mut().zip(locations) {
            station.set_projected(location);
        }
        self.epsg = epsg;
        debug!(epsg, stations = self.stations.len(), "reprojected dataset");
        Ok(())
    }

    /// Tags every station with `epsg` without transforming coordinates.
    pub fn set_epsg(&mut self, epsg: i32) {
        self.epsg = epsg;
        for station in &mut self.stations {
            station.set_epsg(epsg);
        }
    }

    /// Sorts and deduplicates every station.
    pub fn sanitize(&mut self) {
        self.stations.iter_mut().for_each(Station::sanitize);
    }

    /// Time and first-component value extent over all stations.
    ///
    /// Stations are assumed sorted, so each contributes its first and last
    /// sample times. Empty stations are skipped; `None` if every station is
    /// empty.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for station in &self.stations {
            let (Some(first), Some(last)) = (station.first(), station.last()) else {
                continue;
            };
            let (lo, hi) = station.minmax(0).unzip();
            bounds = Some(match bounds {
                None => Bounds {
                    begin: first.date(),
                    end: last.date(),
                    min: lo,
                    max: hi,
                },
                Some(b) => Bounds {
                    begin: b.begin.min(first.date()),
                    end: b.end.max(last.date()),
                    min: merge(b.min, lo, f64::min),
                    max: merge(b.max, hi, f64::max),
                },
            });
        }
        bounds
    }
}

fn merge(a: Option<f64>, b: Option<f64>, f: fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (a, b) => a.or(b),
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl Dataset {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn station_file(&self) -> Option<&Path> {
        self.station_file.as_deref()
    }

    pub fn coldstart(&self) -> Date {
        self.coldstart
    }

    /// Format detected by the last successful read.
    pub fn format(&self) -> Option<FileFormat> {
        self.format
    }

    /// Header lines captured from text formats.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// EPSG code the station locations are currently expressed in.
    pub fn epsg(&self) -> i32 {
        self.epsg
    }

    /// Value dimension of the first non-empty station, or 0.
    pub fn dimension(&self) -> usize {
        self.stations
            .iter()
            .map(Station::dimension)
            .find(|&d| d > 0)
            .unwrap_or(0)
    }

    /// Whether the last read succeeded.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Whether the dataset holds nothing.
    pub fn null(&self) -> bool {
        self.null
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Station;
    type IntoIter = std::slice::Iter<'a, Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}
