//! Delft3D history files through a [`NefisLibrary`].
//!
//! Reading happens in two stages. The header pass builds the station roster
//! from the constants group, derives the time axis, and catalogs every
//! result element whose leading dimension is the station count. Values are
//! then fetched one series at a time by name.

use std::path::{Path, PathBuf};

use hmdf_calendar::Date;
use hmdf_proj::WGS84;
use hmdf_series::{Sample, Station, null_if_missing};
use tracing::{debug, info, warn};

use crate::error::IoError;
use crate::nefis::{ElementInfo, IndexRange, NefisFile, NefisLibrary};

const CONSTANTS_GROUP: &str = "his-const";
const INFO_GROUP: &str = "his-info-series";
const RESULT_GROUPS: [&str; 2] = ["his-series", "his-wave-series"];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Description of one station-indexed result element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesMetadata {
    /// Element name, e.g. `ZWL`.
    pub name: String,
    pub quantity: String,
    pub units: String,
    /// Storage type tag.
    pub type_name: String,
    pub description: String,
    /// Result group the element belongs to.
    pub group: String,
    /// Element dimensions; the first is the station count.
    pub dimensions: Vec<usize>,
}

impl SeriesMetadata {
    /// Number of vertical layers.
    ///
    /// A series is indexed by time, station and layer. The time axis is the
    /// group dimension, so the layer count is the element's second
    /// dimension; elements with only a station dimension have one layer.
    pub fn layers(&self) -> usize {
        self.dimensions.get(1).copied().unwrap_or(1)
    }
}

/// Everything the header pass learned about a history file.
#[derive(Debug, Clone, PartialEq)]
pub struct NefisCatalog {
    layers: usize,
    layer_model: String,
    times: Vec<Date>,
    series: Vec<SeriesMetadata>,
}

impl NefisCatalog {
    /// Number of model layers (`KMAX`).
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Vertical layer model, e.g. `SIGMA-MODEL`.
    pub fn layer_model(&self) -> &str {
        &self.layer_model
    }

    /// Output times shared by every series.
    pub fn times(&self) -> &[Date] {
        &self.times
    }

    pub fn series(&self) -> &[SeriesMetadata] {
        &self.series
    }

    /// Looks up a series by element name.
    pub fn get(&self, name: &str) -> Option<&SeriesMetadata> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// The definition/data file pair behind a `.def` or `.dat` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NefisPaths {
    definition: PathBuf,
    data: PathBuf,
}

impl NefisPaths {
    pub(crate) fn from_path(path: &Path) -> Self {
        Self {
            definition: path.with_extension("def"),
            data: path.with_extension("dat"),
        }
    }

    fn open(&self, library: &dyn NefisLibrary) -> Result<Box<dyn NefisFile>, IoError> {
        Ok(library.open(&self.definition, &self.data)?)
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Reads the station roster, time axis, layer information and series
/// catalog.
pub(crate) fn read_header(
    library: &dyn NefisLibrary,
    paths: &NefisPaths,
) -> Result<(Vec<Station>, NefisCatalog), IoError> {
    let file = paths.open(library)?;
    let file = file.as_ref();

    let stations = read_stations(file)?;
    let times = read_times(file)?;
    let (layers, layer_model) = read_layers(file)?;

    let mut series = Vec::new();
    for group in RESULT_GROUPS {
        catalog_group(file, group, stations.len(), &mut series)?;
    }

    info!(
        stations = stations.len(),
        times = times.len(),
        series = series.len(),
        layers,
        "read NEFIS header"
    );

    Ok((
        stations,
        NefisCatalog {
            layers,
            layer_model,
            times,
            series,
        },
    ))
}

fn read_stations(file: &dyn NefisFile) -> Result<Vec<Station>, IoError> {
    let (xy_info, xy) = read_constant(file, "XYSTAT")?;
    let nsta = match xy_info.dimensions.as_slice() {
        [2, n, ..] => *n,
        dims => {
            return Err(IoError::DimensionMismatch {
                name: "XYSTAT".to_string(),
                expected: 2,
                got: dims.first().copied().unwrap_or(0),
            });
        }
    };
    if nsta == 0 {
        return Ok(Vec::new());
    }
    let coords = decode_reals(&xy_info, &xy, "XYSTAT")?;

    let (name_info, names) = read_constant(file, "NAMST")?;
    let names = decode_text(&name_info, &names);
    if names.len() != nsta {
        return Err(IoError::DimensionMismatch {
            name: "NAMST".to_string(),
            expected: nsta,
            got: names.len(),
        });
    }

    let stations = coords
        .chunks_exact(2)
        .zip(names)
        .enumerate()
        .map(|(i, (xy, name))| {
            let mut station = Station::at(i, xy[0], xy[1], WGS84);
            station.set_name(name);
            station
        })
        .collect();
    Ok(stations)
}

fn read_times(file: &dyn NefisFile) -> Result<Vec<Date>, IoError> {
    let (info, raw) = read_constant(file, "ITDATE")?;
    let packed = decode_integers(&info, &raw, "ITDATE")?
        .first()
        .copied()
        .ok_or_else(|| IoError::InvalidTime {
            reason: "ITDATE is empty".to_string(),
        })?;
    let base = Date::from_packed_ymd(packed).map_err(|e| IoError::InvalidTime {
        reason: format!("ITDATE {packed}: {e}"),
    })?;

    let dt = read_scalar_real(file, "DT")?;
    let tunit = read_scalar_real(file, "TUNIT")?;

    let nstep = file.max_index(INFO_GROUP)?;
    let info = file.element_info("ITHISC")?;
    let mut window = vec![IndexRange::first(nstep)];
    window.extend(info.dimensions.iter().map(|&d| IndexRange::first(d)));
    let mut raw = vec![0u8; info.byte_width * info.value_count() * nstep];
    file.read_element(INFO_GROUP, "ITHISC", &window, &mut raw)?;
    let steps = decode_integers(&info, &raw, "ITHISC")?;

    debug!(%base, dt, tunit, nstep, "NEFIS time axis");

    steps
        .iter()
        .map(|&step| {
            base.add_fractional_seconds(step as f64 * dt * tunit)
                .map_err(IoError::from)
        })
        .collect()
}

fn read_layers(file: &dyn NefisFile) -> Result<(usize, String), IoError> {
    let (info, raw) = read_constant(file, "KMAX")?;
    let kmax = decode_integers(&info, &raw, "KMAX")?
        .first()
        .copied()
        .unwrap_or(1);
    let (info, raw) = read_constant(file, "LAYER_MODEL")?;
    let model = decode_text(&info, &raw).into_iter().next().unwrap_or_default();
    Ok((usize::try_from(kmax).unwrap_or(0), model))
}

fn catalog_group(
    file: &dyn NefisFile,
    group: &str,
    nsta: usize,
    out: &mut Vec<SeriesMetadata>,
) -> Result<(), IoError> {
    let steps = match file.max_index(group) {
        Ok(n) => n,
        Err(e) => {
            warn!(group, error = %e, "result group not present, skipping");
            return Ok(());
        }
    };
    let cell = file.group_cell(group)?;
    for element in file.cell_elements(&cell)? {
        let name = clean(&element);
        let info = file.element_info(&name)?;
        if info.dimensions.first() != Some(&nsta) {
            debug!(group, element = %name, dims = ?info.dimensions, "not station indexed");
            continue;
        }
        out.push(SeriesMetadata {
            name,
            quantity: clean(&info.quantity),
            units: clean(&info.units),
            type_name: clean(&info.type_name),
            description: clean(&info.description),
            group: group.to_string(),
            dimensions: info.dimensions,
        });
    }
    debug!(group, steps, "cataloged result group");
    Ok(())
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Appends the named series to every station, one sample per output time.
///
/// Nothing is appended unless the whole block is read and decoded.
pub(crate) fn read_value(
    library: &dyn NefisLibrary,
    paths: &NefisPaths,
    catalog: &NefisCatalog,
    stations: &mut [Station],
    name: &str,
    layer: Option<usize>,
) -> Result<(), IoError> {
    let meta = catalog.get(name).ok_or_else(|| IoError::UnknownSeries {
        name: name.to_string(),
    })?;

    let layers = meta.layers();
    let layer = layer.unwrap_or(1);
    if !(1..=layers).contains(&layer) {
        return Err(IoError::InvalidLayer {
            name: name.to_string(),
            layer,
            layers,
        });
    }

    if meta.type_name != "REAL" {
        return Err(IoError::UnsupportedType {
            name: name.to_string(),
            type_name: meta.type_name.clone(),
        });
    }

    if let Some(station) = stations.iter().find(|s| s.dimension() > 1) {
        return Err(IoError::DimensionMismatch {
            name: format!("station {} sample dimension", station.index()),
            expected: 1,
            got: station.dimension(),
        });
    }

    let nt = catalog.times.len();
    let nsta = stations.len();
    let mut window = vec![IndexRange::first(nt), IndexRange::first(nsta)];
    if meta.dimensions.len() > 1 {
        window.push(IndexRange::single(layer));
    }
    window.extend(meta.dimensions.iter().skip(2).map(|_| IndexRange::single(1)));

    let file = paths.open(library)?;
    let info = file.element_info(&meta.name)?;
    let mut raw = vec![0u8; info.byte_width * nt * nsta];
    file.read_element(&meta.group, &meta.name, &window, &mut raw)?;
    drop(file);

    let values = decode_reals(&info, &raw, name)?;
    if values.len() != nt * nsta {
        return Err(IoError::DimensionMismatch {
            name: name.to_string(),
            expected: nt * nsta,
            got: values.len(),
        });
    }

    for (j, station) in stations.iter_mut().enumerate() {
        station.reserve(nt);
        for (i, &date) in catalog.times.iter().enumerate() {
            station.push(Sample::scalar(date, null_if_missing(values[i * nsta + j])))?;
        }
    }

    info!(series = name, layer, times = nt, stations = nsta, "read NEFIS series");
    Ok(())
}

// ---------------------------------------------------------------------------
// Buffers
// ---------------------------------------------------------------------------

/// Reads a whole constants-group element into a buffer sized from its
/// metadata.
fn read_constant(file: &dyn NefisFile, element: &str) -> Result<(ElementInfo, Vec<u8>), IoError> {
    let info = file.element_info(element)?;
    let mut window = vec![IndexRange::single(1)];
    window.extend(info.dimensions.iter().map(|&d| IndexRange::first(d)));
    let mut raw = vec![0u8; info.byte_width * info.value_count()];
    file.read_element(CONSTANTS_GROUP, element, &window, &mut raw)?;
    Ok((info, raw))
}

fn read_scalar_real(file: &dyn NefisFile, element: &str) -> Result<f64, IoError> {
    let (info, raw) = read_constant(file, element)?;
    decode_reals(&info, &raw, element)?
        .first()
        .copied()
        .ok_or_else(|| IoError::DimensionMismatch {
            name: element.to_string(),
            expected: 1,
            got: 0,
        })
}

fn decode_reals(info: &ElementInfo, raw: &[u8], element: &str) -> Result<Vec<f64>, IoError> {
    match (clean(&info.type_name).as_str(), info.byte_width) {
        ("REAL", 4) => Ok(raw
            .chunks_exact(4)
            .map(|c| f64::from(f32::from_ne_bytes([c[0], c[1], c[2], c[3]])))
            .collect()),
        ("REAL", 8) => Ok(raw
            .chunks_exact(8)
            .map(|c| f64::from_ne_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect()),
        (type_name, width) => Err(IoError::UnsupportedType {
            name: element.to_string(),
            type_name: format!("{type_name}*{width}"),
        }),
    }
}

fn decode_integers(info: &ElementInfo, raw: &[u8], element: &str) -> Result<Vec<i64>, IoError> {
    match (clean(&info.type_name).as_str(), info.byte_width) {
        ("INTEGER", 4) => Ok(raw
            .chunks_exact(4)
            .map(|c| i64::from(i32::from_ne_bytes([c[0], c[1], c[2], c[3]])))
            .collect()),
        ("INTEGER", 8) => Ok(raw
            .chunks_exact(8)
            .map(|c| i64::from_ne_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect()),
        (type_name, width) => Err(IoError::UnsupportedType {
            name: element.to_string(),
            type_name: format!("{type_name}*{width}"),
        }),
    }
}

/// Splits a character element into fixed-width strings.
fn decode_text(info: &ElementInfo, raw: &[u8]) -> Vec<String> {
    if info.byte_width == 0 {
        return Vec::new();
    }
    raw.chunks(info.byte_width)
        .map(|chunk| clean(&String::from_utf8_lossy(chunk)))
        .collect()
}

/// Trims padding and drops carriage returns and NULs.
fn clean(s: &str) -> String {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .replace('\t', " ")
        .replace('\r', "")
}
