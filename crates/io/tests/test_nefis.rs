//! Integration tests for NEFIS reading against an in-memory library.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use hmdf_calendar::Date;
use hmdf_io::{
    Dataset, ElementInfo, FileFormat, IndexRange, IoError, NefisError, NefisFile, NefisLibrary,
};
use tempfile::{TempDir, tempdir};

// ---------------------------------------------------------------------------
// Fake library
// ---------------------------------------------------------------------------

/// One stored element. `data` holds every group index, with the first
/// element dimension varying fastest and the group dimension slowest.
#[derive(Clone)]
struct Element {
    group: String,
    info: ElementInfo,
    data: Vec<u8>,
}

#[derive(Clone, Default)]
struct FakeNefis {
    /// Group name to (max index, cell name).
    groups: HashMap<String, (usize, String)>,
    cells: HashMap<String, Vec<String>>,
    elements: HashMap<String, Element>,
}

fn info(type_name: &str, byte_width: usize, dimensions: &[usize]) -> ElementInfo {
    ElementInfo {
        type_name: type_name.to_string(),
        byte_width,
        quantity: "quantity".to_string(),
        units: "[ M ]".to_string(),
        description: "description".to_string(),
        dimensions: dimensions.to_vec(),
    }
}

fn reals(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

fn integers(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

fn text(values: &[&str], width: usize) -> Vec<u8> {
    values
        .iter()
        .flat_map(|s| {
            let mut bytes = s.as_bytes().to_vec();
            bytes.resize(width, b' ');
            bytes
        })
        .collect()
}

const NSTA: usize = 2;
const NT: usize = 3;
const KMAX: usize = 2;

/// Water level at time `t`, station `s`.
fn zwl(t: usize, s: usize) -> f32 {
    (10 * t + s) as f32
}

/// Velocity at time `t`, station `s`, 1-based layer `k`.
fn zcuru(t: usize, s: usize, k: usize) -> f32 {
    (100 * k + 10 * t + s) as f32
}

impl FakeNefis {
    fn add_group(&mut self, group: &str, max_index: usize, elements: Vec<(&str, ElementInfo, Vec<u8>)>) {
        let cell = format!("{group}-cell");
        self.groups
            .insert(group.to_string(), (max_index, cell.clone()));
        self.cells.insert(
            cell,
            elements.iter().map(|(n, _, _)| (*n).to_string()).collect(),
        );
        for (name, info, data) in elements {
            self.elements.insert(
                name.to_string(),
                Element {
                    group: group.to_string(),
                    info,
                    data,
                },
            );
        }
    }

    /// A two-station, three-step, two-layer history file.
    fn history() -> Self {
        let mut fake = Self::default();
        fake.add_group(
            "his-const",
            1,
            vec![
                (
                    "XYSTAT",
                    info("REAL", 4, &[2, NSTA]),
                    reals(&[-90.0, 29.0, -91.5, 30.5]),
                ),
                ("NAMST", info("CHARACTE", 20, &[NSTA]), text(&["Station A", "Station B"], 20)),
                ("ITDATE", info("INTEGER", 4, &[2]), integers(&[20200101, 0])),
                ("DT", info("REAL", 4, &[1]), reals(&[0.5])),
                ("TUNIT", info("REAL", 4, &[1]), reals(&[60.0])),
                ("KMAX", info("INTEGER", 4, &[1]), integers(&[KMAX as i32])),
                ("LAYER_MODEL", info("CHARACTE", 16, &[1]), text(&["SIGMA-MODEL"], 16)),
            ],
        );
        fake.add_group(
            "his-info-series",
            NT,
            vec![("ITHISC", info("INTEGER", 4, &[1]), integers(&[0, 120, 240]))],
        );

        let mut levels = Vec::new();
        let mut velocity = Vec::new();
        for t in 0..NT {
            for s in 0..NSTA {
                levels.push(if t == 2 && s == 1 { -999_999.0 } else { zwl(t, s) });
            }
            for k in 1..=KMAX {
                for s in 0..NSTA {
                    velocity.push(zcuru(t, s, k));
                }
            }
        }
        fake.add_group(
            "his-series",
            NT,
            vec![
                ("ZWL", info("REAL", 4, &[NSTA]), reals(&levels)),
                ("ZCURU", info("REAL", 4, &[NSTA, KMAX]), reals(&velocity)),
                ("ZKFS", info("INTEGER", 4, &[NSTA]), integers(&[1; NSTA * NT])),
                ("ZCMPLX", info("COMPLEX", 8, &[NSTA]), vec![0; 8 * NSTA * NT]),
                ("GRO", info("REAL", 4, &[NSTA + 1]), reals(&[0.0; (NSTA + 1) * NT])),
            ],
        );
        fake
    }
}

impl NefisLibrary for FakeNefis {
    fn open(&self, definition: &Path, data: &Path) -> Result<Box<dyn NefisFile>, NefisError> {
        if definition.extension() != Some("def".as_ref()) || data.extension() != Some("dat".as_ref()) {
            return Err(NefisError::new(-1, "bad file pair"));
        }
        Ok(Box::new(self.clone()))
    }
}

impl NefisFile for FakeNefis {
    fn max_index(&self, group: &str) -> Result<usize, NefisError> {
        self.groups
            .get(group)
            .map(|(n, _)| *n)
            .ok_or_else(|| NefisError::new(-6004, format!("group {group} not found")))
    }

    fn group_cell(&self, group: &str) -> Result<String, NefisError> {
        self.groups
            .get(group)
            .map(|(_, cell)| cell.clone())
            .ok_or_else(|| NefisError::new(-6004, format!("group {group} not found")))
    }

    fn cell_elements(&self, cell: &str) -> Result<Vec<String>, NefisError> {
        self.cells
            .get(cell)
            .cloned()
            .ok_or_else(|| NefisError::new(-6005, format!("cell {cell} not found")))
    }

    fn element_info(&self, element: &str) -> Result<ElementInfo, NefisError> {
        self.elements
            .get(element)
            .map(|e| e.info.clone())
            .ok_or_else(|| NefisError::new(-6006, format!("element {element} not found")))
    }

    fn read_element(
        &self,
        group: &str,
        element: &str,
        window: &[IndexRange],
        buffer: &mut [u8],
    ) -> Result<(), NefisError> {
        let e = self
            .elements
            .get(element)
            .filter(|e| e.group == group)
            .ok_or_else(|| NefisError::new(-6006, format!("{group}/{element} not found")))?;
        let dims = &e.info.dimensions;
        if window.len() != dims.len() + 1 {
            return Err(NefisError::new(-6010, "window rank mismatch"));
        }

        let mut strides = vec![1usize; dims.len()];
        for k in 1..dims.len() {
            strides[k] = strides[k - 1] * dims[k - 1];
        }
        let group_stride: usize = dims.iter().product();

        let range = |r: &IndexRange| (r.start..=r.stop).step_by(r.step.max(1));
        let mut offsets: Vec<usize> = range(&window[0]).map(|g| (g - 1) * group_stride).collect();
        for k in (0..dims.len()).rev() {
            let stride = strides[k];
            offsets = offsets
                .iter()
                .flat_map(|&off| range(&window[k + 1]).map(move |i| off + (i - 1) * stride))
                .collect();
        }

        let width = e.info.byte_width;
        if offsets.len() * width != buffer.len() {
            return Err(NefisError::new(-6011, "buffer size mismatch"));
        }
        for (chunk, off) in buffer.chunks_mut(width).zip(offsets) {
            let src = e
                .data
                .get(off * width..(off + 1) * width)
                .ok_or_else(|| NefisError::new(-6012, "index out of range"))?;
            chunk.copy_from_slice(src);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn history_path(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("trih-case.dat");
    std::fs::write(&path, b"").unwrap();
    path
}

fn opened(dir: &TempDir) -> Dataset {
    let mut data = Dataset::new(history_path(dir)).with_nefis_library(FakeNefis::history());
    data.read().unwrap();
    data
}

fn values(data: &Dataset, station: usize) -> Vec<f64> {
    data.station(station)
        .unwrap()
        .iter()
        .map(|s| s.value())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn header_builds_roster_time_axis_and_catalog() {
    let dir = tempdir().unwrap();
    let data = opened(&dir);

    assert_eq!(data.format(), Some(FileFormat::Nefis));
    assert_eq!(data.n_stations(), 2);
    let s1 = data.station(1).unwrap();
    assert_eq!(s1.name(), "Station B");
    assert_eq!(s1.x(), -91.5);
    assert_eq!(s1.y(), 30.5);
    assert!(s1.is_empty());

    let catalog = data.nefis_catalog().unwrap();
    assert_eq!(catalog.layers(), 2);
    assert_eq!(catalog.layer_model(), "SIGMA-MODEL");

    let start = Date::ymd(2020, 1, 1).unwrap();
    let expected: Vec<Date> = (0..3).map(|h| start.add_hours(h).unwrap()).collect();
    assert_eq!(catalog.times(), expected.as_slice());

    let names: Vec<&str> = catalog.series().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["ZWL", "ZCURU", "ZKFS", "ZCMPLX"]);
    let zcuru = catalog.get("ZCURU").unwrap();
    assert_eq!(zcuru.group, "his-series");
    assert_eq!(zcuru.units, "[ M ]");
    assert_eq!(zcuru.layers(), 2);
    assert!(catalog.get("GRO").is_none());
}

#[test]
fn read_two_dimensional_series() {
    let dir = tempdir().unwrap();
    let mut data = opened(&dir);
    data.read_nefis_value("ZWL", None).unwrap();

    assert_eq!(values(&data, 0), vec![0.0, 10.0, 20.0]);
    let s1 = data.station(1).unwrap();
    assert_eq!(s1.len(), 3);
    assert_eq!(s1.samples()[1].value(), 11.0);
    assert!(s1.samples()[2].is_null(0));
    assert_eq!(
        s1.samples()[2].date(),
        Date::new(2020, 1, 1, 2, 0, 0, 0).unwrap()
    );
}

#[test]
fn read_selected_layer() {
    let dir = tempdir().unwrap();
    let mut data = opened(&dir);
    data.read_nefis_value("ZCURU", Some(2)).unwrap();

    assert_eq!(values(&data, 0), vec![200.0, 210.0, 220.0]);
    assert_eq!(values(&data, 1), vec![201.0, 211.0, 221.0]);
}

#[test]
fn default_layer_is_the_first() {
    let dir = tempdir().unwrap();
    let mut data = opened(&dir);
    data.read_nefis_value("ZCURU", None).unwrap();
    assert_eq!(values(&data, 1), vec![101.0, 111.0, 121.0]);
}

#[test]
fn layer_outside_declared_range() {
    let dir = tempdir().unwrap();
    let mut data = opened(&dir);

    for (name, layer) in [("ZCURU", 3), ("ZCURU", 0), ("ZWL", 2)] {
        let err = data.read_nefis_value(name, Some(layer)).unwrap_err();
        assert!(
            matches!(err, IoError::InvalidLayer { .. }),
            "{name} layer {layer}: got {err:?}"
        );
    }
    assert!(data.iter().all(|s| s.is_empty()));
}

#[test]
fn unknown_series() {
    let dir = tempdir().unwrap();
    let mut data = opened(&dir);
    let err = data.read_nefis_value("NOPE", None).unwrap_err();
    assert!(matches!(err, IoError::UnknownSeries { ref name } if name == "NOPE"));
    assert!(data.iter().all(|s| s.is_empty()));
}

#[test]
fn integer_and_other_types_are_rejected() {
    let dir = tempdir().unwrap();
    let mut data = opened(&dir);

    for name in ["ZKFS", "ZCMPLX"] {
        let err = data.read_nefis_value(name, None).unwrap_err();
        assert!(
            matches!(err, IoError::UnsupportedType { .. }),
            "{name}: got {err:?}"
        );
    }
    assert!(data.iter().all(|s| s.is_empty()));
}

#[test]
fn value_read_after_station_deleted() {
    let dir = tempdir().unwrap();
    let mut data = opened(&dir);
    data.delete_station(0).unwrap();
    assert!(matches!(
        data.read_nefis_value("ZWL", None).unwrap_err(),
        IoError::DimensionMismatch { .. }
    ));
}

#[test]
fn library_required() {
    let dir = tempdir().unwrap();
    let mut data = Dataset::new(history_path(&dir));
    let err = data.read().unwrap_err();
    assert!(matches!(err, IoError::Nefis { .. }), "got {err:?}");
    assert!(data.nefis_catalog().is_none());
    assert!(matches!(
        data.read_nefis_value("ZWL", None).unwrap_err(),
        IoError::NotReady { .. }
    ));
}

#[test]
fn missing_constants_group_fails_header() {
    let dir = tempdir().unwrap();
    let mut fake = FakeNefis::history();
    fake.elements.remove("NAMST");
    let mut data = Dataset::new(history_path(&dir)).with_nefis_library(fake);

    let err = data.read().unwrap_err();
    assert!(matches!(err, IoError::Nefis { .. }), "got {err:?}");
    assert!(data.is_empty());
    assert!(data.nefis_catalog().is_none());
}

#[test]
fn bounds_after_value_read() {
    let dir = tempdir().unwrap();
    let mut data = opened(&dir);
    assert!(data.bounds().is_none());

    data.read_nefis_value("ZWL", None).unwrap();
    let bounds = data.bounds().unwrap();
    assert_eq!(bounds.begin, Date::ymd(2020, 1, 1).unwrap());
    assert_eq!(bounds.min, Some(0.0));
    assert_eq!(bounds.max, Some(20.0));
}
