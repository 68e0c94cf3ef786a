//! ADCIRC station output in netCDF (fort.61.nc and friends).

use std::path::Path;

use hmdf_calendar::Date;
use hmdf_proj::WGS84;
use hmdf_series::{Sample, Station, null_if_missing};
use tracing::{debug, info};

use crate::error::IoError;
use crate::ingest::Ingest;
use crate::netcdf_read::{dimension_len, open_file, read_f64, read_names, variable};

/// Payload variables in the order they are tried. The first entry present
/// in the file wins; a second name makes the series two dimensional.
const PAYLOADS: [&[&str]; 4] = [
    &["zeta"],
    &["u-vel", "v-vel"],
    &["pressure"],
    &["windx", "windy"],
];

/// The first payload candidate whose first variable exists in `file`.
fn payload_names(file: &netcdf::File) -> Option<&'static [&'static str]> {
    PAYLOADS
        .iter()
        .copied()
        .find(|names| file.variable(names[0]).is_some())
}

pub(crate) fn read(path: &Path, coldstart: Date) -> Result<Ingest, IoError> {
    let file = open_file(path)?;

    let nt = dimension_len(&file, "time", path)?;
    let nsta = dimension_len(&file, "station", path)?;
    dimension_len(&file, "namelen", path)?;

    let dates = read_f64(&file, "time", path)?
        .into_iter()
        .map(|t| coldstart.add_fractional_seconds(t))
        .collect::<Result<Vec<_>, _>>()?;
    if dates.len() != nt {
        return Err(IoError::DimensionMismatch {
            name: "time".to_string(),
            expected: nt,
            got: dates.len(),
        });
    }

    let x = read_f64(&file, "x", path)?;
    let y = read_f64(&file, "y", path)?;
    let names = read_names(&file, "station_name", nsta, path)?;
    for (name, len) in [("x", x.len()), ("y", y.len())] {
        if len != nsta {
            return Err(IoError::DimensionMismatch {
                name: name.to_string(),
                expected: nsta,
                got: len,
            });
        }
    }

    let payload = payload_names(&file).ok_or_else(|| IoError::NoPayload {
        path: path.to_path_buf(),
    })?;
    debug!(variables = ?payload, "selected ADCIRC payload");

    // Each payload variable is laid out [time][station]; stations are read
    // one column at a time.
    let columns = payload
        .iter()
        .map(|name| {
            let var = variable(&file, name, path)?;
            let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
            if shape != [nt, nsta] {
                return Err(IoError::DimensionMismatch {
                    name: (*name).to_string(),
                    expected: nt * nsta,
                    got: shape.iter().product(),
                });
            }
            Ok(var)
        })
        .collect::<Result<Vec<_>, IoError>>()?;

    let mut stations = Vec::with_capacity(nsta);
    let mut values = [0.0; 2];
    for (s, name) in names.into_iter().enumerate() {
        let series = columns
            .iter()
            .map(|var| var.get_values::<f64, _>([0..nt, s..s + 1]))
            .collect::<Result<Vec<_>, _>>()?;

        let mut station = Station::at(s, x[s], y[s], WGS84);
        station.set_name(name);
        station.reserve(nt);
        for (t, &date) in dates.iter().enumerate() {
            for (value, column) in values.iter_mut().zip(&series) {
                *value = null_if_missing(column[t]);
            }
            station.push(Sample::new(date, &values[..series.len()])?)?;
        }
        stations.push(station);
    }

    let ingest = Ingest {
        stations,
        header: Vec::new(),
        epsg: None,
    };
    info!(
        path = %path.display(),
        stations = ingest.stations.len(),
        samples = ingest.sample_count(),
        "read ADCIRC netCDF file"
    );
    Ok(ingest)
}
