//! Multi-station netCDF with one time/data variable pair per station.
//!
//! Station `i` (1-based, zero padded to four digits) owns the dimension
//! `stationLength_%04d` and the variables `time_station_%04d` (integer
//! seconds after `referenceDate`) and `data_station_%04d`. The EPSG code on
//! `stationXCoordinate` applies to every station.

use std::path::Path;

use hmdf_calendar::Date;
use hmdf_series::{NONE_TOKEN, Sample, Station, null_if_missing};
use tracing::{debug, info};

use crate::error::IoError;
use crate::ingest::Ingest;
use crate::netcdf_read::{
    dimension_len, int_attribute, open_file, read_f64, read_i64, read_names, text_attribute,
    variable,
};

const EPSG_ATTRIBUTE: &str = "HorizontalProjectionEPSG";

pub(crate) fn read(path: &Path) -> Result<Ingest, IoError> {
    let file = open_file(path)?;

    let nsta = dimension_len(&file, "numStations", path)?;
    dimension_len(&file, "stationNameLen", path)?;

    let x_var = variable(&file, "stationXCoordinate", path)?;
    let epsg = int_attribute(&x_var, EPSG_ATTRIBUTE, path)?;
    let epsg = i32::try_from(epsg).map_err(|_| IoError::MissingAttribute {
        name: EPSG_ATTRIBUTE.to_string(),
        variable: "stationXCoordinate".to_string(),
        path: path.to_path_buf(),
    })?;

    let x = read_f64(&file, "stationXCoordinate", path)?;
    let y = read_f64(&file, "stationYCoordinate", path)?;
    let names = read_names(&file, "stationName", nsta, path)?;
    for (name, len) in [("stationXCoordinate", x.len()), ("stationYCoordinate", y.len())] {
        if len != nsta {
            return Err(IoError::DimensionMismatch {
                name: name.to_string(),
                expected: nsta,
                got: len,
            });
        }
    }

    let mut stations = Vec::with_capacity(nsta);
    for (i, name) in names.into_iter().enumerate() {
        let mut station = Station::at(i, x[i], y[i], epsg);
        station.set_name(name);
        read_station(&file, path, &mut station, i + 1)?;
        stations.push(station);
    }

    let ingest = Ingest {
        stations,
        header: Vec::new(),
        epsg: Some(epsg),
    };
    info!(
        path = %path.display(),
        stations = ingest.stations.len(),
        samples = ingest.sample_count(),
        epsg,
        "read generic netCDF file"
    );
    Ok(ingest)
}

/// Fills `station` from its numbered variables.
fn read_station(
    file: &netcdf::File,
    path: &Path,
    station: &mut Station,
    number: usize,
) -> Result<(), IoError> {
    let time_name = format!("time_station_{number:04}");
    let data_name = format!("data_station_{number:04}");
    let len = dimension_len(file, &format!("stationLength_{number:04}"), path)?;

    let time_var = variable(file, &time_name, path)?;
    let data_var = variable(file, &data_name, path)?;

    let reference = text_attribute(&time_var, "referenceDate")?;
    let reference = if reference == NONE_TOKEN {
        Date::EPOCH
    } else {
        Date::from_compact(&reference).map_err(|e| IoError::InvalidTime {
            reason: format!("{time_name} referenceDate '{reference}': {e}"),
        })?
    };
    station.set_timezone(text_attribute(&time_var, "timezone")?);
    station.set_datum(text_attribute(&data_var, "datum")?);
    station.set_units(text_attribute(&data_var, "units")?);

    let offsets = read_i64(file, &time_name, path)?;
    let values = read_f64(file, &data_name, path)?;
    for (name, got) in [(&time_name, offsets.len()), (&data_name, values.len())] {
        if got != len {
            return Err(IoError::DimensionMismatch {
                name: name.clone(),
                expected: len,
                got,
            });
        }
    }

    station.reserve(len);
    for (&offset, &value) in offsets.iter().zip(&values) {
        station.push(Sample::scalar(
            reference.add_seconds(offset)?,
            null_if_missing(value),
        ))?;
    }
    debug!(station = number, samples = len, %reference, "read station series");
    Ok(())
}
