//! Low-level netCDF extraction helpers shared by both netCDF readers.

use std::path::Path;

use hmdf_series::NONE_TOKEN;
use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a netCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Length of a named dimension.
pub(crate) fn dimension_len(file: &netcdf::File, name: &str, path: &Path) -> Result<usize, IoError> {
    file.dimension(name)
        .map(|d| d.len())
        .ok_or_else(|| IoError::MissingDimension {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
}

pub(crate) fn variable<'f>(
    file: &'f netcdf::File,
    name: &str,
    path: &Path,
) -> Result<netcdf::Variable<'f>, IoError> {
    file.variable(name).ok_or_else(|| IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Read a whole variable as `f64`.
pub(crate) fn read_f64(file: &netcdf::File, name: &str, path: &Path) -> Result<Vec<f64>, IoError> {
    Ok(variable(file, name, path)?.get_values::<f64, _>(..)?)
}

/// Read a whole variable as `i64`.
pub(crate) fn read_i64(file: &netcdf::File, name: &str, path: &Path) -> Result<Vec<i64>, IoError> {
    Ok(variable(file, name, path)?.get_values::<i64, _>(..)?)
}

/// Read `count` station names.
///
/// Classic files store names as a 2-D character array `[count, width]`;
/// netCDF-4 files may use a 1-D string variable instead. Both are
/// accepted. Padding (spaces and NULs) is trimmed.
pub(crate) fn read_names(
    file: &netcdf::File,
    name: &str,
    count: usize,
    path: &Path,
) -> Result<Vec<String>, IoError> {
    let var = variable(file, name, path)?;
    let names: Vec<String> = match var.dimensions() {
        [_, width] => {
            let width = width.len();
            if width == 0 {
                vec![String::new(); count]
            } else {
                var.get_raw_values(..)?
                    .chunks(width)
                    .map(|chunk| trim_name(&String::from_utf8_lossy(chunk)))
                    .collect()
            }
        }
        _ => (0..count)
            .map(|i| var.get_string([i]).map(|s| trim_name(&s)))
            .collect::<Result<_, _>>()?,
    };

    if names.len() != count {
        return Err(IoError::DimensionMismatch {
            name: name.to_string(),
            expected: count,
            got: names.len(),
        });
    }
    Ok(names)
}

/// A text attribute on `var`, or `"none"` when it is absent or empty.
pub(crate) fn text_attribute(var: &netcdf::Variable<'_>, name: &str) -> Result<String, IoError> {
    let value = match var.attribute_value(name) {
        None => return Ok(NONE_TOKEN.to_string()),
        Some(value) => value?,
    };
    let text = match value {
        AttributeValue::Str(s) => trim_name(&s),
        AttributeValue::Strs(list) => list.first().map(|s| trim_name(s)).unwrap_or_default(),
        other => {
            return Err(IoError::Netcdf {
                reason: format!("attribute '{name}' is not text: {other:?}"),
            });
        }
    };
    if text.is_empty() {
        Ok(NONE_TOKEN.to_string())
    } else {
        Ok(text)
    }
}

/// A required integer attribute on `var`.
pub(crate) fn int_attribute(
    var: &netcdf::Variable<'_>,
    name: &str,
    path: &Path,
) -> Result<i64, IoError> {
    let missing = || IoError::MissingAttribute {
        name: name.to_string(),
        variable: var.name(),
        path: path.to_path_buf(),
    };
    let value = var.attribute_value(name).ok_or_else(missing)??;
    match value {
        AttributeValue::Int(v) => Ok(i64::from(v)),
        AttributeValue::Ints(v) => v.first().map(|&v| i64::from(v)).ok_or_else(missing),
        AttributeValue::Short(v) => Ok(i64::from(v)),
        AttributeValue::Shorts(v) => v.first().map(|&v| i64::from(v)).ok_or_else(missing),
        AttributeValue::Longlong(v) => Ok(v),
        AttributeValue::Longlongs(v) => v.first().copied().ok_or_else(missing),
        _ => Err(missing()),
    }
}

fn trim_name(s: &str) -> String {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_name_strips_padding() {
        assert_eq!(trim_name("  NOAA 8761724\0\0\0"), "NOAA 8761724");
        assert_eq!(trim_name("\0\0"), "");
    }

    #[test]
    fn open_missing_file() {
        let err = open_file(Path::new("/definitely/not/here.nc")).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
