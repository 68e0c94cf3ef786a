//! A self-contained transformer for a small set of EPSG codes.
//!
//! Every transform passes through geographic longitude/latitude. UTM uses
//! the Snyder series expansion (accurate to well under a metre inside a
//! zone), Web Mercator the spherical formulas. Datum shifts between WGS84
//! and NAD83 are taken as zero.

use std::f64::consts::FRAC_PI_4;

use crate::crs::{Crs, Ellipsoid};
use crate::error::ProjError;
use crate::transform::{CoordinateTransform, check_batch};

const UTM_SCALE: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Transformer covering EPSG:4326, 4269, 3857 and the WGS84/NAD83 UTM zones.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpsgTransformer;

impl EpsgTransformer {
    pub fn new() -> Self {
        Self
    }

    fn resolve(epsg: i32) -> Result<Crs, ProjError> {
        Crs::from_epsg(epsg).ok_or(ProjError::UnknownCrs { epsg })
    }
}

impl CoordinateTransform for EpsgTransformer {
    fn transform_batch(
        &self,
        from: i32,
        to: i32,
        x: &[f64],
        y: &[f64],
    ) -> Result<(Vec<f64>, Vec<f64>), ProjError> {
        check_batch(x, y)?;
        let source = Self::resolve(from)?;
        let target = Self::resolve(to)?;

        if from == to {
            return Ok((x.to_vec(), y.to_vec()));
        }

        let mut out_x = Vec::with_capacity(x.len());
        let mut out_y = Vec::with_capacity(y.len());
        for (i, (&xi, &yi)) in x.iter().zip(y).enumerate() {
            let (lon, lat) = to_geographic(source, xi, yi);
            if !(-90.0..=90.0).contains(&lat) || !lon.is_finite() {
                return Err(ProjError::Unavailable {
                    from,
                    to,
                    reason: format!("coordinate {i} ({xi}, {yi}) has no geographic position"),
                });
            }
            let (px, py) = from_geographic(target, lon, lat)
                .filter(|(px, py)| px.is_finite() && py.is_finite())
                .ok_or_else(|| ProjError::Unavailable {
                    from,
                    to,
                    reason: format!("coordinate {i} ({xi}, {yi}) outside projection domain"),
                })?;
            out_x.push(px);
            out_y.push(py);
        }
        Ok((out_x, out_y))
    }

    fn contains_epsg(&self, epsg: i32) -> bool {
        Crs::from_epsg(epsg).is_some()
    }
}

fn to_geographic(crs: Crs, x: f64, y: f64) -> (f64, f64) {
    match crs {
        Crs::Geographic(_) => (x, y),
        Crs::Utm {
            zone,
            northern,
            datum,
        } => utm_inverse(x, y, Crs::central_meridian(zone), northern, datum.ellipsoid()),
        Crs::WebMercator => {
            let r = Ellipsoid::WGS84.a;
            let lon = (x / r).to_degrees();
            let lat = (2.0 * (y / r).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
            (lon, lat)
        }
    }
}

fn from_geographic(crs: Crs, lon: f64, lat: f64) -> Option<(f64, f64)> {
    match crs {
        Crs::Geographic(_) => Some((lon, lat)),
        Crs::Utm {
            zone,
            northern,
            datum,
        } => Some(utm_forward(
            lon,
            lat,
            Crs::central_meridian(zone),
            northern,
            datum.ellipsoid(),
        )),
        // The poles map to infinity.
        Crs::WebMercator if lat.abs() >= 90.0 => None,
        Crs::WebMercator => {
            let r = Ellipsoid::WGS84.a;
            let x = r * lon.to_radians();
            let y = r * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
            Some((x, y))
        }
    }
}

fn utm_forward(lon: f64, lat: f64, central_meridian: f64, northern: bool, ell: Ellipsoid) -> (f64, f64) {
    let phi = lat.to_radians();
    let dlambda = (lon - central_meridian).to_radians();

    let e2 = ell.e2();
    let ep2 = e2 / (1.0 - e2);
    let (sin_phi, cos_phi) = phi.sin_cos();

    let n = ell.a / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = phi.tan().powi(2);
    let c = ep2 * cos_phi * cos_phi;
    let a = dlambda * cos_phi;
    let m = meridian_arc(phi, ell);

    let x = UTM_SCALE
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + UTM_FALSE_EASTING;

    let y = UTM_SCALE
        * (m + n
            * phi.tan()
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));
    let y = if northern { y } else { y + UTM_FALSE_NORTHING_SOUTH };

    (x, y)
}

fn utm_inverse(x: f64, y: f64, central_meridian: f64, northern: bool, ell: Ellipsoid) -> (f64, f64) {
    let x = x - UTM_FALSE_EASTING;
    let y = if northern { y } else { y - UTM_FALSE_NORTHING_SOUTH };

    let e2 = ell.e2();
    let ep2 = e2 / (1.0 - e2);
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let m = y / UTM_SCALE;
    let mu = m / (ell.a * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2.powi(3) / 256.0));

    // Footpoint latitude.
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin1, cos1) = phi1.sin_cos();
    let n1 = ell.a / (1.0 - e2 * sin1 * sin1).sqrt();
    let t1 = phi1.tan().powi(2);
    let c1 = ep2 * cos1 * cos1;
    let r1 = ell.a * (1.0 - e2) / (1.0 - e2 * sin1 * sin1).powf(1.5);
    let d = x / (n1 * UTM_SCALE);

    let phi = phi1
        - (n1 * phi1.tan() / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);

    let dlambda = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5)
            / 120.0)
        / cos1;

    (central_meridian + dlambda.to_degrees(), phi.to_degrees())
}

fn meridian_arc(phi: f64, ell: Ellipsoid) -> f64 {
    let e2 = ell.e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    ell.a
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn geographic_to_nad83_utm15() {
        let t = EpsgTransformer::new();
        let (x, y) = t.transform(4326, 26915, -90.0, 29.0).unwrap();
        assert_abs_diff_eq!(x, 792_271.071_071, epsilon = 1.0);
        assert_abs_diff_eq!(y, 3_211_697.373_252, epsilon = 1.0);
    }

    #[test]
    fn utm_roundtrip() {
        let t = EpsgTransformer::new();
        for (lon, lat) in [(-90.0, 29.0), (-93.0, 0.5), (-95.5, 45.0)] {
            let (x, y) = t.transform(4326, 32615, lon, lat).unwrap();
            let (lon2, lat2) = t.transform(32615, 4326, x, y).unwrap();
            assert_abs_diff_eq!(lon, lon2, epsilon = 1e-6);
            assert_abs_diff_eq!(lat, lat2, epsilon = 1e-6);
        }
    }

    #[test]
    fn southern_hemisphere_false_northing() {
        let t = EpsgTransformer::new();
        let (x, y) = t.transform(4326, 32733, 15.0, -10.0).unwrap();
        assert_abs_diff_eq!(x, UTM_FALSE_EASTING, epsilon = 1e-6);
        assert!(y < UTM_FALSE_NORTHING_SOUTH && y > 8_000_000.0);
    }

    #[test]
    fn web_mercator_roundtrip() {
        let t = EpsgTransformer::new();
        let (x, y) = t.transform(4326, 3857, -75.0, 35.0).unwrap();
        assert_abs_diff_eq!(x, -8_348_961.81, epsilon = 0.1);
        let (lon, lat) = t.transform(3857, 4326, x, y).unwrap();
        assert_abs_diff_eq!(lon, -75.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, 35.0, epsilon = 1e-9);
    }

    #[test]
    fn web_mercator_pole_unavailable() {
        let t = EpsgTransformer::new();
        assert!(matches!(
            t.transform(4326, 3857, 0.0, 90.0).unwrap_err(),
            ProjError::Unavailable { .. }
        ));
    }

    #[test]
    fn identity_returns_input() {
        let t = EpsgTransformer::new();
        let (x, y) = t.transform(26915, 26915, 123.4, 567.8).unwrap();
        assert_eq!((x, y), (123.4, 567.8));
    }

    #[test]
    fn unknown_codes() {
        let t = EpsgTransformer::new();
        assert_eq!(
            t.transform(4326, 2264, 0.0, 0.0).unwrap_err(),
            ProjError::UnknownCrs { epsg: 2264 }
        );
        assert_eq!(
            t.transform(1, 4326, 0.0, 0.0).unwrap_err(),
            ProjError::UnknownCrs { epsg: 1 }
        );
        assert!(!t.contains_epsg(2264));
        assert!(t.contains_epsg(32615));
    }

    #[test]
    fn batch_preconditions() {
        let t = EpsgTransformer::new();
        assert_eq!(
            t.transform_batch(4326, 3857, &[1.0, 2.0], &[1.0]).unwrap_err(),
            ProjError::LengthMismatch { x_len: 2, y_len: 1 }
        );
        assert_eq!(
            t.transform_batch(4326, 3857, &[], &[]).unwrap_err(),
            ProjError::Empty
        );
    }
}
