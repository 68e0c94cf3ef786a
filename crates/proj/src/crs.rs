//! The coordinate reference systems understood by [`EpsgTransformer`].
//!
//! [`EpsgTransformer`]: crate::EpsgTransformer

use std::fmt;

/// Reference ellipsoid parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres.
    pub a: f64,
    /// Flattening.
    pub f: f64,
}

impl Ellipsoid {
    /// World Geodetic System 1984.
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    /// Geodetic Reference System 1980, used by NAD83.
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257_222_101,
    };

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        2.0 * self.f - self.f * self.f
    }
}

/// Horizontal datum. NAD83 and WGS84 are treated as coincident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datum {
    Wgs84,
    Nad83,
}

impl Datum {
    pub fn ellipsoid(self) -> Ellipsoid {
        match self {
            Datum::Wgs84 => Ellipsoid::WGS84,
            Datum::Nad83 => Ellipsoid::GRS80,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Datum::Wgs84 => "WGS 84",
            Datum::Nad83 => "NAD83",
        }
    }
}

/// A coordinate reference system resolved from an EPSG code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crs {
    /// Longitude/latitude in degrees (EPSG:4326, EPSG:4269).
    Geographic(Datum),
    /// Universal Transverse Mercator (EPSG:326zz, 327zz, 269zz).
    Utm {
        zone: u8,
        northern: bool,
        datum: Datum,
    },
    /// Spherical Web Mercator (EPSG:3857).
    WebMercator,
}

impl Crs {
    /// Resolves an EPSG code, or `None` if it is not supported.
    pub fn from_epsg(epsg: i32) -> Option<Self> {
        let utm = |base: i32, northern: bool, datum: Datum, max_zone: i32| {
            let zone = epsg - base;
            (1..=max_zone).contains(&zone).then(|| Crs::Utm {
                zone: zone as u8,
                northern,
                datum,
            })
        };
        match epsg {
            4326 => Some(Crs::Geographic(Datum::Wgs84)),
            4269 => Some(Crs::Geographic(Datum::Nad83)),
            3857 => Some(Crs::WebMercator),
            32601..=32660 => utm(32600, true, Datum::Wgs84, 60),
            32701..=32760 => utm(32700, false, Datum::Wgs84, 60),
            26901..=26923 => utm(26900, true, Datum::Nad83, 23),
            _ => None,
        }
    }

    /// Central meridian of a UTM zone, in degrees.
    pub fn central_meridian(zone: u8) -> f64 {
        f64::from(zone) * 6.0 - 183.0
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Geographic(datum) => write!(f, "{}", datum.label()),
            Crs::Utm {
                zone,
                northern,
                datum,
            } => write!(
                f,
                "{} / UTM zone {}{}",
                datum.label(),
                zone,
                if *northern { 'N' } else { 'S' }
            ),
            Crs::WebMercator => write!(f, "WGS 84 / Pseudo-Mercator"),
        }
    }
}

/// A short human-readable description of an EPSG code.
pub fn epsg_description(epsg: i32) -> Option<String> {
    Crs::from_epsg(epsg).map(|crs| crs.to_string())
}
