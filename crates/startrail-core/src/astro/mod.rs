//! Sun and moon positions for the astronomical gate.
//!
//! The gate only needs altitude and illuminated fraction, so ephemerides are
//! consumed through the [`Ephemeris`] trait. [`LowPrecisionEphemeris`] is the
//! built-in implementation; callers with a better source can plug it in.

pub mod low_precision;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use low_precision::LowPrecisionEphemeris;

/// Geographic position of the camera, decimal degrees.
/// Latitude is positive north, longitude positive east.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    #[serde(rename = "LOCATION_LATITUDE", default)]
    pub latitude: f64,
    #[serde(rename = "LOCATION_LONGITUDE", default)]
    pub longitude: f64,
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Apparent position of a body for an observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPosition {
    /// Altitude above the horizon in degrees.
    pub altitude_deg: f64,
    /// Illuminated fraction of the disk in percent (always 100 for the sun).
    pub phase_percent: f64,
}

/// Source of sun and moon positions.
pub trait Ephemeris: Send + Sync {
    fn sun(&self, observer: &Observer, at: DateTime<Utc>) -> BodyPosition;

    fn moon(&self, observer: &Observer, at: DateTime<Utc>) -> BodyPosition;
}
