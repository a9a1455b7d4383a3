//! Low-precision solar and lunar ephemeris.
//!
//! Mean orbital elements plus the largest periodic terms. Positions are good
//! to roughly a degree between 1950 and 2050, which is plenty for deciding
//! whether the sun is below twilight or the moon is up.

use chrono::{DateTime, Utc};

use crate::consts::{J2000_JULIAN_DAY, MOON_HORIZONTAL_PARALLAX_DEG, UNIX_EPOCH_JULIAN_DAY};

use super::{BodyPosition, Ephemeris, Observer};

/// Built-in ephemeris used when no other source is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowPrecisionEphemeris;

impl Ephemeris for LowPrecisionEphemeris {
    fn sun(&self, observer: &Observer, at: DateTime<Utc>) -> BodyPosition {
        let d = days_since_j2000(at);
        let sun = sun_ecliptic(d);
        let (ra, dec) = ecliptic_to_equatorial(sun.longitude, sun.latitude, d);
        BodyPosition {
            altitude_deg: altitude(observer, d, ra, dec),
            phase_percent: 100.0,
        }
    }

    fn moon(&self, observer: &Observer, at: DateTime<Utc>) -> BodyPosition {
        let d = days_since_j2000(at);
        let moon = moon_ecliptic(d);
        let sun = sun_ecliptic(d);
        let (ra, dec) = ecliptic_to_equatorial(moon.longitude, moon.latitude, d);

        let geocentric = altitude(observer, d, ra, dec);
        let topocentric = geocentric - MOON_HORIZONTAL_PARALLAX_DEG * geocentric.to_radians().cos();

        BodyPosition {
            altitude_deg: topocentric,
            phase_percent: illuminated_fraction(&moon, &sun) * 100.0,
        }
    }
}

/// Ecliptic coordinates in degrees.
#[derive(Clone, Copy, Debug)]
struct Ecliptic {
    longitude: f64,
    latitude: f64,
}

/// Julian day number for a UTC instant.
pub fn julian_day(at: DateTime<Utc>) -> f64 {
    let seconds = at.timestamp() as f64 + at.timestamp_subsec_nanos() as f64 * 1e-9;
    seconds / 86_400.0 + UNIX_EPOCH_JULIAN_DAY
}

fn days_since_j2000(at: DateTime<Utc>) -> f64 {
    julian_day(at) - J2000_JULIAN_DAY
}

fn sun_ecliptic(d: f64) -> Ecliptic {
    let mean_longitude = normalize_degrees(280.460 + 0.985_647_4 * d);
    let mean_anomaly = normalize_degrees(357.528 + 0.985_600_3 * d).to_radians();
    let longitude = mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin();
    Ecliptic {
        longitude: normalize_degrees(longitude),
        latitude: 0.0,
    }
}

fn moon_ecliptic(d: f64) -> Ecliptic {
    let mean_longitude = 218.316 + 13.176_396 * d;
    let anomaly = normalize_degrees(134.963 + 13.064_993 * d).to_radians();
    let latitude_arg = normalize_degrees(93.272 + 13.229_350 * d).to_radians();
    let elongation = normalize_degrees(297.850 + 12.190_749 * d).to_radians();
    let sun_anomaly = normalize_degrees(357.528 + 0.985_600_3 * d).to_radians();

    let longitude = mean_longitude
        + 6.289 * anomaly.sin()
        + 1.274 * (2.0 * elongation - anomaly).sin()
        + 0.658 * (2.0 * elongation).sin()
        + 0.214 * (2.0 * anomaly).sin()
        - 0.186 * sun_anomaly.sin()
        - 0.114 * (2.0 * latitude_arg).sin();

    Ecliptic {
        longitude: normalize_degrees(longitude),
        latitude: 5.128 * latitude_arg.sin(),
    }
}

/// Returns (right ascension, declination) in degrees.
fn ecliptic_to_equatorial(longitude: f64, latitude: f64, d: f64) -> (f64, f64) {
    let obliquity = (23.439 - 0.000_000_4 * d).to_radians();
    let lon = longitude.to_radians();
    let lat = latitude.to_radians();

    let ra = (lon.sin() * obliquity.cos() - lat.tan() * obliquity.sin()).atan2(lon.cos());
    let dec = (lat.sin() * obliquity.cos() + lat.cos() * obliquity.sin() * lon.sin()).asin();

    (normalize_degrees(ra.to_degrees()), dec.to_degrees())
}

/// Local mean sidereal time in degrees.
fn local_sidereal_time(d: f64, longitude: f64) -> f64 {
    normalize_degrees(280.460_618_37 + 360.985_647_366_29 * d + longitude)
}

fn altitude(observer: &Observer, d: f64, ra: f64, dec: f64) -> f64 {
    let hour_angle = (local_sidereal_time(d, observer.longitude) - ra).to_radians();
    let lat = observer.latitude.to_radians();
    let dec = dec.to_radians();
    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos();
    sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Fraction of the lunar disk lit by the sun, 0.0..=1.0.
fn illuminated_fraction(moon: &Ecliptic, sun: &Ecliptic) -> f64 {
    let cos_elongation = moon.latitude.to_radians().cos()
        * (moon.longitude - sun.longitude).to_radians().cos();
    ((1.0 - cos_elongation) / 2.0).clamp(0.0, 1.0)
}

fn normalize_degrees(value: f64) -> f64 {
    value.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn julian_day_of_j2000() {
        let at = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_day(at) - J2000_JULIAN_DAY).abs() < 1e-9);
    }

    #[test]
    fn normalize_wraps_negative() {
        assert!((normalize_degrees(-30.0) - 330.0).abs() < 1e-12);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-12);
    }
}
