#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use ndarray::{Array2, Array3};

use startrail_core::astro::{BodyPosition, Ephemeris, Observer};
use startrail_core::frame::Frame;
use startrail_core::io::format::{FileCompression, ImageFileType};
use startrail_core::io::image_io::{encode_frame, set_file_timestamp};
use startrail_core::pipeline::StarTrailConfig;

/// Ephemeris that reports the same sun and moon for every instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedEphemeris {
    pub sun: BodyPosition,
    pub moon: BodyPosition,
}

impl FixedEphemeris {
    pub fn new(sun_altitude: f64, moon_altitude: f64, moon_phase: f64) -> Self {
        Self {
            sun: BodyPosition {
                altitude_deg: sun_altitude,
                phase_percent: 100.0,
            },
            moon: BodyPosition {
                altitude_deg: moon_altitude,
                phase_percent: moon_phase,
            },
        }
    }

    /// Sun well below twilight, new moon below the horizon.
    pub fn dark_sky() -> Self {
        Self::new(-40.0, -20.0, 0.0)
    }

    /// Sun above the horizon.
    pub fn daytime() -> Self {
        Self::new(20.0, -20.0, 0.0)
    }
}

impl Ephemeris for FixedEphemeris {
    fn sun(&self, _observer: &Observer, _at: DateTime<Utc>) -> BodyPosition {
        self.sun
    }

    fn moon(&self, _observer: &Observer, _at: DateTime<Utc>) -> BodyPosition {
        self.moon
    }
}

/// 22:00 UTC on 2024-01-10 plus `minutes`.
pub fn night_time(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 22, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// Uniform mono frame.
pub fn flat_mono(height: usize, width: usize, value: u8) -> Frame {
    Frame::mono(Array2::from_elem((height, width), value), night_time(0))
}

/// Dark RGB frame with single-pixel "stars" at the given positions.
pub fn star_field(
    height: usize,
    width: usize,
    background: u8,
    stars: &[(usize, usize)],
) -> Array3<u8> {
    let mut data = Array3::from_elem((height, width, 3), background);
    for &(row, col) in stars {
        for c in 0..3 {
            data[[row, col, c]] = 255;
        }
    }
    data
}

/// Config with timelapse output off and PNG output.
pub fn quiet_config() -> StarTrailConfig {
    StarTrailConfig {
        timelapse: false,
        image_file_type: "png".to_string(),
        ..Default::default()
    }
}

/// Write `data` as a PNG at `dir/name` and set its modification time.
pub fn write_png_at(dir: &Path, name: &str, data: &Array3<u8>, at: DateTime<Utc>) -> PathBuf {
    let path = dir.join(name);
    let bytes = encode_frame(data, ImageFileType::Png, &FileCompression::default(), None).unwrap();
    std::fs::write(&path, bytes).unwrap();
    set_file_timestamp(&path, at).unwrap();
    path
}
