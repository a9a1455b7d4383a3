//! Camera metadata and the EXIF block embedded in the final image.

pub mod exif;
pub mod gps;
pub mod rational;

use serde::{Deserialize, Serialize};

pub use exif::ExifMetadata;
pub use gps::{decdeg_to_dms, Dms, GpsCoordinate};
pub use rational::Rational;

/// Camera and site description written into the output metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lens_name: String,
    /// Focal length in millimetres.
    #[serde(default)]
    pub lens_focal_length: f64,
    /// Focal ratio (f-number).
    #[serde(default)]
    pub lens_focal_ratio: f64,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}
