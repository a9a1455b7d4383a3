use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::astro::Observer;
use crate::consts::{
    DEFAULT_MASK_THRESHOLD, DEFAULT_MAX_BRIGHTNESS, DEFAULT_PIXEL_CUTOFF_PERCENT,
    DEFAULT_SUN_ALT_THRESHOLD, DISABLED_MOON_ALT, DISABLED_MOON_PHASE,
};
use crate::error::Result;
use crate::io::format::{FileCompression, ImageFileType};

/// Run configuration. Keys follow the all-sky camera's config file names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StarTrailConfig {
    /// Parent directory for the timelapse workspace.
    #[serde(rename = "IMAGE_FOLDER", default, skip_serializing_if = "Option::is_none")]
    pub image_folder: Option<PathBuf>,
    /// Write a composite snapshot after every accepted frame.
    #[serde(rename = "STARTRAILS_TIMELAPSE", default = "default_timelapse")]
    pub timelapse: bool,
    /// One of jpg/jpeg, png, webp, tif/tiff.
    #[serde(rename = "IMAGE_FILE_TYPE", default = "default_file_type")]
    pub image_file_type: String,
    /// Brightness sampling rectangle `[x1, y1, x2, y2]` in unbinned pixels.
    /// Empty means the central region.
    #[serde(rename = "SQM_ROI", default)]
    pub sqm_roi: Vec<u32>,
    /// Crop applied to the frames upstream, in unbinned pixels.
    #[serde(rename = "IMAGE_CROP_ROI", default, skip_serializing_if = "Option::is_none")]
    pub image_crop_roi: Option<Vec<u32>>,
    /// Scale applied to the frames upstream, in percent. 100 = none.
    #[serde(rename = "IMAGE_SCALE", default = "default_scale")]
    pub image_scale: u32,
    #[serde(flatten)]
    pub thresholds: ThresholdConfig,
    #[serde(flatten)]
    pub location: Observer,
    /// Kept last so it serialises as a trailing TOML table.
    #[serde(rename = "IMAGE_FILE_COMPRESSION", default)]
    pub image_file_compression: FileCompression,
}

fn default_timelapse() -> bool {
    true
}
fn default_file_type() -> String {
    "jpg".to_string()
}
fn default_scale() -> u32 {
    100
}

impl Default for StarTrailConfig {
    fn default() -> Self {
        Self {
            image_folder: None,
            timelapse: default_timelapse(),
            image_file_type: default_file_type(),
            sqm_roi: Vec::new(),
            image_crop_roi: None,
            image_scale: default_scale(),
            thresholds: ThresholdConfig::default(),
            location: Observer::default(),
            image_file_compression: FileCompression::default(),
        }
    }
}

impl StarTrailConfig {
    /// Resolve `IMAGE_FILE_TYPE`, failing on anything unsupported.
    pub fn file_type(&self) -> Result<ImageFileType> {
        self.image_file_type.parse()
    }
}

/// Exclusion thresholds for the astronomical and photometric gates.
///
/// The moon rules default to values above the possible altitude/phase range,
/// which keeps them disabled until configured.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Maximum masked mean brightness (0-255).
    #[serde(rename = "STARTRAILS_MAX_ADU", default = "default_max_brightness")]
    pub max_brightness: f64,
    /// Luminance above which a pixel counts as bright.
    #[serde(rename = "STARTRAILS_MASK_THOLD", default = "default_mask_threshold")]
    pub mask_threshold: u8,
    /// Allowed share of bright pixels, percent of the frame area.
    #[serde(rename = "STARTRAILS_PIXEL_THOLD", default = "default_pixel_cutoff")]
    pub pixel_cutoff_percent: f64,
    #[serde(rename = "STARTRAILS_SUN_ALT_THOLD", default = "default_sun_alt")]
    pub sun_alt_threshold: f64,
    #[serde(rename = "STARTRAILS_MOONMODE_ALT", default = "default_moon_alt")]
    pub moonmode_alt: f64,
    #[serde(rename = "STARTRAILS_MOONMODE_PHASE", default = "default_moon_phase")]
    pub moonmode_phase: f64,
    #[serde(rename = "STARTRAILS_MOON_ALT_THOLD", default = "default_moon_alt")]
    pub moon_alt_threshold: f64,
    #[serde(rename = "STARTRAILS_MOON_PHASE_THOLD", default = "default_moon_phase")]
    pub moon_phase_threshold: f64,
}

fn default_max_brightness() -> f64 {
    DEFAULT_MAX_BRIGHTNESS
}
fn default_mask_threshold() -> u8 {
    DEFAULT_MASK_THRESHOLD
}
fn default_pixel_cutoff() -> f64 {
    DEFAULT_PIXEL_CUTOFF_PERCENT
}
fn default_sun_alt() -> f64 {
    DEFAULT_SUN_ALT_THRESHOLD
}
fn default_moon_alt() -> f64 {
    DISABLED_MOON_ALT
}
fn default_moon_phase() -> f64 {
    DISABLED_MOON_PHASE
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            max_brightness: DEFAULT_MAX_BRIGHTNESS,
            mask_threshold: DEFAULT_MASK_THRESHOLD,
            pixel_cutoff_percent: DEFAULT_PIXEL_CUTOFF_PERCENT,
            sun_alt_threshold: DEFAULT_SUN_ALT_THRESHOLD,
            moonmode_alt: DISABLED_MOON_ALT,
            moonmode_phase: DISABLED_MOON_PHASE,
            moon_alt_threshold: DISABLED_MOON_ALT,
            moon_phase_threshold: DISABLED_MOON_PHASE,
        }
    }
}
