use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_JPEG_QUALITY, DEFAULT_PNG_COMPRESSION, DEFAULT_WEBP_QUALITY};
use crate::error::StarTrailError;

/// Output encodings accepted for the composite and timelapse frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFileType {
    Jpeg,
    Png,
    WebP,
    Tiff,
}

impl ImageFileType {
    /// Extension used for files written in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Tiff => "tif",
        }
    }

    /// Whether an EXIF block is embedded when writing this format.
    pub fn supports_exif(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::WebP)
    }
}

impl FromStr for ImageFileType {
    type Err = StarTrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            "tif" | "tiff" => Ok(Self::Tiff),
            _ => Err(StarTrailError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ImageFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Png => write!(f, "PNG"),
            Self::WebP => write!(f, "WebP"),
            Self::Tiff => write!(f, "TIFF"),
        }
    }
}

/// Per-format quality / compression settings (`IMAGE_FILE_COMPRESSION`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileCompression {
    /// JPEG quality, 1-100.
    #[serde(default = "default_jpg")]
    pub jpg: u8,
    /// PNG compression level, 0-9.
    #[serde(default = "default_png")]
    pub png: u8,
    /// WebP quality, 1-100.
    #[serde(default = "default_webp")]
    pub webp: u8,
}

fn default_jpg() -> u8 {
    DEFAULT_JPEG_QUALITY
}
fn default_png() -> u8 {
    DEFAULT_PNG_COMPRESSION
}
fn default_webp() -> u8 {
    DEFAULT_WEBP_QUALITY
}

impl Default for FileCompression {
    fn default() -> Self {
        Self {
            jpg: DEFAULT_JPEG_QUALITY,
            png: DEFAULT_PNG_COMPRESSION,
            webp: DEFAULT_WEBP_QUALITY,
        }
    }
}
