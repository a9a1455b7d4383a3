use std::path::PathBuf;

use chrono::{DateTime, Utc};
use ndarray::{Array2, Array3, Axis};

use crate::consts::{COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// A single decoded sky exposure.
/// Pixel values are 8-bit, 0..=255.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width, channels).
    /// `channels` is 1 (mono) or 3 (RGB).
    pub data: Array3<u8>,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array3<u8>, timestamp: DateTime<Utc>) -> Self {
        debug_assert!(matches!(data.dim().2, 1 | COLOR_CHANNEL_COUNT));
        Self {
            data,
            metadata: FrameMetadata {
                timestamp,
                source: None,
            },
        }
    }

    /// Build a single-channel frame from a 2D array.
    pub fn mono(data: Array2<u8>, timestamp: DateTime<Utc>) -> Self {
        Self::new(data.insert_axis(Axis(2)), timestamp)
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.metadata.source = Some(source);
        self
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn is_color(&self) -> bool {
        self.channels() == COLOR_CHANNEL_COUNT
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.metadata.timestamp
    }

    /// Single-channel luminance. Mono frames are returned as is, RGB frames
    /// use ITU-R BT.601 weights rounded to the nearest integer.
    pub fn luminance(&self) -> Array2<u8> {
        if !self.is_color() {
            return self.data.index_axis(Axis(2), 0).to_owned();
        }
        self.data.map_axis(Axis(2), |px| luma(px[0], px[1], px[2]))
    }
}

#[derive(Clone, Debug)]
pub struct FrameMetadata {
    /// Capture time of the exposure (UTC).
    pub timestamp: DateTime<Utc>,
    /// File the frame was decoded from, if any.
    pub source: Option<PathBuf>,
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}
