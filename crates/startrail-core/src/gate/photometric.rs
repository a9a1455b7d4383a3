use ndarray::{Array2, Zip};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::Result;
use crate::frame::Frame;
use crate::mask::ensure_matches;
use crate::pipeline::config::ThresholdConfig;

use super::{ExclusionReason, GateDecision};

/// Brightness measurements of one frame.
#[derive(Clone, Debug)]
pub struct Photometry {
    /// Mean luminance over the mask, 0-255.
    pub mean_brightness: f64,
    pub luminance: Array2<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhotometricVerdict {
    pub decision: GateDecision,
    pub mean_brightness: f64,
    /// Not computed when the brightness rule already excluded the frame.
    pub bright_pixel_count: Option<usize>,
}

/// Mean brightness and saturated-pixel rules.
#[derive(Clone, Copy, Debug)]
pub struct PhotometricGate {
    pub max_brightness: f64,
    pub mask_threshold: u8,
    pub pixel_cutoff_percent: f64,
}

impl PhotometricGate {
    pub fn new(thresholds: &ThresholdConfig) -> Self {
        Self {
            max_brightness: thresholds.max_brightness,
            mask_threshold: thresholds.mask_threshold,
            pixel_cutoff_percent: thresholds.pixel_cutoff_percent,
        }
    }

    /// Convert the frame to luminance and take its masked mean.
    pub fn measure(frame: &Frame, mask: &Array2<u8>) -> Result<Photometry> {
        ensure_matches(mask, frame.height(), frame.width())?;
        let luminance = frame.luminance();
        let mean_brightness = masked_mean(&luminance, mask);
        Ok(Photometry {
            mean_brightness,
            luminance,
        })
    }

    pub fn admit(&self, photometry: &Photometry) -> PhotometricVerdict {
        let mean = photometry.mean_brightness;
        if mean > self.max_brightness {
            return PhotometricVerdict {
                decision: GateDecision::Exclude(ExclusionReason::Brightness { mean }),
                mean_brightness: mean,
                bright_pixel_count: None,
            };
        }

        let (h, w) = photometry.luminance.dim();
        let cutoff = pixel_cutoff(w, h, self.pixel_cutoff_percent);
        let count = count_above(&photometry.luminance, self.mask_threshold);

        let decision = if count as f64 > cutoff {
            GateDecision::Exclude(ExclusionReason::PixelCutoff { count, cutoff })
        } else {
            GateDecision::Allow
        };

        PhotometricVerdict {
            decision,
            mean_brightness: mean,
            bright_pixel_count: Some(count),
        }
    }

    /// Measure and admit in one step.
    pub fn evaluate(&self, frame: &Frame, mask: &Array2<u8>) -> Result<PhotometricVerdict> {
        let photometry = Self::measure(frame, mask)?;
        Ok(self.admit(&photometry))
    }
}

/// Number of bright pixels tolerated in a `width` x `height` frame.
pub fn pixel_cutoff(width: usize, height: usize, percent: f64) -> f64 {
    (width * height) as f64 * (percent / 100.0)
}

/// Mean of `data` over pixels where `mask` is nonzero. Zero for an empty mask.
pub fn masked_mean(data: &Array2<u8>, mask: &Array2<u8>) -> f64 {
    let (sum, count) = match (data.as_slice(), mask.as_slice()) {
        (Some(pixels), Some(weights)) if pixels.len() >= PARALLEL_PIXEL_THRESHOLD => pixels
            .par_iter()
            .zip(weights.par_iter())
            .filter(|&(_, &m)| m != 0)
            .map(|(&v, _)| (v as u64, 1u64))
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1)),
        _ => Zip::from(data)
            .and(mask)
            .fold((0u64, 0u64), |(sum, count), &v, &m| {
                if m != 0 {
                    (sum + v as u64, count + 1)
                } else {
                    (sum, count)
                }
            }),
    };

    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

/// Number of pixels strictly brighter than `threshold`.
pub fn count_above(data: &Array2<u8>, threshold: u8) -> usize {
    match data.as_slice() {
        Some(pixels) if pixels.len() >= PARALLEL_PIXEL_THRESHOLD => {
            pixels.par_iter().filter(|&&v| v > threshold).count()
        }
        _ => data.iter().filter(|&&v| v > threshold).count(),
    }
}
