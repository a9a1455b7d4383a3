//! Region-of-interest mask used to sample sky brightness.
//!
//! The mask is either supplied by the caller (usually drawn on full-size,
//! unbinned captures, so it is cropped and scaled the same way the frames
//! were, once, up front) or generated on the first frame from `SQM_ROI`,
//! falling back to the central two thirds of the frame. Either way it must
//! match the frame dimensions exactly.

pub mod area;

use ndarray::{s, Array2};
use tracing::{info, warn};

use crate::consts::MAX_PIXEL_VALUE;
use crate::error::{Result, StarTrailError};
use crate::pipeline::config::StarTrailConfig;

use area::resize_area;

/// Rectangle given by two opposite corners, in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoiRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl RoiRect {
    /// Parse `[x1, y1, x2, y2]`, dividing every coordinate by the binning
    /// factor. Returns `None` when fewer than four values are given.
    pub fn from_config(values: &[u32], binning: u32) -> Option<Self> {
        let bin = binning.max(1);
        match values {
            [x1, y1, x2, y2, ..] => Some(Self {
                x1: x1 / bin,
                y1: y1 / bin,
                x2: x2 / bin,
                y2: y2 / bin,
            }),
            _ => None,
        }
    }
}

/// Mask geometry settings resolved from the run configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaskSettings {
    /// Brightness sampling rectangle for generated masks.
    pub sqm_roi: Option<RoiRect>,
    /// Crop applied to externally supplied masks.
    pub crop_roi: Option<RoiRect>,
    /// Scale applied to externally supplied masks, in percent.
    pub scale_percent: u32,
}

impl MaskSettings {
    pub fn from_config(config: &StarTrailConfig, binning: u32) -> Self {
        Self {
            sqm_roi: RoiRect::from_config(&config.sqm_roi, binning),
            crop_roi: config
                .image_crop_roi
                .as_deref()
                .and_then(|roi| RoiRect::from_config(roi, binning)),
            scale_percent: config.image_scale,
        }
    }
}

/// Resolve the brightness mask for frames of `frame_height` x `frame_width`.
///
/// `slot` holds an external mask already passed through [`adapt_mask`], or
/// nothing, in which case a rectangle mask is generated and stored there. A
/// mask that does not match the frame stays in the slot and an error is
/// returned.
pub fn build_or_adapt<'a>(
    slot: &'a mut Option<Array2<u8>>,
    frame_height: usize,
    frame_width: usize,
    settings: &MaskSettings,
) -> Result<&'a Array2<u8>> {
    let mask = slot.get_or_insert_with(|| generate_mask(frame_height, frame_width, settings));
    ensure_matches(mask, frame_height, frame_width)?;
    Ok(mask)
}

/// Crop then scale an externally supplied mask.
pub fn adapt_mask(mask: Array2<u8>, settings: &MaskSettings) -> Result<Array2<u8>> {
    let mut mask = mask;

    if let Some(ref roi) = settings.crop_roi {
        mask = crop_mask(&mask, roi)?;
    }

    if settings.scale_percent != 0 && settings.scale_percent != 100 {
        mask = scale_mask(&mask, settings.scale_percent)?;
    }

    Ok(mask)
}

/// Cut `[y1..y2, x1..x2]` out of the mask. Coordinates past the edge are
/// clamped.
pub fn crop_mask(mask: &Array2<u8>, roi: &RoiRect) -> Result<Array2<u8>> {
    let (h, w) = mask.dim();
    let x1 = (roi.x1 as usize).min(w);
    let x2 = (roi.x2 as usize).min(w);
    let y1 = (roi.y1 as usize).min(h);
    let y2 = (roi.y2 as usize).min(h);

    if x2 <= x1 || y2 <= y1 {
        return Err(StarTrailError::InvalidRoi(format!(
            "crop {roi:?} is empty for a {w}x{h} mask"
        )));
    }

    let cropped = mask.slice(s![y1..y2, x1..x2]).to_owned();
    info!(width = x2 - x1, height = y2 - y1, "New cropped mask size");
    Ok(cropped)
}

/// Resize the mask to `scale_percent` of its size, rounding dimensions down.
pub fn scale_mask(mask: &Array2<u8>, scale_percent: u32) -> Result<Array2<u8>> {
    let (h, w) = mask.dim();
    let new_w = w * scale_percent as usize / 100;
    let new_h = h * scale_percent as usize / 100;

    if new_w == 0 || new_h == 0 {
        return Err(StarTrailError::InvalidDimensions {
            width: new_w as u32,
            height: new_h as u32,
        });
    }

    info!(scale_percent, width = new_w, height = new_h, "Scaling mask");
    Ok(resize_area(mask, new_h, new_w))
}

/// Generate a filled-rectangle mask. Both corners are inclusive.
pub fn generate_mask(height: usize, width: usize, settings: &MaskSettings) -> Array2<u8> {
    let mut mask = Array2::<u8>::zeros((height, width));
    if height == 0 || width == 0 {
        return mask;
    }

    let (x1, y1, x2, y2) = match settings.sqm_roi {
        Some(roi) => {
            info!(?roi, "Generating mask based on SQM_ROI");
            (roi.x1 as i64, roi.y1 as i64, roi.x2 as i64, roi.y2 as i64)
        }
        None => {
            warn!("Using central ROI for ADU mask");
            central_rect(height, width)
        }
    };

    let (x_lo, x_hi) = (x1.min(x2), x1.max(x2));
    let (y_lo, y_hi) = (y1.min(y2), y1.max(y2));
    let last_col = width as i64 - 1;
    let last_row = height as i64 - 1;

    if x_lo > last_col || y_lo > last_row {
        return mask;
    }

    let cols = x_lo.max(0) as usize..=x_hi.min(last_col) as usize;
    let rows = y_lo.max(0) as usize..=y_hi.min(last_row) as usize;
    mask.slice_mut(s![rows, cols]).fill(MAX_PIXEL_VALUE);
    mask
}

/// Corners of the rectangle spanning `center - size/3 ..= center + size/3`.
fn central_rect(height: usize, width: usize) -> (i64, i64, i64, i64) {
    let w = width as f64;
    let h = height as f64;
    (
        (w / 2.0 - w / 3.0) as i64,
        (h / 2.0 - h / 3.0) as i64,
        (w / 2.0 + w / 3.0) as i64,
        (h / 2.0 + h / 3.0) as i64,
    )
}

/// Error unless the mask has exactly the frame dimensions.
pub fn ensure_matches(mask: &Array2<u8>, frame_height: usize, frame_width: usize) -> Result<()> {
    let (mask_height, mask_width) = mask.dim();
    if mask_height != frame_height || mask_width != frame_width {
        return Err(StarTrailError::MaskDimensionMismatch {
            mask_width,
            mask_height,
            frame_width,
            frame_height,
        });
    }
    Ok(())
}
