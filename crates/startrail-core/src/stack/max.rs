use ndarray::{Array3, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Result, StarTrailError};

/// Fold `frame` into `composite` by taking the per-pixel, per-channel maximum.
///
/// Parallelizes across pixels for frames >= 256x256.
pub fn max_fold(composite: &mut Array3<u8>, frame: &Array3<u8>) -> Result<()> {
    if composite.dim() != frame.dim() {
        return Err(StarTrailError::FrameDimensionMismatch {
            expected: composite.dim(),
            found: frame.dim(),
        });
    }

    let (h, w, _) = composite.dim();
    let zip = Zip::from(composite).and(frame);
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(|c, &f| *c = (*c).max(f));
    } else {
        zip.for_each(|c, &f| *c = (*c).max(f));
    }
    Ok(())
}
