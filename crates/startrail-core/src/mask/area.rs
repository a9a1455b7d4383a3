//! Area-averaging resampling for single-channel masks.
//!
//! Every destination pixel is the coverage-weighted mean of the source
//! pixels its footprint overlaps. Shrinking therefore preserves the
//! fraction of "on" area, which keeps masked means stable after the frame
//! pipeline has downscaled its images.

use ndarray::Array2;

/// Resize `src` to `(new_h, new_w)` using area interpolation.
pub fn resize_area(src: &Array2<u8>, new_h: usize, new_w: usize) -> Array2<u8> {
    let (h, w) = src.dim();
    let mut result = Array2::<u8>::zeros((new_h, new_w));
    if h == 0 || w == 0 || new_h == 0 || new_w == 0 {
        return result;
    }

    let row_weights = axis_weights(h, new_h);
    let col_weights = axis_weights(w, new_w);

    for (r, rows) in row_weights.iter().enumerate() {
        for (c, cols) in col_weights.iter().enumerate() {
            let mut acc = 0.0f64;
            let mut total = 0.0f64;
            for &(sr, wr) in rows {
                for &(sc, wc) in cols {
                    let weight = wr * wc;
                    acc += src[[sr, sc]] as f64 * weight;
                    total += weight;
                }
            }
            if total > 0.0 {
                result[[r, c]] = (acc / total).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    result
}

/// For each destination index along one axis, the overlapping source indices
/// and the length of the overlap.
fn axis_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|i| {
            let start = i as f64 * scale;
            let end = ((i + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = (end.min((s + 1) as f64) - start.max(s as f64)).max(0.0);
                    (overlap > 0.0).then_some((s, overlap))
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halving_averages_2x2_blocks() {
        let src = Array2::from_shape_vec((2, 4), vec![0, 255, 255, 255, 0, 255, 255, 255]).unwrap();
        let out = resize_area(&src, 1, 2);
        assert_eq!(out.dim(), (1, 2));
        assert_eq!(out[[0, 0]], 128);
        assert_eq!(out[[0, 1]], 255);
    }

    #[test]
    fn identity_size_is_unchanged() {
        let src = Array2::from_shape_fn((3, 5), |(r, c)| (r * 10 + c) as u8);
        assert_eq!(resize_area(&src, 3, 5), src);
    }

    #[test]
    fn non_integer_ratio_covers_all_pixels() {
        let src = Array2::from_elem((7, 7), 200u8);
        let out = resize_area(&src, 3, 3);
        assert!(out.iter().all(|&v| v == 200));
    }
}
