use std::fs::{self, File, FileTimes};
use std::io::Cursor;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::tiff::TiffEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use ndarray::{Array2, Array3};

use crate::consts::{COLOR_CHANNEL_COUNT, MAX_PNG_COMPRESSION};
use crate::error::{Result, StarTrailError};
use crate::frame::Frame;

use super::format::{FileCompression, ImageFileType};

/// Decode an image file into a Frame.
///
/// Color images become 3-channel RGB, everything else single-channel. The
/// frame timestamp is the file's modification time.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let timestamp = file_timestamp(path)?;
    let img = image::open(path)?;
    let (w, h) = (img.width() as usize, img.height() as usize);

    let data = if img.color().has_color() {
        Array3::from_shape_vec((h, w, COLOR_CHANNEL_COUNT), img.to_rgb8().into_raw())
    } else {
        Array3::from_shape_vec((h, w, 1), img.to_luma8().into_raw())
    }
    .map_err(|_| StarTrailError::InvalidDimensions {
        width: w as u32,
        height: h as u32,
    })?;

    Ok(Frame::new(data, timestamp).with_source(path.to_path_buf()))
}

/// Load a brightness mask as a single-channel array. Non-zero pixels are
/// sampled.
pub fn load_mask(path: &Path) -> Result<Array2<u8>> {
    let img = image::open(path)?.to_luma8();
    let (w, h) = img.dimensions();
    Array2::from_shape_vec((h as usize, w as usize), img.into_raw()).map_err(|_| {
        StarTrailError::InvalidDimensions {
            width: w,
            height: h,
        }
    })
}

/// Modification time of a file as UTC.
pub fn file_timestamp(path: &Path) -> Result<DateTime<Utc>> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Set both access and modification time of a file.
pub fn set_file_timestamp(path: &Path, at: DateTime<Utc>) -> Result<()> {
    let time = SystemTime::from(at);
    let file = File::options().write(true).open(path)?;
    file.set_times(FileTimes::new().set_accessed(time).set_modified(time))?;
    Ok(())
}

/// Encode pixel data (shape `(h, w, 1|3)`) in the given format.
///
/// `exif` is a TIFF-structured EXIF block, attached only for formats that
/// carry one (see [`ImageFileType::supports_exif`]).
pub fn encode_frame(
    data: &Array3<u8>,
    format: ImageFileType,
    compression: &FileCompression,
    exif: Option<Vec<u8>>,
) -> Result<Vec<u8>> {
    let (h, w, channels) = data.dim();
    let color_type = match channels {
        1 => ExtendedColorType::L8,
        COLOR_CHANNEL_COUNT => ExtendedColorType::Rgb8,
        n => return Err(StarTrailError::UnsupportedChannels(n)),
    };
    let (w, h) = (w as u32, h as u32);
    let pixels: Vec<u8> = data.iter().copied().collect();
    let exif = exif.filter(|_| format.supports_exif());

    let mut buf = Vec::new();
    match format {
        ImageFileType::Jpeg => {
            let quality = compression.jpg.clamp(1, 100);
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            write_with_exif(encoder, exif, &pixels, w, h, color_type)?;
        }
        ImageFileType::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut buf,
                CompressionType::Level(compression.png.min(MAX_PNG_COMPRESSION)),
                FilterType::Adaptive,
            );
            write_with_exif(encoder, exif, &pixels, w, h, color_type)?;
        }
        ImageFileType::WebP => {
            let encoder = WebPEncoder::new_lossless(&mut buf);
            write_with_exif(encoder, exif, &pixels, w, h, color_type)?;
        }
        ImageFileType::Tiff => {
            TiffEncoder::new(Cursor::new(&mut buf)).write_image(&pixels, w, h, color_type)?;
        }
    }
    Ok(buf)
}

fn write_with_exif<E: ImageEncoder>(
    mut encoder: E,
    exif: Option<Vec<u8>>,
    pixels: &[u8],
    width: u32,
    height: u32,
    color_type: ExtendedColorType,
) -> Result<()> {
    if let Some(exif) = exif {
        encoder
            .set_exif_metadata(exif)
            .map_err(image::ImageError::Unsupported)?;
    }
    encoder.write_image(pixels, width, height, color_type)?;
    Ok(())
}
