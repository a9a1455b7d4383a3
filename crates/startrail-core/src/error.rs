use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarTrailError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unknown file type: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(usize),

    #[error("Mask is {mask_width}x{mask_height} but frame is {frame_width}x{frame_height}")]
    MaskDimensionMismatch {
        mask_width: usize,
        mask_height: usize,
        frame_width: usize,
        frame_height: usize,
    },

    #[error("Frame shape {found:?} does not match composite shape {expected:?}")]
    FrameDimensionMismatch {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    #[error("Invalid region of interest: {0}")]
    InvalidRoi(String),

    #[error("Empty frame sequence")]
    EmptySequence,
}

pub type Result<T> = std::result::Result<T, StarTrailError>;
