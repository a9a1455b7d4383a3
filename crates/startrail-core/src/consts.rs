/// Minimum pixel count (h*w) to use Rayon parallelism inside a frame.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Largest representable 8-bit pixel value.
pub const MAX_PIXEL_VALUE: u8 = u8::MAX;

/// Mean masked brightness above which a frame is excluded (0-255 scale).
pub const DEFAULT_MAX_BRIGHTNESS: f64 = 50.0;

/// Luminance above which a pixel counts towards the pixel cutoff.
pub const DEFAULT_MASK_THRESHOLD: u8 = 190;

/// Percentage of the frame area allowed above `DEFAULT_MASK_THRESHOLD`.
pub const DEFAULT_PIXEL_CUTOFF_PERCENT: f64 = 1.0;

/// Sun altitude (degrees) above which frames are excluded.
pub const DEFAULT_SUN_ALT_THRESHOLD: f64 = -15.0;

/// Altitude sentinel above the zenith. Moon rules using it never match.
pub const DISABLED_MOON_ALT: f64 = 91.0;

/// Phase sentinel above full illumination. Moon rules using it never match.
pub const DISABLED_MOON_PHASE: f64 = 101.0;

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Default PNG compression level (0-9).
pub const DEFAULT_PNG_COMPRESSION: u8 = 5;

/// Strongest PNG compression level accepted by the encoder.
pub const MAX_PNG_COMPRESSION: u8 = 9;

/// Default WebP quality. The bundled encoder is lossless, so this is only
/// carried through the config.
pub const DEFAULT_WEBP_QUALITY: u8 = 90;

/// Suffix of the per-run timelapse workspace directory.
pub const TIMELAPSE_DIR_SUFFIX: &str = "_startrail_timelapse";

/// Value written to the EXIF Software tag.
pub const EXIF_SOFTWARE: &str = "startrail";

/// Largest denominator used when turning lens parameters into rationals.
pub const RATIONAL_MAX_DENOMINATOR: u64 = 1_000_000;

/// Permission bits applied to the final output file.
pub const OUTPUT_FILE_MODE: u32 = 0o644;

/// Julian day of the J2000.0 epoch.
pub const J2000_JULIAN_DAY: f64 = 2_451_545.0;

/// Julian day of the Unix epoch.
pub const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;

/// Mean lunar horizontal parallax in degrees.
pub const MOON_HORIZONTAL_PARALLAX_DEG: f64 = 0.9507;
