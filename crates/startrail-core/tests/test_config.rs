use std::path::PathBuf;

use startrail_core::error::StarTrailError;
use startrail_core::io::ImageFileType;
use startrail_core::pipeline::{StarTrailConfig, ThresholdConfig};

#[test]
fn test_empty_toml_gives_defaults() {
    let config: StarTrailConfig = toml::from_str("").unwrap();
    assert_eq!(config, StarTrailConfig::default());
    assert!(config.timelapse);
    assert_eq!(config.image_scale, 100);
    assert_eq!(config.file_type().unwrap(), ImageFileType::Jpeg);
}

#[test]
fn test_default_thresholds() {
    let t = ThresholdConfig::default();
    assert_eq!(t.max_brightness, 50.0);
    assert_eq!(t.mask_threshold, 190);
    assert_eq!(t.pixel_cutoff_percent, 1.0);
    assert_eq!(t.sun_alt_threshold, -15.0);
    assert!(t.moonmode_alt > 90.0);
    assert!(t.moonmode_phase > 100.0);
    assert!(t.moon_alt_threshold > 90.0);
    assert!(t.moon_phase_threshold > 100.0);
}

#[test]
fn test_parse_camera_style_keys() {
    let text = r#"
IMAGE_FOLDER = "/var/www/images"
STARTRAILS_TIMELAPSE = false
IMAGE_FILE_TYPE = "webp"
SQM_ROI = [100, 100, 500, 400]
IMAGE_CROP_ROI = [0, 0, 1920, 1080]
IMAGE_SCALE = 50
STARTRAILS_MAX_ADU = 65
STARTRAILS_MASK_THOLD = 200
STARTRAILS_PIXEL_THOLD = 0.5
STARTRAILS_SUN_ALT_THOLD = -18.0
STARTRAILS_MOONMODE_ALT = 5.0
STARTRAILS_MOONMODE_PHASE = 50.0
STARTRAILS_MOON_ALT_THOLD = 30
STARTRAILS_MOON_PHASE_THOLD = 75
LOCATION_LATITUDE = 33.5
LOCATION_LONGITUDE = -84.25

[IMAGE_FILE_COMPRESSION]
webp = 80
"#;
    let config: StarTrailConfig = toml::from_str(text).unwrap();

    assert_eq!(config.image_folder, Some(PathBuf::from("/var/www/images")));
    assert!(!config.timelapse);
    assert_eq!(config.file_type().unwrap(), ImageFileType::WebP);
    assert_eq!(config.sqm_roi, vec![100, 100, 500, 400]);
    assert_eq!(config.image_crop_roi, Some(vec![0, 0, 1920, 1080]));
    assert_eq!(config.image_scale, 50);

    let t = config.thresholds;
    assert_eq!(t.max_brightness, 65.0);
    assert_eq!(t.mask_threshold, 200);
    assert_eq!(t.pixel_cutoff_percent, 0.5);
    assert_eq!(t.sun_alt_threshold, -18.0);
    assert_eq!(t.moonmode_alt, 5.0);
    assert_eq!(t.moonmode_phase, 50.0);
    assert_eq!(t.moon_alt_threshold, 30.0);
    assert_eq!(t.moon_phase_threshold, 75.0);

    assert_eq!(config.location.latitude, 33.5);
    assert_eq!(config.location.longitude, -84.25);

    assert_eq!(config.image_file_compression.webp, 80);
    assert_eq!(config.image_file_compression.jpg, 90);
    assert_eq!(config.image_file_compression.png, 5);
}

#[test]
fn test_default_config_roundtrips_through_toml() {
    let config = StarTrailConfig {
        image_crop_roi: Some(vec![10, 20, 30, 40]),
        ..Default::default()
    };
    let text = toml::to_string_pretty(&config).unwrap();
    assert!(text.contains("STARTRAILS_SUN_ALT_THOLD"));
    let parsed: StarTrailConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_file_type_aliases() {
    for (name, expected) in [
        ("jpg", ImageFileType::Jpeg),
        ("jpeg", ImageFileType::Jpeg),
        ("png", ImageFileType::Png),
        ("webp", ImageFileType::WebP),
        ("tif", ImageFileType::Tiff),
        ("tiff", ImageFileType::Tiff),
    ] {
        let config = StarTrailConfig {
            image_file_type: name.to_string(),
            ..Default::default()
        };
        assert_eq!(config.file_type().unwrap(), expected);
    }
}

#[test]
fn test_unknown_file_type_is_rejected() {
    let config = StarTrailConfig {
        image_file_type: "bmp".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.file_type(),
        Err(StarTrailError::UnsupportedFormat(name)) if name == "bmp"
    ));
}
