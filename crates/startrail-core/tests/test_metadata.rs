use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};

use startrail_core::metadata::{
    decdeg_to_dms, CameraMetadata, ExifMetadata, GpsCoordinate, Rational,
};

/// (tag, type, count, value/offset slot) for each entry of the IFD at `offset`.
fn read_ifd(bytes: &[u8], offset: usize) -> Vec<(u16, u16, u32, [u8; 4])> {
    let count = u16::from_le_bytes([bytes[offset], bytes[offset + 1]]) as usize;
    (0..count)
        .map(|i| {
            let at = offset + 2 + i * 12;
            let tag = u16::from_le_bytes([bytes[at], bytes[at + 1]]);
            let field_type = u16::from_le_bytes([bytes[at + 2], bytes[at + 3]]);
            let n = u32::from_le_bytes([bytes[at + 4], bytes[at + 5], bytes[at + 6], bytes[at + 7]]);
            let slot = [bytes[at + 8], bytes[at + 9], bytes[at + 10], bytes[at + 11]];
            (tag, field_type, n, slot)
        })
        .collect()
}

fn find(entries: &[(u16, u16, u32, [u8; 4])], tag: u16) -> (u16, u32, [u8; 4]) {
    let (_, t, n, slot) = entries.iter().find(|e| e.0 == tag).copied().unwrap();
    (t, n, slot)
}

fn read_rationals(bytes: &[u8], offset: usize, count: usize) -> Vec<(u32, u32)> {
    (0..count)
        .map(|i| {
            let at = offset + i * 8;
            let num = u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap());
            let den = u32::from_le_bytes(bytes[at + 4..at + 8].try_into().unwrap());
            (num, den)
        })
        .collect()
}

fn camera() -> CameraMetadata {
    CameraMetadata {
        name: "All-sky".into(),
        lens_name: "Fujinon 1.8mm".into(),
        lens_focal_length: 1.8,
        lens_focal_ratio: 2.8,
        owner: None,
        latitude: 40.75,
        longitude: -75.5,
    }
}

#[test]
fn test_decdeg_to_dms() {
    let west = decdeg_to_dms(-75.5);
    assert_eq!(west.degrees, -75);
    assert_eq!(west.minutes, 30);
    assert_relative_eq!(west.seconds, 0.0, epsilon = 1e-6);

    let north = decdeg_to_dms(40.75);
    assert_eq!((north.degrees, north.minutes), (40, 45));
    assert_relative_eq!(north.seconds, 0.0, epsilon = 1e-6);

    let fractional = decdeg_to_dms(12.3456);
    assert_eq!((fractional.degrees, fractional.minutes), (12, 20));
    assert_relative_eq!(fractional.seconds, 44.16, epsilon = 1e-6);
}

#[test]
fn test_gps_references() {
    let lon = GpsCoordinate::longitude(-75.5);
    assert_eq!((lon.reference, lon.degrees, lon.minutes), ('W', 75, 30));

    let lat = GpsCoordinate::latitude(40.75);
    assert_eq!((lat.reference, lat.degrees, lat.minutes), ('N', 40, 45));

    // Under one degree the sign lives only in the decimal value.
    let near_equator = GpsCoordinate::latitude(-0.5);
    assert_eq!(
        (near_equator.reference, near_equator.degrees, near_equator.minutes),
        ('S', 0, 30)
    );
    assert_eq!(GpsCoordinate::longitude(0.0).reference, 'E');
}

#[test]
fn test_gps_seconds_are_always_zero() {
    let coord = GpsCoordinate::latitude(12.3456);
    assert_eq!(
        coord.rationals(),
        [Rational::whole(12), Rational::whole(20), Rational::whole(0)]
    );
}

#[test]
fn test_rational_approximation() {
    assert_eq!(Rational::approximate(2.8, 1_000_000), Rational::new(14, 5));
    assert_eq!(Rational::approximate(1.8, 1_000_000), Rational::new(9, 5));
    assert_eq!(Rational::approximate(0.1, 10), Rational::new(1, 10));
    assert_eq!(Rational::approximate(std::f64::consts::PI, 100), Rational::new(311, 99));
}

#[test]
fn test_exif_carries_camera_fields() {
    let at = Utc.with_ymd_and_hms(2024, 1, 11, 5, 30, 15).unwrap();
    let meta = ExifMetadata::from_camera(&camera(), at);
    assert_eq!(meta.software, "startrail");
    assert!(meta.copyright.is_none());

    let bytes = meta.to_tiff_bytes();
    let ifd0 = read_ifd(&bytes, 8);
    assert_eq!(ifd0.len(), 4);

    let (_, _, exif_slot) = find(&ifd0, 0x8769);
    let exif = read_ifd(&bytes, u32::from_le_bytes(exif_slot) as usize);

    let (field_type, count, slot) = find(&exif, 0x829D);
    assert_eq!((field_type, count), (5, 1));
    assert_eq!(
        read_rationals(&bytes, u32::from_le_bytes(slot) as usize, 1),
        vec![(14, 5)]
    );

    let (_, count, slot) = find(&exif, 0x9003);
    let start = u32::from_le_bytes(slot) as usize;
    assert_eq!(&bytes[start..start + count as usize], b"2024:01:11 05:30:15\0");
}

#[test]
fn test_exif_gps_block() {
    let at = Utc.with_ymd_and_hms(2024, 1, 11, 5, 30, 15).unwrap();
    let bytes = ExifMetadata::from_camera(&camera(), at).to_tiff_bytes();
    let ifd0 = read_ifd(&bytes, 8);
    let (_, _, gps_slot) = find(&ifd0, 0x8825);
    let gps = read_ifd(&bytes, u32::from_le_bytes(gps_slot) as usize);

    let (_, count, version) = find(&gps, 0x0000);
    assert_eq!((count, version), (4, [2, 2, 0, 0]));

    let (_, _, lat_ref) = find(&gps, 0x0001);
    assert_eq!(&lat_ref[..2], b"N\0");
    let (_, _, lon_ref) = find(&gps, 0x0003);
    assert_eq!(&lon_ref[..2], b"W\0");

    let (_, count, slot) = find(&gps, 0x0004);
    assert_eq!(
        read_rationals(&bytes, u32::from_le_bytes(slot) as usize, count as usize),
        vec![(75, 1), (30, 1), (0, 1)]
    );

    let (_, count, slot) = find(&gps, 0x0007);
    assert_eq!(
        read_rationals(&bytes, u32::from_le_bytes(slot) as usize, count as usize),
        vec![(5, 1), (30, 1), (15, 1)]
    );
}

#[test]
fn test_owner_becomes_copyright() {
    let camera = CameraMetadata {
        owner: Some("Dark Sky Club".into()),
        ..camera()
    };
    let meta = ExifMetadata::from_camera(&camera, Utc::now());
    assert_eq!(meta.copyright.as_deref(), Some("Dark Sky Club"));
    let ifd0 = read_ifd(&meta.to_tiff_bytes(), 8);
    assert_eq!(ifd0.len(), 5);
}
