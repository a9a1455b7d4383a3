//! Minimal little-endian TIFF/EXIF serialiser.
//!
//! Produces the TIFF structure handed to the image encoders as EXIF
//! metadata: IFD0 with pointers to an Exif IFD and a GPS IFD. Entries are
//! written in ascending tag order.

use chrono::{DateTime, Timelike, Utc};

use crate::consts::{EXIF_SOFTWARE, RATIONAL_MAX_DENOMINATOR};

use super::gps::GpsCoordinate;
use super::rational::Rational;
use super::CameraMetadata;

// IFD0
const TAG_MODEL: u16 = 0x0110;
const TAG_SOFTWARE: u16 = 0x0131;
const TAG_COPYRIGHT: u16 = 0x8298;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_GPS_IFD: u16 = 0x8825;

// Exif IFD
const TAG_F_NUMBER: u16 = 0x829D;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_FOCAL_LENGTH: u16 = 0x920A;
const TAG_LENS_SPECIFICATION: u16 = 0xA432;
const TAG_LENS_MODEL: u16 = 0xA434;

// GPS IFD
const TAG_GPS_VERSION_ID: u16 = 0x0000;
const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
const TAG_GPS_LATITUDE: u16 = 0x0002;
const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
const TAG_GPS_LONGITUDE: u16 = 0x0004;
const TAG_GPS_TIME_STAMP: u16 = 0x0007;
const TAG_GPS_DATE_STAMP: u16 = 0x001D;

const TYPE_BYTE: u16 = 1;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

const TIFF_HEADER_SIZE: u32 = 8;
const GPS_VERSION: [u8; 4] = [2, 2, 0, 0];

/// Everything written into the output image's EXIF block.
#[derive(Clone, Debug, PartialEq)]
pub struct ExifMetadata {
    pub model: String,
    pub software: String,
    pub copyright: Option<String>,
    pub captured_at: DateTime<Utc>,
    pub lens_model: String,
    pub focal_length: Rational,
    pub f_number: Rational,
    pub latitude: GpsCoordinate,
    pub longitude: GpsCoordinate,
}

impl ExifMetadata {
    pub fn from_camera(camera: &CameraMetadata, captured_at: DateTime<Utc>) -> Self {
        Self {
            model: camera.name.clone(),
            software: EXIF_SOFTWARE.to_string(),
            copyright: camera.owner.clone().filter(|owner| !owner.is_empty()),
            captured_at,
            lens_model: camera.lens_name.clone(),
            focal_length: Rational::approximate(camera.lens_focal_length, RATIONAL_MAX_DENOMINATOR),
            f_number: Rational::approximate(camera.lens_focal_ratio, RATIONAL_MAX_DENOMINATOR),
            latitude: GpsCoordinate::latitude(camera.latitude),
            longitude: GpsCoordinate::longitude(camera.longitude),
        }
    }

    /// Serialise as a TIFF byte stream.
    pub fn to_tiff_bytes(&self) -> Vec<u8> {
        let mut ifd0 = vec![
            Entry::ascii(TAG_MODEL, &self.model),
            Entry::ascii(TAG_SOFTWARE, &self.software),
            Entry::long(TAG_EXIF_IFD, 0),
            Entry::long(TAG_GPS_IFD, 0),
        ];
        if let Some(ref copyright) = self.copyright {
            ifd0.push(Entry::ascii(TAG_COPYRIGHT, copyright));
        }

        let exif = vec![
            Entry::rational(TAG_F_NUMBER, vec![self.f_number]),
            Entry::ascii(
                TAG_DATE_TIME_ORIGINAL,
                &self.captured_at.format("%Y:%m:%d %H:%M:%S").to_string(),
            ),
            Entry::rational(TAG_FOCAL_LENGTH, vec![self.focal_length]),
            Entry::rational(
                TAG_LENS_SPECIFICATION,
                vec![self.focal_length, self.focal_length, self.f_number, self.f_number],
            ),
            Entry::ascii(TAG_LENS_MODEL, &self.lens_model),
        ];

        let at = self.captured_at;
        let gps = vec![
            Entry::bytes(TAG_GPS_VERSION_ID, GPS_VERSION.to_vec()),
            Entry::ascii(TAG_GPS_LATITUDE_REF, &self.latitude.reference.to_string()),
            Entry::rational(TAG_GPS_LATITUDE, self.latitude.rationals().to_vec()),
            Entry::ascii(TAG_GPS_LONGITUDE_REF, &self.longitude.reference.to_string()),
            Entry::rational(TAG_GPS_LONGITUDE, self.longitude.rationals().to_vec()),
            Entry::rational(
                TAG_GPS_TIME_STAMP,
                vec![
                    Rational::whole(at.hour()),
                    Rational::whole(at.minute()),
                    Rational::whole(at.second()),
                ],
            ),
            Entry::ascii(TAG_GPS_DATE_STAMP, &at.format("%Y:%m:%d").to_string()),
        ];

        let exif_offset = TIFF_HEADER_SIZE + ifd_len(&ifd0);
        let gps_offset = exif_offset + ifd_len(&exif);
        for entry in ifd0.iter_mut() {
            match entry.tag {
                TAG_EXIF_IFD => entry.value = Value::Long(exif_offset),
                TAG_GPS_IFD => entry.value = Value::Long(gps_offset),
                _ => {}
            }
        }

        let mut out = Vec::with_capacity((gps_offset + ifd_len(&gps)) as usize);
        // "II", magic 42, offset of IFD0
        out.extend_from_slice(b"II");
        out.extend_from_slice(&42u16.to_le_bytes());
        out.extend_from_slice(&TIFF_HEADER_SIZE.to_le_bytes());

        write_ifd(&mut out, ifd0, TIFF_HEADER_SIZE);
        write_ifd(&mut out, exif, exif_offset);
        write_ifd(&mut out, gps, gps_offset);
        out
    }
}

#[derive(Clone, Debug)]
enum Value {
    Byte(Vec<u8>),
    Ascii(Vec<u8>),
    Long(u32),
    Rational(Vec<Rational>),
}

#[derive(Clone, Debug)]
struct Entry {
    tag: u16,
    value: Value,
}

impl Entry {
    fn ascii(tag: u16, text: &str) -> Self {
        let mut bytes: Vec<u8> = text.bytes().filter(|&b| b != 0).collect();
        bytes.push(0);
        Self {
            tag,
            value: Value::Ascii(bytes),
        }
    }

    fn bytes(tag: u16, bytes: Vec<u8>) -> Self {
        Self {
            tag,
            value: Value::Byte(bytes),
        }
    }

    fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            value: Value::Long(value),
        }
    }

    fn rational(tag: u16, values: Vec<Rational>) -> Self {
        Self {
            tag,
            value: Value::Rational(values),
        }
    }

    fn field_type(&self) -> u16 {
        match self.value {
            Value::Byte(_) => TYPE_BYTE,
            Value::Ascii(_) => TYPE_ASCII,
            Value::Long(_) => TYPE_LONG,
            Value::Rational(_) => TYPE_RATIONAL,
        }
    }

    fn count(&self) -> u32 {
        match &self.value {
            Value::Byte(b) | Value::Ascii(b) => b.len() as u32,
            Value::Long(_) => 1,
            Value::Rational(r) => r.len() as u32,
        }
    }

    fn payload(&self) -> Vec<u8> {
        match &self.value {
            Value::Byte(b) | Value::Ascii(b) => b.clone(),
            Value::Long(v) => v.to_le_bytes().to_vec(),
            Value::Rational(values) => {
                let mut buf = Vec::with_capacity(values.len() * 8);
                for r in values {
                    buf.extend_from_slice(&r.numerator.to_le_bytes());
                    buf.extend_from_slice(&r.denominator.to_le_bytes());
                }
                buf
            }
        }
    }

    /// Bytes stored after the IFD when the value does not fit the 4-byte slot.
    fn external_len(&self) -> u32 {
        let len = self.payload().len() as u32;
        if len <= 4 {
            0
        } else {
            len + (len & 1)
        }
    }
}

/// Total size of an IFD: count, entries, next-IFD offset, external values.
fn ifd_len(entries: &[Entry]) -> u32 {
    let fixed = 2 + 12 * entries.len() as u32 + 4;
    fixed + entries.iter().map(Entry::external_len).sum::<u32>()
}

fn write_ifd(out: &mut Vec<u8>, mut entries: Vec<Entry>, offset: u32) {
    entries.sort_by_key(|e| e.tag);

    let mut data_offset = offset + 2 + 12 * entries.len() as u32 + 4;
    let mut data = Vec::new();

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in &entries {
        let payload = entry.payload();
        out.extend_from_slice(&entry.tag.to_le_bytes());
        out.extend_from_slice(&entry.field_type().to_le_bytes());
        out.extend_from_slice(&entry.count().to_le_bytes());

        if payload.len() <= 4 {
            let mut slot = [0u8; 4];
            slot[..payload.len()].copy_from_slice(&payload);
            out.extend_from_slice(&slot);
        } else {
            out.extend_from_slice(&data_offset.to_le_bytes());
            data.extend_from_slice(&payload);
            if payload.len() % 2 == 1 {
                data.push(0);
            }
            data_offset += entry.external_len();
        }
    }
    // No further IFD in this chain.
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&data);
}
