//! Decimal degrees to EXIF GPS coordinates.
//!
//! Seconds are computed but always recorded as zero in the GPS block; the
//! written position is truncated to whole arc minutes.

use super::rational::Rational;

/// Sexagesimal form of a decimal angle. `degrees` carries the sign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dms {
    pub degrees: i32,
    pub minutes: u32,
    pub seconds: f64,
}

/// Split decimal degrees into degrees, minutes and seconds.
pub fn decdeg_to_dms(decimal: f64) -> Dms {
    let negative = decimal < 0.0;
    let total_seconds = decimal.abs() * 3600.0;
    let total_minutes = (total_seconds / 60.0).floor();
    let seconds = total_seconds - total_minutes * 60.0;
    let degrees = (total_minutes / 60.0).floor();
    let minutes = total_minutes - degrees * 60.0;

    let degrees = degrees as i32;
    Dms {
        degrees: if negative { -degrees } else { degrees },
        minutes: minutes as u32,
        seconds,
    }
}

/// One GPS axis ready for the EXIF GPS IFD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpsCoordinate {
    /// `N`/`S` for latitude, `E`/`W` for longitude.
    pub reference: char,
    pub degrees: u32,
    pub minutes: u32,
}

impl GpsCoordinate {
    pub fn latitude(decimal: f64) -> Self {
        Self::from_decimal(decimal, 'N', 'S')
    }

    pub fn longitude(decimal: f64) -> Self {
        Self::from_decimal(decimal, 'E', 'W')
    }

    fn from_decimal(decimal: f64, positive: char, negative: char) -> Self {
        let dms = decdeg_to_dms(decimal);
        Self {
            reference: if decimal < 0.0 { negative } else { positive },
            degrees: dms.degrees.unsigned_abs(),
            minutes: dms.minutes,
        }
    }

    /// (degrees, minutes, seconds) rationals with seconds fixed at zero.
    pub fn rationals(&self) -> [Rational; 3] {
        [
            Rational::whole(self.degrees),
            Rational::whole(self.minutes),
            Rational::whole(0),
        ]
    }
}
