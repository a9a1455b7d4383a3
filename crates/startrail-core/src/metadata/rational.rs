/// Unsigned rational as stored in EXIF RATIONAL fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn whole(value: u32) -> Self {
        Self::new(value, 1)
    }

    /// Closest fraction to `value` with a denominator no larger than
    /// `max_denominator`, in lowest terms. Negative and non-finite values
    /// become `0/1`.
    pub fn approximate(value: f64, max_denominator: u64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self::whole(0);
        }
        let max_den = max_denominator.max(1);

        // Continued fraction convergents p/q.
        let (mut p0, mut q0, mut p1, mut q1) = (0u64, 1u64, 1u64, 0u64);
        let mut x = value;
        loop {
            let a = x.floor();
            let term = a as u64;
            let q2 = q0 + term * q1;
            if q2 > max_den {
                break;
            }
            (p0, q0, p1, q1) = (p1, q1, p0 + term * p1, q2);

            let frac = x - a;
            if frac < 1e-9 || x > u32::MAX as f64 {
                return Self::clamped(p1, q1);
            }
            x = 1.0 / frac;
        }

        // Best semiconvergent between the last two convergents.
        let k = (max_den - q0) / q1;
        let (bp, bq) = (p0 + k * p1, q0 + k * q1);
        let err_bound = (bp as f64 / bq as f64 - value).abs();
        let err_conv = (p1 as f64 / q1 as f64 - value).abs();
        if err_conv <= err_bound {
            Self::clamped(p1, q1)
        } else {
            Self::clamped(bp, bq)
        }
    }

    fn clamped(numerator: u64, denominator: u64) -> Self {
        Self::new(
            numerator.min(u32::MAX as u64) as u32,
            denominator.clamp(1, u32::MAX as u64) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_focal_ratio() {
        assert_eq!(Rational::approximate(2.8, 1_000_000), Rational::new(14, 5));
    }

    #[test]
    fn integer_value() {
        assert_eq!(Rational::approximate(4.0, 1_000_000), Rational::new(4, 1));
    }

    #[test]
    fn half_value() {
        assert_eq!(Rational::approximate(12.5, 1_000_000), Rational::new(25, 2));
    }

    #[test]
    fn denominator_limit_is_respected() {
        let r = Rational::approximate(std::f64::consts::PI, 100);
        assert_eq!(r, Rational::new(311, 99));
    }

    #[test]
    fn non_positive_is_zero() {
        assert_eq!(Rational::approximate(-1.0, 10), Rational::whole(0));
        assert_eq!(Rational::approximate(f64::NAN, 10), Rational::whole(0));
    }
}
