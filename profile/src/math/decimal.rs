//! Half-up decimal rounding of floats.
//!
//! Rounding works on the shortest decimal representation that
//! round-trips to the float (what `Display` prints), not on the binary
//! value. `2.25` rounds to `2.3` even though the nearest `f64` is a
//! hair below it.

use crate::{ProfileError, C};

/// Returns `value * 10^decimals` rounded half away from zero.
pub fn quantize(value: C, decimals: u32) -> i64 {
    let repr = value.abs().to_string();
    let magnitude = if value.is_finite() {
        shift_digits(&repr, decimals)
    } else {
        None
    };
    #[allow(clippy::cast_possible_truncation)]
    let magnitude =
        magnitude.unwrap_or_else(|| (value.abs() * pow10(decimals)).round() as i64);
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Rounds `value` half away from zero to `decimals` fractional digits.
#[allow(clippy::cast_precision_loss)]
pub fn round(value: C, decimals: u32) -> C {
    quantize(value, decimals) as C / pow10(decimals)
}

/// Number of fractional digits in `quantum`, e.g. `2` for `0.01` and
/// `0` for `1` or `10`.
pub fn decimals_of(quantum: C) -> Result<u32, ProfileError> {
    if !quantum.is_finite() || quantum <= 0.0 {
        return Err(ProfileError::Round(quantum));
    }
    let repr = quantum.to_string();
    let digits = repr.split_once('.').map_or(0, |(_, frac)| frac.len());
    u32::try_from(digits).map_err(|_| ProfileError::Round(quantum))
}

/// Moves the decimal point of a non-negative decimal string
/// `decimals` places right, rounding half up on the first dropped
/// digit.
fn shift_digits(repr: &str, decimals: u32) -> Option<i64> {
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr, ""));
    let mut magnitude: i64 = int_part.parse().ok()?;
    let mut frac = frac_part.bytes().map(|d| i64::from(d - b'0'));
    for _ in 0..decimals {
        magnitude = magnitude
            .checked_mul(10)?
            .checked_add(frac.next().unwrap_or(0))?;
    }
    if frac.next().is_some_and(|d| d >= 5) {
        magnitude = magnitude.checked_add(1)?;
    }
    Some(magnitude)
}

fn pow10(decimals: u32) -> C {
    (0..decimals).fold(1.0, |acc, _| acc * 10.0)
}

#[cfg(test)]
mod tests {
    use super::{decimals_of, quantize, round, shift_digits};
    use crate::ProfileError;

    #[test]
    fn test_quantize_tenths() {
        assert_eq!(quantize(0.0, 1), 0);
        assert_eq!(quantize(10.0, 1), 100);
        assert_eq!(quantize(0.05, 1), 1);
        assert_eq!(quantize(0.049_999, 1), 0);
        assert_eq!(quantize(2.25, 1), 23);
        assert_eq!(quantize(2.35, 1), 24);
        assert_eq!(quantize(14.142_135_623_730_951, 1), 141);
        assert_eq!(quantize(-2.25, 1), -23);
    }

    #[test]
    fn test_quantize_other_precisions() {
        assert_eq!(quantize(1234.5, 0), 1235);
        assert_eq!(quantize(1234.49, 0), 1234);
        assert_eq!(quantize(0.125, 2), 13);
        assert_eq!(quantize(1e-7, 3), 0);
    }

    #[test]
    fn test_quantize_huge_values_fall_back() {
        assert_eq!(quantize(1e30, 1), i64::MAX);
        assert_eq!(quantize(f64::NAN, 1), 0);
    }

    #[test]
    fn test_round() {
        assert_eq!(round(2.25, 1), 2.3);
        assert_eq!(round(1903.4, 0), 1903.0);
        assert_eq!(round(0.125, 2), 0.13);
    }

    #[test]
    fn test_decimals_of() {
        assert_eq!(decimals_of(1.0).unwrap(), 0);
        assert_eq!(decimals_of(10.0).unwrap(), 0);
        assert_eq!(decimals_of(0.1).unwrap(), 1);
        assert_eq!(decimals_of(0.01).unwrap(), 2);
        assert!(matches!(decimals_of(0.0), Err(ProfileError::Round(_))));
        assert!(matches!(decimals_of(-1.0), Err(ProfileError::Round(_))));
        assert!(matches!(decimals_of(f64::INFINITY), Err(ProfileError::Round(_))));
    }

    #[test]
    fn test_shift_digits() {
        assert_eq!(shift_digits("12", 1), Some(120));
        assert_eq!(shift_digits("12.34", 1), Some(123));
        assert_eq!(shift_digits("12.35", 1), Some(124));
        assert_eq!(shift_digits("99999999999999999999", 1), None);
    }
}
