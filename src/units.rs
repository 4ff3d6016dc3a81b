//! Decimal amounts and base-unit conversion
//!
//! Human-readable amounts are kept as an exact `mantissa * 10^exponent` pair
//! so that scaling into base units is a single integer division with one
//! truncation at the end.

use crate::{Error, Result};
use alloy::primitives::{ruint::Uint, U256};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

/// Intermediate width for products of two amounts
type U512 = Uint<512, 8>;

/// Significant digits kept from the input; any 77-digit integer fits in 256 bits
const MAX_DIGITS: usize = 77;

/// Inputs of `10^309` and above are not finite
const MAX_MAGNITUDE: i64 = 309;

/// Inputs below `10^-400` are zero
const MIN_MAGNITUDE: i64 = -400;

/// Exact non-negative decimal number, `mantissa * 10^exponent`
///
/// The mantissa carries no trailing zeros, so equal values compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    mantissa: U256,
    exponent: i64,
}

impl Decimal {
    pub fn zero() -> Self {
        Self {
            mantissa: U256::ZERO,
            exponent: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// `floor(self * 10^decimals)`
    pub fn to_base_units(&self, decimals: u8) -> Result<U256> {
        scaled_ratio(&[self], &[], decimals)
    }

    /// `floor(self * factor * 10^decimals)`
    pub fn mul_to_base_units(&self, factor: &Decimal, decimals: u8) -> Result<U256> {
        scaled_ratio(&[self, factor], &[], decimals)
    }

    /// `floor(self / divisor * 10^decimals)`
    pub fn div_to_base_units(&self, divisor: &Decimal, decimals: u8) -> Result<U256> {
        if divisor.is_zero() {
            return Err(Error::InvalidInput("Division by zero price".to_string()));
        }
        scaled_ratio(&[self], &[divisor], decimals)
    }
}

/// `floor(prod(numerators) * 10^decimals / prod(denominators))`, computed
/// with a single truncating division.
fn scaled_ratio(numerators: &[&Decimal], denominators: &[&Decimal], decimals: u8) -> Result<U256> {
    // Powers of ten collect into one net exponent applied to whichever side
    // it belongs to.
    let mut net = decimals as i64;
    let mut num = U512::from(1u8);
    let mut den = U512::from(1u8);

    for d in numerators {
        num = num.checked_mul(widen(d.mantissa)).ok_or_else(overflow)?;
        net += d.exponent;
    }
    for d in denominators {
        den = den.checked_mul(widen(d.mantissa)).ok_or_else(overflow)?;
        net -= d.exponent;
    }

    if den.is_zero() {
        return Err(Error::InvalidInput("Division by zero".to_string()));
    }

    if net >= 0 {
        num = pow10(net)
            .and_then(|p| num.checked_mul(p))
            .ok_or_else(overflow)?;
    } else {
        // A denominator past 512 bits exceeds any numerator: the ratio is zero
        match pow10(-net).and_then(|p| den.checked_mul(p)) {
            Some(scaled) => den = scaled,
            None => return Ok(U256::ZERO),
        }
    }

    narrow(num / den)
}

fn pow10(exp: i64) -> Option<U512> {
    // 10^155 does not fit in 512 bits
    if !(0..=154).contains(&exp) {
        return None;
    }
    U512::from(10u8).checked_pow(U512::from(exp as u64))
}

fn widen(value: U256) -> U512 {
    let [a, b, c, d] = *value.as_limbs();
    U512::from_limbs([a, b, c, d, 0, 0, 0, 0])
}

fn narrow(value: U512) -> Result<U256> {
    let [a, b, c, d, rest @ ..] = *value.as_limbs();
    if rest.iter().any(|limb| *limb != 0) {
        return Err(overflow());
    }
    Ok(U256::from_limbs([a, b, c, d]))
}

fn overflow() -> Error {
    Error::InvalidInput("Amount exceeds 256-bit precision".to_string())
}

/// Parse a scientific-notation exponent, saturating on overflow
fn parse_exponent(s: &str) -> Option<i64> {
    match s.parse::<i64>() {
        Ok(exp) => Some(exp),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

impl FromStr for Decimal {
    type Err = Error;

    /// Accepts `123`, `1.5`, `.5`, `5.`, `+2` and scientific notation such
    /// as `1e-3`. Negative, empty and non-finite inputs are rejected.
    /// Digits past the 77th significant one are truncated.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput(format!("'{}' is not a valid decimal amount", s));

        let trimmed = s.trim();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if unsigned.starts_with('-') {
            return Err(Error::InvalidInput(format!(
                "'{}' is negative; amounts must be non-negative",
                s
            )));
        }

        let (number, exponent) = match unsigned.find(['e', 'E']) {
            Some(pos) => (
                &unsigned[..pos],
                parse_exponent(&unsigned[pos + 1..]).ok_or_else(invalid)?,
            ),
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = match number.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (number, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() && frac_part.is_empty()
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(invalid());
        }

        // value = digits * 10^(exponent - frac_part.len())
        let digits = format!("{}{}", int_part, frac_part);
        let significant = digits.trim_start_matches('0');
        let precise = &significant[..significant.len().min(MAX_DIGITS)];
        let kept = precise.trim_end_matches('0');
        if kept.is_empty() {
            return Ok(Self::zero());
        }

        let exponent = exponent
            .saturating_sub(frac_part.len() as i64)
            .saturating_add((significant.len() - kept.len()) as i64);

        let magnitude = exponent.saturating_add(kept.len() as i64);
        if magnitude > MAX_MAGNITUDE {
            return Err(invalid());
        }
        if magnitude < MIN_MAGNITUDE {
            return Ok(Self::zero());
        }

        let mantissa = U256::from_str_radix(kept, 10).map_err(|_| invalid())?;
        Ok(Self { mantissa, exponent })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent >= 0 {
            write!(f, "{}{}", self.mantissa, "0".repeat(self.exponent as usize))
        } else {
            let scale = self.exponent.unsigned_abs() as usize;
            f.write_str(&format_scaled(self.mantissa.to_string(), scale))
        }
    }
}

/// Format a base-unit value with `decimals` fractional digits, trimming
/// trailing zeros
pub fn format_units(value: U256, decimals: u8) -> String {
    format_scaled(value.to_string(), decimals as usize)
}

fn format_scaled(digits: String, scale: usize) -> String {
    if scale == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (whole, frac) = padded.split_at(padded.len() - scale);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(dec("100").to_base_units(0).unwrap(), U256::from(100u64));
        assert_eq!(dec("1.5").to_base_units(1).unwrap(), U256::from(15u64));
        assert_eq!(dec(".5").to_base_units(1).unwrap(), U256::from(5u64));
        assert_eq!(dec("5.").to_base_units(0).unwrap(), U256::from(5u64));
        assert_eq!(dec(" +2 ").to_base_units(0).unwrap(), U256::from(2u64));
        assert_eq!(dec("1e3").to_base_units(0).unwrap(), U256::from(1000u64));
        assert_eq!(dec("25E-1").to_base_units(1).unwrap(), U256::from(25u64));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "  ", ".", "abc", "1.2.3", "-1", "1e", "NaN", "Infinity", "1e999", "0x10"] {
            assert!(bad.parse::<Decimal>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_truncates_once() {
        // 1/3 SOL in lamports
        let amount = dec("1").div_to_base_units(&dec("3"), 9).unwrap();
        assert_eq!(amount, U256::from(333_333_333u64));

        // Excess precision is truncated, not rounded
        let amount = dec("1.2345678919").to_base_units(9).unwrap();
        assert_eq!(amount, U256::from(1_234_567_891u64));

        let amount = dec("0.1").mul_to_base_units(&dec("0.2"), 6).unwrap();
        assert_eq!(amount, U256::from(20_000u64));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(dec("1").div_to_base_units(&dec("0"), 6).is_err());
        assert!(dec("1").div_to_base_units(&dec("0.000"), 6).is_err());
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let huge = dec("1e64");
        let err = huge.mul_to_base_units(&huge, 18).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_trailing_zeros_do_not_limit_precision() {
        let one = dec(&format!("1.{}", "0".repeat(80)));
        assert_eq!(one, dec("1"));
        assert_eq!(one.to_base_units(9).unwrap(), U256::from(1_000_000_000u64));

        let hundred = dec(&format!("1{}e-78", "0".repeat(80)));
        assert_eq!(hundred.to_base_units(0).unwrap(), U256::from(100u64));
    }

    #[test]
    fn test_tiny_values_floor_to_zero() {
        assert_eq!(dec("1e-65").to_base_units(9).unwrap(), U256::ZERO);
        assert_eq!(dec("1e-65").to_base_units(70).unwrap(), U256::from(100_000u64));
        assert!(dec("1e-999").is_zero());
        assert!(dec("1e-99999999999999999999").is_zero());
        assert!(dec("0e999").is_zero());
        assert!("1e99999999999999999999".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_extreme_exponents_cancel() {
        let amount = dec("1e-300").div_to_base_units(&dec("1e-310"), 0).unwrap();
        assert_eq!(amount, U256::from(10_000_000_000u64));

        let amount = dec("1e70").div_to_base_units(&dec("1e70"), 18).unwrap();
        assert_eq!(amount, U256::from(1_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_long_fraction_is_truncated() {
        let third = dec(&format!("0.{}", "3".repeat(100)));
        assert_eq!(
            third.to_base_units(18).unwrap(),
            U256::from(333_333_333_333_333_333u64)
        );
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(1_000_000_000u64), 9), "1");
        assert_eq!(format_units(U256::from(1_500_000_000u64), 9), "1.5");
        assert_eq!(format_units(U256::from(4_094u64), 9), "0.000004094");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
        assert_eq!(format_units(U256::ZERO, 6), "0");
    }

    #[test]
    fn test_format_units_beyond_u256_scale() {
        let expected = format!("0.{}1", "0".repeat(79));
        assert_eq!(format_units(U256::from(1u8), 80), expected);
        assert_eq!(format_units(U256::from(25u8), 255).len(), 2 + 255);
    }

    #[test]
    fn test_display_round_trips_value() {
        assert_eq!(dec("20.274523").to_string(), "20.274523");
        assert_eq!(dec("2.50").to_string(), "2.5");
        assert_eq!(dec("7").to_string(), "7");
        assert_eq!(dec("1.5e3").to_string(), "1500");
        assert_eq!(dec("1e-5").to_string(), "0.00001");
    }
}
