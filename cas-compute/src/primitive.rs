//! Functions to construct [`Integer`]s and [`Rational`]s from various types.

use rug::{Integer, Rational};

/// The largest decimal exponent accepted in scientific notation, such as `1e1000`.
pub const MAX_DECIMAL_EXPONENT: u32 = 1000;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a string slice of decimal digits.
///
/// Returns [`None`] if the string is not a valid integer.
pub fn int_from_str(s: &str) -> Option<Integer> {
    Integer::from_str_radix(s, 10).ok()
}

/// Creates a [`Rational`] with the given value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Parses a decimal literal, like `2.5`, `.5`, `3.`, or `1.2e-3`, into the exact [`Rational`] its
/// digits denote.
///
/// Returns [`None`] if the literal is malformed, or if its exponent is outside
/// [`MAX_DECIMAL_EXPONENT`].
pub fn rational_from_decimal(s: &str) -> Option<Rational> {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(idx) => (&s[..idx], s[idx + 1..].parse::<i64>().ok()?),
        None => (s, 0),
    };

    let (whole, frac) = match mantissa.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (mantissa, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = int_from_str(&format!("{}{}", whole, frac)).unwrap_or_default();
    let scale = exponent.checked_sub(i64::try_from(frac.len()).ok()?)?;
    if exponent.unsigned_abs() > u64::from(MAX_DECIMAL_EXPONENT) {
        return None;
    }

    let power = Integer::from(Integer::u_pow_u(10, u32::try_from(scale.unsigned_abs()).ok()?));
    if scale >= 0 {
        Some(Rational::from(digits * power))
    } else {
        Some(Rational::from((digits, power)))
    }
}
