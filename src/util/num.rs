/// A numeric literal after conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Fits in a signed 64-bit integer.
    Integer(i64),
    /// A float literal, or a decimal integer literal too large for `i64`.
    Float(f64),
}

/// Converts the text of an integer literal.
///
/// Accepts decimal, `0x` hexadecimal and `0b` binary digits, with `_`
/// separators anywhere after the first digit. Decimal literals that do not fit
/// in an `i64` become floats.
///
/// ## Returns
/// `None` if the literal has no digits or does not fit (hex and binary).
///
/// ## Example
/// ```
/// use grol::util::num::{Number, parse_integer};
///
/// assert_eq!(parse_integer("1_000"), Some(Number::Integer(1000)));
/// assert_eq!(parse_integer("0x1F"), Some(Number::Integer(31)));
/// assert_eq!(parse_integer("0b101"), Some(Number::Integer(5)));
/// assert_eq!(parse_integer("0x_"), None);
/// assert_eq!(parse_integer("100000000000000000000"), Some(Number::Float(1e20)));
/// ```
#[must_use]
pub fn parse_integer(literal: &str) -> Option<Number> {
    let (digits, radix) = match literal.get(..2) {
        Some("0x" | "0X") => (&literal[2..], 16),
        Some("0b" | "0B") => (&literal[2..], 2),
        _ => (literal, 10),
    };
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() {
        return None;
    }
    match i64::from_str_radix(&digits, radix) {
        Ok(value) => Some(Number::Integer(value)),
        Err(_) if radix == 10 => digits.parse().ok().map(Number::Float),
        Err(_) => None,
    }
}

/// Converts the text of a float literal, ignoring `_` separators.
///
/// ## Example
/// ```
/// use grol::util::num::parse_float;
///
/// assert_eq!(parse_float("1_000.5"), Some(1000.5));
/// assert_eq!(parse_float(".5"), Some(0.5));
/// assert_eq!(parse_float("2e3"), Some(2000.0));
/// ```
#[must_use]
pub fn parse_float(literal: &str) -> Option<f64> {
    let digits: String = literal.chars().filter(|&c| c != '_').collect();
    digits.parse().ok()
}

/// Formats a float so that it reads back as the same float.
///
/// The shortest round-trip representation is used and a decimal point or an
/// exponent is always present, so `3.0` does not turn into the integer `3`.
/// Non-finite values use the names bound in the root environment.
///
/// ## Example
/// ```
/// use grol::util::num::format_float;
///
/// assert_eq!(format_float(3.0), "3.0");
/// assert_eq!(format_float(0.1), "0.1");
/// assert_eq!(format_float(3.0414093201713376e64), "3.0414093201713376e64");
/// assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    format!("{value:?}")
}

/// Widens an integer to a float.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn int_to_float(value: i64) -> f64 {
    value as f64
}

/// Converts a float to an integer if it is finite and integral.
///
/// ## Example
/// ```
/// use grol::util::num::float_to_int;
///
/// assert_eq!(float_to_int(4.0), Some(4));
/// assert_eq!(float_to_int(4.5), None);
/// assert_eq!(float_to_int(f64::NAN), None);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn float_to_int(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

/// Converts a length to an integer value.
#[must_use]
pub fn len_to_int(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
