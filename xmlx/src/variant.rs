//! Dynamically typed scalar values and their coercions.
//!
//! A [`Variant`] is what an engine hands back for an attribute or a text
//! node. Conversions into concrete types go through [`FromVariant`], which
//! never mutates the source value and reports failure as
//! [`Error::Coercion`] instead of producing a zero value.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, Result};

/// A dynamically typed scalar stored in an attribute or text node.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    /// Character data. Everything read by the parser has this form.
    String(String),
    /// 32-bit float.
    Float(f32),
    /// 32-bit signed integer.
    Int(i32),
    /// 32-bit unsigned integer.
    UInt(u32),
    /// Boolean.
    Bool(bool),
}

impl Variant {
    /// Returns the textual form of the value, borrowing when it already is text.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Variant::String(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Converts the value to `T`.
    ///
    /// # Errors
    /// Returns [`Error::Coercion`] if the value has no faithful `T` form.
    pub fn coerce<T: FromVariant>(&self) -> Result<T> {
        T::from_variant(self)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::String(s) => f.write_str(s),
            Variant::Float(v) => write!(f, "{}", v),
            Variant::Int(v) => write!(f, "{}", v),
            Variant::UInt(v) => write!(f, "{}", v),
            Variant::Bool(true) => f.write_str("true"),
            Variant::Bool(false) => f.write_str("false"),
        }
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

impl From<f32> for Variant {
    fn from(value: f32) -> Self {
        Variant::Float(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::Int(value)
    }
}

impl From<u32> for Variant {
    fn from(value: u32) -> Self {
        Variant::UInt(value)
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<Hex> for Variant {
    fn from(value: Hex) -> Self {
        Variant::String(value.to_string())
    }
}

/// Types that can be produced from a [`Variant`].
pub trait FromVariant: Sized {
    /// Name used in coercion errors and logs.
    const TYPE_NAME: &'static str;

    /// Converts `value` into `Self`.
    ///
    /// # Errors
    /// Returns [`Error::Coercion`] if the conversion is not value-preserving.
    fn from_variant(value: &Variant) -> Result<Self>;
}

fn coercion_error<T: FromVariant>(value: &Variant) -> Error {
    Error::Coercion {
        value: value.to_string(),
        target: T::TYPE_NAME,
    }
}

/// Parses trimmed text as a finite number.
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounds half to even, the way variant conversions round fractional values.
fn integral(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    Some(value.round_ties_even() as i64)
}

fn parse_integral(text: &str) -> Option<i64> {
    let text = text.trim();
    match text.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => parse_number(text).and_then(integral),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        parse_number(text).map(|n| n != 0.0)
    }
}

fn parse_hex(text: &str) -> Option<u32> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

impl FromVariant for String {
    const TYPE_NAME: &'static str = "string";

    fn from_variant(value: &Variant) -> Result<Self> {
        Ok(value.as_text().into_owned())
    }
}

impl FromVariant for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn from_variant(value: &Variant) -> Result<Self> {
        match value {
            Variant::Float(v) => Ok(*v),
            Variant::Int(v) => Ok(*v as f32),
            Variant::UInt(v) => Ok(*v as f32),
            Variant::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Variant::String(s) => s
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| coercion_error::<Self>(value)),
        }
    }
}

impl FromVariant for i32 {
    const TYPE_NAME: &'static str = "i32";

    fn from_variant(value: &Variant) -> Result<Self> {
        let wide = match value {
            Variant::Int(v) => return Ok(*v),
            Variant::UInt(v) => Some(i64::from(*v)),
            Variant::Float(v) => integral(f64::from(*v)),
            Variant::Bool(b) => Some(i64::from(*b)),
            Variant::String(s) => parse_integral(s),
        };
        wide.and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| coercion_error::<Self>(value))
    }
}

impl FromVariant for u32 {
    const TYPE_NAME: &'static str = "u32";

    fn from_variant(value: &Variant) -> Result<Self> {
        let wide = match value {
            Variant::UInt(v) => return Ok(*v),
            Variant::Int(v) => Some(i64::from(*v)),
            Variant::Float(v) => integral(f64::from(*v)),
            Variant::Bool(b) => Some(i64::from(*b)),
            Variant::String(s) => parse_integral(s),
        };
        wide.and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| coercion_error::<Self>(value))
    }
}

impl FromVariant for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_variant(value: &Variant) -> Result<Self> {
        match value {
            Variant::Bool(b) => Ok(*b),
            Variant::Int(v) => Ok(*v != 0),
            Variant::UInt(v) => Ok(*v != 0),
            Variant::Float(v) if !v.is_nan() => Ok(*v != 0.0),
            Variant::Float(_) => Err(coercion_error::<Self>(value)),
            Variant::String(s) => parse_bool(s).ok_or_else(|| coercion_error::<Self>(value)),
        }
    }
}

/// A `u32` read from base-16 text.
///
/// Unlike the `u32` conversion, the value is always rendered as text first
/// and then parsed as hexadecimal, so `Variant::UInt(26)` reads as `0x26`.
/// An optional `0x`/`0X` prefix is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hex(pub u32);

impl FromVariant for Hex {
    const TYPE_NAME: &'static str = "hexadecimal u32";

    fn from_variant(value: &Variant) -> Result<Self> {
        parse_hex(&value.as_text())
            .map(Hex)
            .ok_or_else(|| coercion_error::<Self>(value))
    }
}

impl From<Hex> for u32 {
    fn from(value: Hex) -> Self {
        value.0
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Variant {
        Variant::from(s)
    }

    #[test]
    fn test_string_pass_through() {
        assert_eq!(text(" padded ").coerce::<String>().unwrap(), " padded ");
        assert_eq!(Variant::Int(-4).coerce::<String>().unwrap(), "-4");
        assert_eq!(Variant::Float(1.5).coerce::<String>().unwrap(), "1.5");
        assert_eq!(Variant::Bool(true).coerce::<String>().unwrap(), "true");
    }

    #[test]
    fn test_native_values_unchanged() {
        assert_eq!(Variant::Float(0.1).coerce::<f32>().unwrap(), 0.1);
        assert_eq!(Variant::Int(i32::MIN).coerce::<i32>().unwrap(), i32::MIN);
        assert_eq!(Variant::UInt(u32::MAX).coerce::<u32>().unwrap(), u32::MAX);
        assert!(!Variant::Bool(false).coerce::<bool>().unwrap());
    }

    #[test]
    fn test_numeric_text() {
        assert_eq!(text("42").coerce::<i32>().unwrap(), 42);
        assert_eq!(text(" -7 ").coerce::<i32>().unwrap(), -7);
        assert_eq!(text("2.5").coerce::<i32>().unwrap(), 2);
        assert_eq!(text("3.5").coerce::<i32>().unwrap(), 4);
        assert_eq!(text("1e3").coerce::<u32>().unwrap(), 1000);
        assert_eq!(text("0.25").coerce::<f32>().unwrap(), 0.25);
    }

    #[test]
    fn test_numeric_failures() {
        assert!(text("abc").coerce::<i32>().is_err());
        assert!(text("").coerce::<f32>().is_err());
        assert!(text("inf").coerce::<f32>().is_err());
        assert!(text("-1").coerce::<u32>().is_err());
        assert!(text("4294967296").coerce::<u32>().is_err());
        assert!(Variant::UInt(u32::MAX).coerce::<i32>().is_err());
        assert!(Variant::Int(-1).coerce::<u32>().is_err());
    }

    #[test]
    fn test_bool_forms() {
        assert!(text("true").coerce::<bool>().unwrap());
        assert!(text("TRUE").coerce::<bool>().unwrap());
        assert!(!text("False").coerce::<bool>().unwrap());
        assert!(text("1").coerce::<bool>().unwrap());
        assert!(!text("0").coerce::<bool>().unwrap());
        assert!(Variant::Int(-1).coerce::<bool>().unwrap());
        assert!(text("yes").coerce::<bool>().is_err());
    }

    #[test]
    fn test_hex() {
        assert_eq!(text("1A").coerce::<Hex>().unwrap(), Hex(26));
        assert_eq!(text("0").coerce::<Hex>().unwrap(), Hex(0));
        assert_eq!(text("0xff").coerce::<Hex>().unwrap(), Hex(255));
        assert_eq!(text("FFFFFFFF").coerce::<Hex>().unwrap(), Hex(u32::MAX));
        assert!(text("100000000").coerce::<Hex>().is_err());
        assert!(text("0x").coerce::<Hex>().is_err());
        assert!(text("G1").coerce::<Hex>().is_err());
    }

    #[test]
    fn test_hex_reads_text_not_number() {
        assert_eq!(Variant::UInt(26).coerce::<Hex>().unwrap(), Hex(0x26));
        assert_eq!(Variant::UInt(26).coerce::<u32>().unwrap(), 26);
    }

    #[test]
    fn test_coercion_error_names_target() {
        match text("x").coerce::<i32>() {
            Err(Error::Coercion { value, target }) => {
                assert_eq!(value, "x");
                assert_eq!(target, "i32");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_hex_into_variant() {
        assert_eq!(Variant::from(Hex(0xBEEF)), text("BEEF"));
    }
}
