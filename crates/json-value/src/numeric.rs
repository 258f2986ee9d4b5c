//! Numeric adapter: converts a `serde_json::Number` into the concrete Rust
//! representation a JTD `type` keyword calls for, without losing precision
//! any earlier than the caller asked for it.

use rust_decimal::Decimal;
use serde_json::Number;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumericConversionError {
    #[error("value has a fractional part, integer type requires a whole number")]
    NotAnInteger,
    #[error("value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        value: String,
        min: i128,
        max: i128,
    },
    #[error("could not parse numeric lexical form: {0}")]
    Unparsable(String),
}

/// Parse the number's exact lexical form into an arbitrary-precision decimal.
///
/// With `arbitrary_precision` enabled, `serde_json::Number`'s `Display`
/// impl prints back the original source text, so this never rounds through
/// `f64` the way `Number::as_f64` would.
pub fn to_big_decimal(n: &Number) -> Result<Decimal, NumericConversionError> {
    let text = n.to_string();
    Decimal::from_str(&text).map_err(|_| NumericConversionError::Unparsable(text))
}

/// Convert a JSON number to an integer, verifying it both has no fractional
/// part and fits within `[min, max]` (the bounds of a JTD integer type such
/// as `uint8` or `int32`).
pub fn to_integer_in_range(
    n: &Number,
    min: i128,
    max: i128,
) -> Result<i128, NumericConversionError> {
    let decimal = to_big_decimal(n)?;
    if decimal.fract() != Decimal::ZERO {
        return Err(NumericConversionError::NotAnInteger);
    }
    let value: i128 = decimal
        .trunc()
        .to_string()
        .parse()
        .map_err(|_| NumericConversionError::Unparsable(decimal.to_string()))?;
    if value < min || value > max {
        return Err(NumericConversionError::OutOfRange { value: value.to_string(), min, max });
    }
    Ok(value)
}

/// Convert a JSON number to its nearest IEEE-754 double (`float32`/`float64`).
pub fn to_ieee754(n: &Number) -> Result<f64, NumericConversionError> {
    n.as_f64()
        .ok_or_else(|| NumericConversionError::Unparsable(n.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(v: serde_json::Value) -> Number {
        match v {
            serde_json::Value::Number(n) => n,
            _ => panic!("not a number"),
        }
    }

    #[test]
    fn big_decimal_preserves_lexical_form() {
        let n = number(json!(1.10));
        let d = to_big_decimal(&n).unwrap();
        assert_eq!(d.to_string(), "1.1");
    }

    #[test]
    fn integer_in_range_accepts_uint8() {
        let n = number(json!(255));
        assert_eq!(to_integer_in_range(&n, 0, 255).unwrap(), 255);
    }

    #[test]
    fn integer_in_range_rejects_out_of_range() {
        let n = number(json!(256));
        assert!(matches!(
            to_integer_in_range(&n, 0, 255),
            Err(NumericConversionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn integer_in_range_rejects_fractional() {
        let n = number(json!(1.5));
        assert!(matches!(
            to_integer_in_range(&n, 0, 255),
            Err(NumericConversionError::NotAnInteger)
        ));
    }

    #[test]
    fn ieee754_roundtrips_float() {
        let n = number(json!(3.25));
        assert_eq!(to_ieee754(&n).unwrap(), 3.25);
    }
}
