//! Built-in coercion from byte slices to typed values.
//!
//! Fixed-width columns are space padded, so numeric and boolean kinds trim
//! ASCII whitespace before parsing. Strings and bytes are taken verbatim
//! unless [`DecoderConfig::trim_strings`] is set.
//!
//! ## Optional fields
//!
//! An `Option<T>` field with a numeric or boolean `T` is absent over a blank
//! slice (empty or only whitespace). Otherwise the slice is coerced as `T`; if
//! that produces the zero value of `T` the [`ZeroPolicy`] decides between
//! absent and `Some(zero)`. Text kinds have no blank shortcut, so
//! `Option<String>` over `"    "` is `Some("    ")` unless strings are trimmed.

mod value;

use crate::decoder::{DecoderConfig, ZeroPolicy};
use crate::error::FieldError;
use std::borrow::Cow;

pub use value::{FieldKind, FieldType, FloatWidth, IntWidth, Value};

/// Tokens accepted as `true`
pub const TRUE_TOKENS: &[&str] = &["1", "t", "T", "TRUE", "true", "True"];

/// Tokens accepted as `false`
pub const FALSE_TOKENS: &[&str] = &["0", "f", "F", "FALSE", "false", "False"];

/// Coerce `raw` into a value of the given kind.
pub fn coerce(kind: &FieldKind, raw: &[u8], config: &DecoderConfig) -> Result<Value, FieldError> {
    match kind {
        FieldKind::Str => {
            let raw = if config.trim_strings { trim_blanks(raw) } else { raw };
            Ok(Value::Str(std::str::from_utf8(raw)?.to_owned()))
        }
        FieldKind::Bytes => Ok(Value::Bytes(raw.to_vec())),
        FieldKind::Int(width) => parse_signed(*width, &numeric_text(raw), kind.name()),
        FieldKind::UInt(width) => parse_unsigned(*width, &numeric_text(raw), kind.name()),
        FieldKind::Float(width) => parse_float(*width, &numeric_text(raw), kind.name()),
        FieldKind::Bool => parse_bool(trim_blanks(raw)),
        FieldKind::Optional(inner) => {
            let text = matches!(**inner, FieldKind::Str | FieldKind::Bytes);
            if !text && is_blank(raw) {
                return Ok(Value::Absent);
            }
            let value = coerce(inner, raw, config)?;
            if value.is_zero() && config.optional_zero == ZeroPolicy::Absent {
                Ok(Value::Absent)
            } else {
                Ok(value)
            }
        }
        FieldKind::Nested(_) | FieldKind::Custom(_) => Err(FieldError::unsupported(kind)),
    }
}

/// Returns true if the slice is empty or only ASCII whitespace
pub fn is_blank(raw: &[u8]) -> bool {
    raw.iter().all(u8::is_ascii_whitespace)
}

/// Strip leading and trailing ASCII whitespace
pub fn trim_blanks(raw: &[u8]) -> &[u8] {
    let start = raw
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &raw[start..end]
}

/// Trimmed text of a numeric column.
///
/// Non-UTF-8 bytes cannot be digits, so they are passed through lossily and
/// rejected by the number parser with the proper error kind.
fn numeric_text(raw: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(trim_blanks(raw))
}

fn parse_signed(width: IntWidth, text: &str, target: &'static str) -> Result<Value, FieldError> {
    let parsed = match width {
        IntWidth::W8 => text.parse::<i8>().map(i128::from),
        IntWidth::W16 => text.parse::<i16>().map(i128::from),
        IntWidth::W32 => text.parse::<i32>().map(i128::from),
        IntWidth::W64 => text.parse::<i64>().map(i128::from),
        IntWidth::W128 => text.parse::<i128>(),
        IntWidth::Size => text.parse::<isize>().map(|v| v as i128),
    };
    parsed
        .map(Value::Int)
        .map_err(|source| FieldError::InvalidInteger { target, source })
}

fn parse_unsigned(width: IntWidth, text: &str, target: &'static str) -> Result<Value, FieldError> {
    let parsed = match width {
        IntWidth::W8 => text.parse::<u8>().map(u128::from),
        IntWidth::W16 => text.parse::<u16>().map(u128::from),
        IntWidth::W32 => text.parse::<u32>().map(u128::from),
        IntWidth::W64 => text.parse::<u64>().map(u128::from),
        IntWidth::W128 => text.parse::<u128>(),
        IntWidth::Size => text.parse::<usize>().map(|v| v as u128),
    };
    parsed
        .map(Value::UInt)
        .map_err(|source| FieldError::InvalidInteger { target, source })
}

fn parse_float(width: FloatWidth, text: &str, target: &'static str) -> Result<Value, FieldError> {
    let parsed = match width {
        FloatWidth::F32 => text.parse::<f32>().map(f64::from),
        FloatWidth::F64 => text.parse::<f64>(),
    };
    parsed
        .map(Value::Float)
        .map_err(|source| FieldError::InvalidFloat { target, source })
}

fn parse_bool(raw: &[u8]) -> Result<Value, FieldError> {
    let text = String::from_utf8_lossy(raw);
    if TRUE_TOKENS.contains(&text.as_ref()) {
        Ok(Value::Bool(true))
    } else if FALSE_TOKENS.contains(&text.as_ref()) {
        Ok(Value::Bool(false))
    } else {
        Err(FieldError::InvalidBoolean {
            value: text.into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn coerce_default(kind: &FieldKind, raw: &[u8]) -> Result<Value, FieldError> {
        coerce(kind, raw, &DecoderConfig::default())
    }

    #[test]
    fn test_trim_blanks() {
        assert_eq!(trim_blanks(b"  42  "), b"42");
        assert_eq!(trim_blanks(b"\t7"), b"7");
        assert_eq!(trim_blanks(b"    "), b"");
        assert_eq!(trim_blanks(b""), b"");
    }

    #[test]
    fn test_string_is_verbatim() {
        let value = coerce_default(&FieldKind::Str, b"Olivia Parker       ").unwrap();
        assert_eq!(value, Value::Str("Olivia Parker       ".into()));
    }

    #[test]
    fn test_string_trimmed_by_config() {
        let config = DecoderConfig::new().trim_strings(true);
        let value = coerce(&FieldKind::Str, b"Olivia Parker       ", &config).unwrap();
        assert_eq!(value, Value::Str("Olivia Parker".into()));
    }

    #[test]
    fn test_string_rejects_bad_utf8() {
        let err = coerce_default(&FieldKind::Str, &[0x66, 0xFF]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStringValue);
    }

    #[test]
    fn test_bytes_are_verbatim() {
        let value = coerce_default(&FieldKind::Bytes, &[0x00, 0xFF, b' ']).unwrap();
        assert_eq!(value, Value::Bytes(vec![0x00, 0xFF, b' ']));
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            coerce_default(&FieldKind::Int(IntWidth::W32), b"  -42 ").unwrap(),
            Value::Int(-42)
        );
        assert_eq!(
            coerce_default(&FieldKind::UInt(IntWidth::W64), b"000123").unwrap(),
            Value::UInt(123)
        );
        assert_eq!(
            coerce_default(&FieldKind::Int(IntWidth::W8), b"+12").unwrap(),
            Value::Int(12)
        );
    }

    #[test]
    fn test_integer_failures() {
        let err = coerce_default(&FieldKind::Int(IntWidth::W32), b"ab12").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIntegerValue);
        assert!(err.to_string().contains("i32"));

        let err = coerce_default(&FieldKind::Int(IntWidth::W8), b"128").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIntegerValue);

        let err = coerce_default(&FieldKind::UInt(IntWidth::W16), b"-1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIntegerValue);

        let err = coerce_default(&FieldKind::UInt(IntWidth::W16), b"    ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIntegerValue);

        let err = coerce_default(&FieldKind::Int(IntWidth::W32), &[b'1', 0xFF]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIntegerValue);
    }

    #[test]
    fn test_floats() {
        assert_eq!(
            coerce_default(&FieldKind::Float(FloatWidth::F64), b"1550.85   ").unwrap(),
            Value::Float(1550.85)
        );
        assert_eq!(
            coerce_default(&FieldKind::Float(FloatWidth::F32), b"0.5").unwrap(),
            Value::Float(0.5)
        );
        let err = coerce_default(&FieldKind::Float(FloatWidth::F64), b"1,5").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFloatValue);
    }

    #[test]
    fn test_booleans() {
        for token in TRUE_TOKENS {
            assert_eq!(
                coerce_default(&FieldKind::Bool, token.as_bytes()).unwrap(),
                Value::Bool(true)
            );
        }
        for token in FALSE_TOKENS {
            assert_eq!(
                coerce_default(&FieldKind::Bool, token.as_bytes()).unwrap(),
                Value::Bool(false)
            );
        }
        assert_eq!(
            coerce_default(&FieldKind::Bool, b" T ").unwrap(),
            Value::Bool(true)
        );
        let err = coerce_default(&FieldKind::Bool, b"Y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBooleanValue);
        assert!(err.to_string().contains("\"Y\""));
    }

    #[test]
    fn test_optional_blank_is_absent() {
        let kind = <Option<i32>>::kind();
        assert_eq!(coerce_default(&kind, b"     ").unwrap(), Value::Absent);
        assert_eq!(coerce_default(&kind, b"").unwrap(), Value::Absent);

        let keep = DecoderConfig::new().optional_zero(ZeroPolicy::Keep);
        assert_eq!(coerce(&kind, b"   ", &keep).unwrap(), Value::Absent);
    }

    #[test]
    fn test_optional_string_over_blanks() {
        let kind = <Option<String>>::kind();
        let keep = DecoderConfig::new().optional_zero(ZeroPolicy::Keep);

        assert_eq!(
            coerce_default(&kind, b"    ").unwrap(),
            Value::Str("    ".into())
        );
        assert_eq!(coerce(&kind, b"    ", &keep).unwrap(), Value::Str("    ".into()));
        assert_eq!(coerce_default(&kind, b"").unwrap(), Value::Absent);
        assert_eq!(coerce(&kind, b"", &keep).unwrap(), Value::Str(String::new()));

        let trimmed = DecoderConfig::new().trim_strings(true);
        assert_eq!(coerce(&kind, b"    ", &trimmed).unwrap(), Value::Absent);

        let bytes = <Option<Vec<u8>>>::kind();
        assert_eq!(coerce_default(&bytes, b"  ").unwrap(), Value::Bytes(b"  ".to_vec()));
    }

    #[test]
    fn test_optional_zero_policy() {
        let kind = <Option<i32>>::kind();
        assert_eq!(coerce_default(&kind, b"00000").unwrap(), Value::Absent);

        let keep = DecoderConfig::new().optional_zero(ZeroPolicy::Keep);
        assert_eq!(coerce(&kind, b"00000", &keep).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_optional_value_and_error() {
        let kind = <Option<u8>>::kind();
        assert_eq!(coerce_default(&kind, b" 17").unwrap(), Value::UInt(17));
        let err = coerce_default(&kind, b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIntegerValue);
    }

    #[test]
    fn test_unsupported_kinds() {
        let err = coerce_default(&FieldKind::Custom("Date"), b"20240101").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFieldKind);
        assert!(err.to_string().contains("custom Date"));

        let kind = FieldKind::Optional(Box::new(FieldKind::Nested("Address")));
        let err = coerce_default(&kind, b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFieldKind);
    }
}
