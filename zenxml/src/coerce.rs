//! Scalar conversion of node text.
//!
//! [`FromXmlText`] is the typed conversion used by `as_type::<T>()`.
//! [`ScalarKind`] and [`Scalar`] are its runtime counterparts, used when the
//! target type is only known as a value (the `As` pseudo-call).
//!
//! Conversions follow `FromStr`, with two adjustments: surrounding whitespace
//! is ignored for everything except `String`, and booleans are matched
//! without regard to ASCII case.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Types that can be produced from the text of a node.
pub trait FromXmlText: Sized {
    /// Human readable name of the target type, used in error messages.
    const TYPE_NAME: &'static str;

    /// Converts `text` into `Self`.
    fn from_xml_text(text: &str) -> Result<Self>;
}

fn coercion_error(text: &str, target: &'static str, reason: impl fmt::Display) -> Error {
    Error::TypeCoercion {
        value: text.to_string(),
        target,
        reason: reason.to_string(),
    }
}

fn parse_trimmed<T>(text: &str, target: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| coercion_error(text, target, e))
}

macro_rules! from_str_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromXmlText for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_xml_text(text: &str) -> Result<Self> {
                    parse_trimmed(text, Self::TYPE_NAME)
                }
            }
        )*
    };
}

from_str_impls!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char
);

impl FromXmlText for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_xml_text(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(coercion_error(text, Self::TYPE_NAME, "expected `true` or `false`"))
        }
    }
}

impl FromXmlText for String {
    const TYPE_NAME: &'static str = "String";

    fn from_xml_text(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl FromXmlText for NaiveDate {
    const TYPE_NAME: &'static str = "NaiveDate";

    fn from_xml_text(text: &str) -> Result<Self> {
        parse_trimmed(text, Self::TYPE_NAME)
    }
}

impl FromXmlText for NaiveDateTime {
    const TYPE_NAME: &'static str = "NaiveDateTime";

    fn from_xml_text(text: &str) -> Result<Self> {
        parse_trimmed(text, Self::TYPE_NAME)
    }
}

impl FromXmlText for DateTime<FixedOffset> {
    const TYPE_NAME: &'static str = "DateTime<FixedOffset>";

    fn from_xml_text(text: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(text.trim()).map_err(|e| coercion_error(text, Self::TYPE_NAME, e))
    }
}

/// Runtime type argument of the `As` pseudo-call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit floating point number.
    Float,
    /// Boolean.
    Boolean,
    /// Text, unchanged.
    String,
    /// Calendar date (`2024-03-01`).
    Date,
    /// Date and time, with an offset (RFC 3339) or without (`2024-03-01T10:00:00`).
    DateTime,
}

impl ScalarKind {
    /// Returns the lowercase name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Integer => "int",
            ScalarKind::Float => "float",
            ScalarKind::Boolean => "bool",
            ScalarKind::String => "string",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "datetime",
        }
    }

    /// Converts `text` into a scalar of this kind.
    pub fn coerce(self, text: &str) -> Result<Scalar> {
        Ok(match self {
            ScalarKind::Integer => Scalar::Integer(i64::from_xml_text(text)?),
            ScalarKind::Float => Scalar::Float(f64::from_xml_text(text)?),
            ScalarKind::Boolean => Scalar::Boolean(bool::from_xml_text(text)?),
            ScalarKind::String => Scalar::String(String::from_xml_text(text)?),
            ScalarKind::Date => Scalar::Date(NaiveDate::from_xml_text(text)?),
            ScalarKind::DateTime => match DateTime::<FixedOffset>::from_xml_text(text) {
                Ok(value) => Scalar::DateTime(value),
                Err(_) => Scalar::LocalDateTime(NaiveDateTime::from_xml_text(text)?),
            },
        })
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integer" | "long" | "i64" => Ok(ScalarKind::Integer),
            "float" | "double" | "decimal" | "f64" => Ok(ScalarKind::Float),
            "bool" | "boolean" => Ok(ScalarKind::Boolean),
            "string" | "str" => Ok(ScalarKind::String),
            "date" => Ok(ScalarKind::Date),
            "datetime" => Ok(ScalarKind::DateTime),
            other => Err(Error::invalid_argument(
                "kind",
                format!("unknown scalar kind `{}`", other),
            )),
        }
    }
}

/// Result of a runtime scalar conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// Text value.
    String(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time with an offset.
    DateTime(DateTime<FixedOffset>),
    /// Date and time without an offset.
    LocalDateTime(NaiveDateTime),
}

impl Scalar {
    /// Returns the kind this scalar belongs to.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Integer(_) => ScalarKind::Integer,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Boolean(_) => ScalarKind::Boolean,
            Scalar::String(_) => ScalarKind::String,
            Scalar::Date(_) => ScalarKind::Date,
            Scalar::DateTime(_) | Scalar::LocalDateTime(_) => ScalarKind::DateTime,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Boolean(v) => write!(f, "{}", v),
            Scalar::String(v) => f.write_str(v),
            Scalar::Date(v) => write!(f, "{}", v),
            Scalar::DateTime(v) => f.write_str(&v.to_rfc3339()),
            Scalar::LocalDateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_integers() {
        assert_eq!(i32::from_xml_text("3").unwrap(), 3);
        assert_eq!(i64::from_xml_text("  -42\n").unwrap(), -42);
        assert_eq!(u8::from_xml_text("255").unwrap(), 255);
        assert!(u8::from_xml_text("256").is_err());
    }

    #[test]
    fn test_integer_failure_is_type_coercion() {
        let err = i32::from_xml_text("abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeCoercion);
        match err {
            Error::TypeCoercion { value, target, .. } => {
                assert_eq!(value, "abc");
                assert_eq!(target, "i32");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::from_xml_text("4.1").unwrap(), 4.1);
        assert_eq!(f32::from_xml_text(" 4.0 ").unwrap(), 4.0);
        assert!(f64::from_xml_text("four").is_err());
    }

    #[test]
    fn test_booleans() {
        assert!(bool::from_xml_text("True").unwrap());
        assert!(!bool::from_xml_text(" false ").unwrap());
        assert!(bool::from_xml_text("yes").is_err());
    }

    #[test]
    fn test_string_is_identity() {
        assert_eq!(String::from_xml_text("  My Item 1 ").unwrap(), "  My Item 1 ");
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            NaiveDate::from_xml_text("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(NaiveDate::from_xml_text("2024-13-01").is_err());
        let dt = DateTime::<FixedOffset>::from_xml_text("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_scalar_kind_coerce() {
        assert_eq!(ScalarKind::Integer.coerce("3").unwrap(), Scalar::Integer(3));
        assert_eq!(ScalarKind::Float.coerce("4.0").unwrap(), Scalar::Float(4.0));
        assert_eq!(ScalarKind::Boolean.coerce("TRUE").unwrap(), Scalar::Boolean(true));
        assert_eq!(
            ScalarKind::String.coerce("x").unwrap(),
            Scalar::String("x".to_string())
        );
        assert!(ScalarKind::Integer.coerce("abc").is_err());
    }

    #[test]
    fn test_datetime_with_and_without_offset() {
        let with = ScalarKind::DateTime.coerce("2024-03-01T10:00:00Z").unwrap();
        assert!(matches!(with, Scalar::DateTime(_)));
        let without = ScalarKind::DateTime.coerce("2024-03-01T10:00:00").unwrap();
        assert!(matches!(without, Scalar::LocalDateTime(_)));
        assert_eq!(without.kind(), ScalarKind::DateTime);
        assert_eq!(without.to_string(), "2024-03-01T10:00:00");
    }

    #[test]
    fn test_scalar_kind_from_str() {
        assert_eq!("Int32".parse::<ScalarKind>().ok(), None);
        assert_eq!("int".parse::<ScalarKind>().unwrap(), ScalarKind::Integer);
        assert_eq!("Boolean".parse::<ScalarKind>().unwrap(), ScalarKind::Boolean);
        assert_eq!("double".parse::<ScalarKind>().unwrap(), ScalarKind::Float);
        let err = "uuid".parse::<ScalarKind>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
