//! Deserialize a line read with a [`FortReader`] into any `serde` type.
//!
//! The values of a line are handed to `serde` as a sequence in column order, so structs
//! are filled in field order and tuples element by element:
//!
//! ```
//! use fortreader::reader::FortReader;
//! use fortreader::de::from_line;
//!
//! #[derive(Debug, PartialEq, serde::Deserialize)]
//! struct Atom {
//!     serial: u32,
//!     name: String,
//!     x: f64,
//! }
//!
//! let reader = FortReader::parse("I5,1X,A4,F8.3").unwrap();
//! let atom: Atom = from_line("   17 CA     1.250", &reader).unwrap();
//! assert_eq!(atom, Atom { serial: 17, name: "CA".to_string(), x: 1.25 });
//! ```
//!
//! The target must consume every value of the line; a struct with fewer fields than the
//! format has entries is an error.
use std::fmt::Display;

use serde::de::{self, IntoDeserializer, Visitor};
use serde::de::value::SeqDeserializer;
use serde::forward_to_deserialize_any;

use crate::fort_error::ConversionError;
use crate::format_specs::FortValue;
use crate::reader::FortReader;

/// A type alias for `Result` with [`DError`] as the error type.
pub type DResult<T> = Result<T, DError>;

/// Errors that can occur while deserializing a line.
#[derive(Debug)]
pub enum DError {
    /// Indicates that a field of the line could not be converted to its format type
    ConversionError(ConversionError),
    /// Indicates a general error during deserialization, e.g. a type or length mismatch
    DeserializationFailure(String),
}

impl Display for DError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConversionError(e) => write!(f, "Error reading value: {e}"),
            Self::DeserializationFailure(msg) => write!(f, "Serde deserialization error: {msg}"),
        }
    }
}

impl std::error::Error for DError {}

impl de::Error for DError {
    fn custom<T>(msg: T) -> Self where T: Display {
        Self::DeserializationFailure(format!("{msg}"))
    }
}

impl From<ConversionError> for DError {
    fn from(value: ConversionError) -> Self {
        Self::ConversionError(value)
    }
}

/// Read `line` with `reader` and deserialize its values into a `T`.
///
/// Conversion of the line happens first, exactly as in [`FortReader::read`], so a bad
/// field gives [`DError::ConversionError`] before `serde` sees anything.
pub fn from_line<T>(line: &str, reader: &FortReader) -> DResult<T>
where T: de::DeserializeOwned
{
    let values = reader.read(line)?;
    T::deserialize(SeqDeserializer::new(values.into_iter()))
}

/// A deserializer for a single [`FortValue`].
pub struct FortValueDeserializer(FortValue);

impl<'de> IntoDeserializer<'de, DError> for FortValue {
    type Deserializer = FortValueDeserializer;

    fn into_deserializer(self) -> Self::Deserializer {
        FortValueDeserializer(self)
    }
}

impl<'de> de::Deserializer<'de> for FortValueDeserializer {
    type Error = DError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de> {
        match self.0 {
            FortValue::Char(s) => visitor.visit_string(s),
            FortValue::Integer(i) => visitor.visit_i64(i),
            FortValue::Real(r) => visitor.visit_f64(r),
        }
    }

    // Every column always has a value, so optional fields are always `Some`.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de> {
        visitor.visit_some(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

impl<'de> de::Deserialize<'de> for FortValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de> {
        deserializer.deserialize_any(FortValueVisitor)
    }
}

struct FortValueVisitor;

impl<'de> Visitor<'de> for FortValueVisitor {
    type Value = FortValue;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "an integer, float, or string")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error, {
        Ok(FortValue::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error, {
        let v = i64::try_from(v).map_err(|_| E::custom(format!("{v} does not fit in an i64")))?;
        Ok(FortValue::Integer(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error, {
        Ok(FortValue::Real(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error, {
        Ok(FortValue::Char(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error, {
        Ok(FortValue::Char(v))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[test]
    fn test_de_tuple() -> DResult<()> {
        let reader = FortReader::parse("A1,1X,I2,1X,I4").unwrap();
        let t: (char, i32, u16) = from_line("a 16 9876", &reader)?;
        assert_eq!(t, ('a', 16, 9876));
        Ok(())
    }

    #[test]
    fn test_de_struct() -> DResult<()> {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Coord {
            serial: i64,
            total_res: i64,
            res_name: String,
            name: String,
            x: f64,
            y: f64,
            z: f32,
        }

        let reader = FortReader::parse("2I10,2X,A8,2X,A8,3F20.10").unwrap();
        let line = format!("{:>10}{:>10}  {:<8}  {:<8}{:>20.10}{:>20.10}{:>20.10}", 5, 2, "ALA", "CB", 1.5, -2.25, 3.0);
        let c: Coord = from_line(&line, &reader)?;
        assert_eq!(c, Coord { serial: 5, total_res: 2, res_name: "ALA".to_owned(), name: "CB".to_owned(), x: 1.5, y: -2.25, z: 3.0 });
        Ok(())
    }

    #[test]
    fn test_de_option() -> DResult<()> {
        let reader = FortReader::parse("3I3,A4").unwrap();
        let t: (i32, i32, i32, Option<String>) = from_line("  1  2  3abcd", &reader)?;
        assert_eq!(t, (1, 2, 3, Some("abcd".to_owned())));
        Ok(())
    }

    #[test]
    fn test_de_fort_values() -> DResult<()> {
        let reader = FortReader::parse("I3,F5.1,A3").unwrap();
        let v: Vec<FortValue> = from_line(" 42  1.5 hi", &reader)?;
        assert_eq!(v, vec![FortValue::Integer(42), FortValue::Real(1.5), FortValue::Char("hi".to_owned())]);
        Ok(())
    }

    #[test]
    fn test_de_conversion_error() {
        let reader = FortReader::parse("I3,I3").unwrap();
        let err = from_line::<(i32, i32)>("  1  x", &reader).unwrap_err();
        assert!(matches!(err, DError::ConversionError(_)), "Wrong error type: {err}");
    }

    #[test]
    fn test_de_type_mismatch() {
        let reader = FortReader::parse("A3,I3").unwrap();
        let err = from_line::<(i32, i32)>("abc  1", &reader).unwrap_err();
        assert!(matches!(err, DError::DeserializationFailure(_)), "Wrong error type: {err}");
    }

    #[test]
    fn test_de_too_few_fields() {
        let reader = FortReader::parse("I3,I3,I3").unwrap();
        let res = from_line::<(i32, i32)>("  1  2  3", &reader);
        assert!(res.is_err(), "Leftover values should be an error");
    }
}
