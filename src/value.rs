//! Scalar value representation for COIL records.
//!
//! A COIL table is a list of flat records whose cells are scalars: strings,
//! numbers, booleans, or null. This module provides the [`Scalar`] tagged
//! union, its canonical string form (the representation that travels through
//! the body), and the per-column [`ColumnType`] tags that let the decoder
//! restore numbers and booleans from that string form.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use coil_codec::Scalar;
//!
//! let cell = Scalar::from(34);
//! assert!(cell.is_number());
//! assert_eq!(cell.canonical(), Some("34".to_string()));
//!
//! // null serializes to the empty string
//! assert_eq!(Scalar::Null.canonical(), None);
//! ```

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A numeric cell value, either an integer or a float.
///
/// JSON integers outside the `i64` range degrade to floats, mirroring how
/// the document model widens `u64` values it cannot hold.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it is an integer.
    #[inline]
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(_) => None,
        }
    }

    /// Converts this number to an `f64`, widening integers.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// A single record cell: the scalar union COIL tables are made of.
///
/// `Null` has no canonical text of its own; it renders as the empty string
/// in the body and does not participate in value interning.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Scalar::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Scalar::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Scalar::String(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// The canonical string form that travels through the body.
    ///
    /// Returns `None` for null, which renders as the empty string and is
    /// excluded from interning.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coil_codec::Scalar;
    ///
    /// assert_eq!(Scalar::from(34).canonical(), Some("34".to_string()));
    /// assert_eq!(Scalar::from(true).canonical(), Some("true".to_string()));
    /// assert_eq!(Scalar::Null.canonical(), None);
    /// ```
    #[must_use]
    pub fn canonical(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::String(s) => Some(s.clone()),
        }
    }

    /// Converts this scalar into a `serde_json::Value`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Null => serde_json::Value::Null,
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Number(Number::Integer(i)) => serde_json::Value::from(*i),
            Scalar::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Scalar::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(Number::Integer(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(Number::Float(value))
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl TryFrom<&serde_json::Value> for Scalar {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> crate::Result<Self> {
        match value {
            serde_json::Value::Null => Ok(Scalar::Null),
            serde_json::Value::Bool(b) => Ok(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Scalar::Number(Number::Integer(i)))
                } else {
                    // u64 beyond i64::MAX widens to f64, like the document model
                    Ok(Scalar::Number(Number::Float(n.as_f64().unwrap_or(0.0))))
                }
            }
            serde_json::Value::String(s) => Ok(Scalar::String(s.clone())),
            other => Err(Error::structural(format!(
                "record values must be scalar, found {}",
                json_kind(other)
            ))),
        }
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Scalar::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;

        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a COIL scalar (null, bool, number, or string)")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Scalar::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Scalar::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                if value <= i64::MAX as u64 {
                    Ok(Scalar::Number(Number::Integer(value as i64)))
                } else {
                    Ok(Scalar::Number(Number::Float(value as f64)))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Scalar::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Scalar::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Scalar::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Scalar::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Scalar::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// Per-column scalar kind recorded in meta so the decoder can restore
/// numbers and booleans from their canonical string form.
///
/// Documents produced by encoders that predate the `types` meta entry decode
/// with every column as [`ColumnType::Str`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColumnType {
    #[default]
    Str,
    Int,
    Float,
    Bool,
}

impl ColumnType {
    /// The tag text used in the meta `types` entry.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Str => "str",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
        }
    }

    /// Parses a tag from meta. Unknown tags decode leniently as `Str`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "int" => ColumnType::Int,
            "float" => ColumnType::Float,
            "bool" => ColumnType::Bool,
            _ => ColumnType::Str,
        }
    }

    /// Derives the tag for one column from its non-null cells.
    ///
    /// All-integer columns tag `int`, numeric columns with at least one
    /// float tag `float`, all-boolean columns tag `bool`; anything else,
    /// including mixed kinds and empty columns, tags `str`.
    pub fn infer<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a Scalar>,
    {
        let mut seen: Option<ColumnType> = None;
        for cell in cells {
            let kind = match cell {
                Scalar::Null => continue,
                Scalar::Bool(_) => ColumnType::Bool,
                Scalar::Number(Number::Integer(_)) => ColumnType::Int,
                Scalar::Number(Number::Float(_)) => ColumnType::Float,
                Scalar::String(_) => ColumnType::Str,
            };
            seen = Some(match (seen, kind) {
                (None, k) => k,
                (Some(prev), k) if prev == k => k,
                (Some(ColumnType::Int), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Int) => ColumnType::Float,
                _ => return ColumnType::Str,
            });
        }
        seen.unwrap_or(ColumnType::Str)
    }

    /// Restores a decoded cell from its canonical string form.
    ///
    /// Falls back to the raw string when the text does not parse under the
    /// tag; null and missing cells arrive as empty strings and therefore
    /// always restore as empty strings.
    #[must_use]
    pub fn restore(&self, raw: String) -> Scalar {
        match self {
            ColumnType::Str => Scalar::String(raw),
            ColumnType::Int => match raw.parse::<i64>() {
                Ok(i) => Scalar::Number(Number::Integer(i)),
                Err(_) => Scalar::String(raw),
            },
            ColumnType::Float => match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => Scalar::Number(Number::Float(f)),
                _ => Scalar::String(raw),
            },
            ColumnType::Bool => match raw.as_str() {
                "true" => Scalar::Bool(true),
                "false" => Scalar::Bool(false),
                _ => Scalar::String(raw),
            },
        }
    }
}
