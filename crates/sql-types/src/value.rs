//! Coerced column values.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A single column value after coercion.
///
/// Serializes to plain JSON scalars: decimals and temporals as strings,
/// bytes as standard base64.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    /// SQL NULL
    Null,
    /// BIT / BOOLEAN
    Bool(bool),
    /// TINYINT / SMALLINT
    Short(i16),
    /// INTEGER
    Int(i32),
    /// Temporal value rendered as epoch milliseconds
    Long(i64),
    /// FLOAT / REAL
    Float(f32),
    /// DOUBLE
    Double(f64),
    /// NUMERIC / DECIMAL that fits 96 bits exactly
    Decimal(Decimal),
    /// NUMERIC / DECIMAL too wide for [`Decimal`], kept verbatim
    DecimalText(String),
    /// Character data, BIGINT and anything unmapped
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// DATE
    Date(NaiveDate),
    /// TIME
    Time(NaiveTime),
    /// TIMESTAMP
    Timestamp(NaiveDateTime),
}

impl RowValue {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Short(i) => Some(i32::from(*i)),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(i) => Some(*i),
            Self::Int(i) => Some(i64::from(*i)),
            Self::Short(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            Self::Float(f) => Some(f64::from(*f)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::DecimalText(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Convert into a `serde_json::Value` using the same rendering as
    /// `Serialize`. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Self::Null => J::Null,
            Self::Bool(b) => J::Bool(*b),
            Self::Short(i) => J::from(*i),
            Self::Int(i) => J::from(*i),
            Self::Long(i) => J::from(*i),
            // Widen through the shortest f32 text so 0.1f32 stays 0.1.
            Self::Float(f) => f.to_string().parse::<f64>().map_or(J::Null, J::from),
            Self::Double(f) => J::from(*f),
            Self::Decimal(d) => J::String(d.to_string()),
            Self::DecimalText(s) | Self::String(s) => J::String(s.clone()),
            Self::Bytes(b) => J::String(BASE64.encode(b)),
            Self::Date(d) => J::String(d.format(DATE_FORMAT).to_string()),
            Self::Time(t) => J::String(t.format(TIME_FORMAT).to_string()),
            Self::Timestamp(ts) => J::String(ts.format(TIMESTAMP_FORMAT).to_string()),
        }
    }
}

impl Serialize for RowValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Short(i) => serializer.serialize_i16(*i),
            Self::Int(i) => serializer.serialize_i32(*i),
            Self::Long(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f32(*f),
            Self::Double(f) => serializer.serialize_f64(*f),
            Self::Decimal(d) => serializer.collect_str(d),
            Self::DecimalText(s) | Self::String(s) => serializer.serialize_str(s),
            Self::Bytes(b) => serializer.serialize_str(&BASE64.encode(b)),
            Self::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            Self::Time(t) => serializer.collect_str(&t.format(TIME_FORMAT)),
            Self::Timestamp(ts) => serializer.collect_str(&ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl<T: Into<RowValue>> From<Option<T>> for RowValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValue::Null, Into::into)
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for RowValue {
                fn from(value: $ty) -> Self {
                    RowValue::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Decimal => Decimal,
    String => String,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => Timestamp,
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        RowValue::String(value.to_string())
    }
}
