//! Target value kinds.
//!
//! Every column is read as exactly one `TargetKind`. The kind decides which
//! typed cursor accessor is used and how the raw value is coerced.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of output value categories a SQL column is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Boolean,
    Short,
    Int,
    String,
    Float,
    Double,
    BigDecimal,
    Date,
    Time,
    Timestamp,
    Bytes,
}

impl TargetKind {
    /// All kinds, in declaration order.
    pub const ALL: [TargetKind; 11] = [
        TargetKind::Boolean,
        TargetKind::Short,
        TargetKind::Int,
        TargetKind::String,
        TargetKind::Float,
        TargetKind::Double,
        TargetKind::BigDecimal,
        TargetKind::Date,
        TargetKind::Time,
        TargetKind::Timestamp,
        TargetKind::Bytes,
    ];

    /// Kind name as reported in a result's `types` list.
    pub const fn name(self) -> &'static str {
        match self {
            TargetKind::Boolean => "Boolean",
            TargetKind::Short => "Short",
            TargetKind::Int => "Int",
            TargetKind::String => "String",
            TargetKind::Float => "Float",
            TargetKind::Double => "Double",
            TargetKind::BigDecimal => "BigDecimal",
            TargetKind::Date => "Date",
            TargetKind::Time => "Time",
            TargetKind::Timestamp => "Timestamp",
            TargetKind::Bytes => "Bytes",
        }
    }

    /// Whether values of this kind go through the temporal converter.
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            TargetKind::Date | TargetKind::Time | TargetKind::Timestamp
        )
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a `TargetKind`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for TargetKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
