//! SQL type code → target kind lookup.
//!
//! `BIGINT` deliberately maps to [`TargetKind::String`]: consumers that hold
//! numbers as doubles cannot represent every 64-bit integer exactly.

use crate::kind::TargetKind;
use crate::type_id::SqlTypeId;

const TABLE: &[(SqlTypeId, TargetKind)] = &[
    (SqlTypeId::BIT, TargetKind::Boolean),
    (SqlTypeId::TINYINT, TargetKind::Short),
    (SqlTypeId::SMALLINT, TargetKind::Short),
    (SqlTypeId::INTEGER, TargetKind::Int),
    (SqlTypeId::BIGINT, TargetKind::String),
    (SqlTypeId::FLOAT, TargetKind::Float),
    (SqlTypeId::REAL, TargetKind::Float),
    (SqlTypeId::DOUBLE, TargetKind::Double),
    (SqlTypeId::NUMERIC, TargetKind::BigDecimal),
    (SqlTypeId::DECIMAL, TargetKind::BigDecimal),
    (SqlTypeId::CHAR, TargetKind::String),
    (SqlTypeId::VARCHAR, TargetKind::String),
    (SqlTypeId::LONGVARCHAR, TargetKind::String),
    (SqlTypeId::DATE, TargetKind::Date),
    (SqlTypeId::TIME, TargetKind::Time),
    (SqlTypeId::TIMESTAMP, TargetKind::Timestamp),
    (SqlTypeId::BOOLEAN, TargetKind::Boolean),
    (SqlTypeId::NCHAR, TargetKind::String),
    (SqlTypeId::NVARCHAR, TargetKind::String),
    (SqlTypeId::LONGNVARCHAR, TargetKind::String),
    (SqlTypeId::BINARY, TargetKind::Bytes),
    (SqlTypeId::VARBINARY, TargetKind::Bytes),
    (SqlTypeId::LONGVARBINARY, TargetKind::Bytes),
    (SqlTypeId::BLOB, TargetKind::Bytes),
];

/// Static mapping from SQL type identifiers to target kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeRegistry;

impl TypeRegistry {
    /// Resolve the kind for a type code. Unmapped codes read as strings.
    pub fn kind_of(id: SqlTypeId) -> TargetKind {
        Self::lookup(id).unwrap_or(TargetKind::String)
    }

    /// Whether the code has an explicit entry in the table.
    pub fn is_mapped(id: SqlTypeId) -> bool {
        Self::lookup(id).is_some()
    }

    /// Every explicit `(type code, kind)` entry.
    pub fn entries() -> &'static [(SqlTypeId, TargetKind)] {
        TABLE
    }

    fn lookup(id: SqlTypeId) -> Option<TargetKind> {
        TABLE
            .iter()
            .find(|(code, _)| *code == id)
            .map(|(_, kind)| *kind)
    }
}
