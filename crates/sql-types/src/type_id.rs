//! SQL type identifiers.
//!
//! Drivers report a column's type as an integer code from the
//! `java.sql.Types` code space. `SqlTypeId` wraps that code and names the
//! standard values so that lookups and diagnostics never deal in bare
//! integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A driver-reported SQL type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqlTypeId(pub i32);

impl SqlTypeId {
    pub const BIT: Self = Self(-7);
    pub const TINYINT: Self = Self(-6);
    pub const SMALLINT: Self = Self(5);
    pub const INTEGER: Self = Self(4);
    pub const BIGINT: Self = Self(-5);
    pub const FLOAT: Self = Self(6);
    pub const REAL: Self = Self(7);
    pub const DOUBLE: Self = Self(8);
    pub const NUMERIC: Self = Self(2);
    pub const DECIMAL: Self = Self(3);
    pub const CHAR: Self = Self(1);
    pub const VARCHAR: Self = Self(12);
    pub const LONGVARCHAR: Self = Self(-1);
    pub const DATE: Self = Self(91);
    pub const TIME: Self = Self(92);
    pub const TIMESTAMP: Self = Self(93);
    pub const BINARY: Self = Self(-2);
    pub const VARBINARY: Self = Self(-3);
    pub const LONGVARBINARY: Self = Self(-4);
    pub const NULL: Self = Self(0);
    pub const OTHER: Self = Self(1111);
    pub const JAVA_OBJECT: Self = Self(2000);
    pub const DISTINCT: Self = Self(2001);
    pub const STRUCT: Self = Self(2002);
    pub const ARRAY: Self = Self(2003);
    pub const BLOB: Self = Self(2004);
    pub const CLOB: Self = Self(2005);
    pub const REF: Self = Self(2006);
    pub const DATALINK: Self = Self(70);
    pub const BOOLEAN: Self = Self(16);
    pub const ROWID: Self = Self(-8);
    pub const NCHAR: Self = Self(-15);
    pub const NVARCHAR: Self = Self(-9);
    pub const LONGNVARCHAR: Self = Self(-16);
    pub const NCLOB: Self = Self(2011);
    pub const SQLXML: Self = Self(2009);
    pub const REF_CURSOR: Self = Self(2012);
    pub const TIME_WITH_TIMEZONE: Self = Self(2013);
    pub const TIMESTAMP_WITH_TIMEZONE: Self = Self(2014);

    /// Raw integer code.
    #[inline]
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Standard name of this code, if it is one of the named constants.
    pub const fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            -7 => "BIT",
            -6 => "TINYINT",
            5 => "SMALLINT",
            4 => "INTEGER",
            -5 => "BIGINT",
            6 => "FLOAT",
            7 => "REAL",
            8 => "DOUBLE",
            2 => "NUMERIC",
            3 => "DECIMAL",
            1 => "CHAR",
            12 => "VARCHAR",
            -1 => "LONGVARCHAR",
            91 => "DATE",
            92 => "TIME",
            93 => "TIMESTAMP",
            -2 => "BINARY",
            -3 => "VARBINARY",
            -4 => "LONGVARBINARY",
            0 => "NULL",
            1111 => "OTHER",
            2000 => "JAVA_OBJECT",
            2001 => "DISTINCT",
            2002 => "STRUCT",
            2003 => "ARRAY",
            2004 => "BLOB",
            2005 => "CLOB",
            2006 => "REF",
            70 => "DATALINK",
            16 => "BOOLEAN",
            -8 => "ROWID",
            -15 => "NCHAR",
            -9 => "NVARCHAR",
            -16 => "LONGNVARCHAR",
            2011 => "NCLOB",
            2009 => "SQLXML",
            2012 => "REF_CURSOR",
            2013 => "TIME_WITH_TIMEZONE",
            2014 => "TIMESTAMP_WITH_TIMEZONE",
            _ => return None,
        };
        Some(name)
    }
}

impl From<i32> for SqlTypeId {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl fmt::Display for SqlTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN({})", self.0),
        }
    }
}
