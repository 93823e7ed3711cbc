//! Cursor holdability.

use crate::convert::ConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a cursor survives a transaction commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Holdability {
    /// Cursor stays open after commit.
    HoldCursorsOverCommit,
    /// Cursor is closed when the transaction commits.
    CloseCursorsAtCommit,
}

impl Holdability {
    pub const HOLD_CURSORS_OVER_COMMIT: i32 = 1;
    pub const CLOSE_CURSORS_AT_COMMIT: i32 = 2;

    /// Parse a driver-reported holdability code.
    pub fn from_code(code: i32) -> Result<Self, ConversionError> {
        match code {
            Self::HOLD_CURSORS_OVER_COMMIT => Ok(Self::HoldCursorsOverCommit),
            Self::CLOSE_CURSORS_AT_COMMIT => Ok(Self::CloseCursorsAtCommit),
            other => Err(ConversionError::UnknownHoldability(other)),
        }
    }

    pub const fn code(self) -> i32 {
        match self {
            Self::HoldCursorsOverCommit => Self::HOLD_CURSORS_OVER_COMMIT,
            Self::CloseCursorsAtCommit => Self::CLOSE_CURSORS_AT_COMMIT,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::HoldCursorsOverCommit => "HOLD_CURSORS_OVER_COMMIT",
            Self::CloseCursorsAtCommit => "CLOSE_CURSORS_AT_COMMIT",
        }
    }
}

impl fmt::Display for Holdability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
