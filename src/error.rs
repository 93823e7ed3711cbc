//! Error types for sql-rowstream
//!
//! Every failure is reported to the immediate caller; nothing is retried,
//! since a cursor is single-pass and stateful.

use thiserror::Error;

/// Boxed error produced by a metadata or cursor collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by collaborators.
pub type DriverResult<T> = std::result::Result<T, BoxError>;

/// Result type for sql-rowstream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sql-rowstream
#[derive(Error, Debug)]
pub enum Error {
    /// Metadata collaborator failed or reported something inconsistent
    #[error("metadata error: {message}")]
    Metadata {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A typed accessor failed or produced a value its kind cannot hold
    #[error("coercion error at column {position} ({label}): {message}")]
    Coercion {
        position: usize,
        label: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Cursor advance or close failed, including use after close
    #[error("cursor error: {message}")]
    Cursor {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Stream options could not be parsed
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
            source: None,
        }
    }

    pub fn metadata_with_source(message: impl Into<String>, source: BoxError) -> Self {
        Self::Metadata {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn coercion(
        position: usize,
        label: impl Into<String>,
        message: impl Into<String>,
        source: Option<BoxError>,
    ) -> Self {
        Self::Coercion {
            position,
            label: label.into(),
            message: message.into(),
            source,
        }
    }

    pub fn cursor(message: impl Into<String>) -> Self {
        Self::Cursor {
            message: message.into(),
            source: None,
        }
    }

    pub fn cursor_with_source(message: impl Into<String>, source: BoxError) -> Self {
        Self::Cursor {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Metadata { .. })
    }

    pub fn is_coercion(&self) -> bool {
        matches!(self, Self::Coercion { .. })
    }

    pub fn is_cursor(&self) -> bool {
        matches!(self, Self::Cursor { .. })
    }

    /// Column position and label for coercion errors.
    pub fn column(&self) -> Option<(usize, &str)> {
        match self {
            Self::Coercion {
                position, label, ..
            } => Some((*position, label.as_str())),
            _ => None,
        }
    }
}
