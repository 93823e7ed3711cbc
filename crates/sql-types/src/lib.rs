//! SQL type codes and value kinds for sql-rowstream.
//!
//! This crate holds the pieces of the row-streaming adapter that do not
//! depend on any cursor:
//!
//! - [`SqlTypeId`] - Driver-reported SQL type codes (`java.sql.Types` space)
//! - [`TargetKind`] - The closed set of output value kinds
//! - [`TypeRegistry`] - Type code → kind lookup table
//! - [`RowValue`] - A coerced column value
//! - [`convert`] - Decimal and temporal conversion
//! - [`Holdability`] - Cursor holdability codes
//!
//! # Example
//!
//! ```rust
//! use sql_types::{SqlTypeId, TargetKind, TypeRegistry};
//!
//! assert_eq!(TypeRegistry::kind_of(SqlTypeId::INTEGER), TargetKind::Int);
//! // BIGINT is read as text to keep all 64 bits
//! assert_eq!(TypeRegistry::kind_of(SqlTypeId::BIGINT), TargetKind::String);
//! // Unmapped codes fall back to String
//! assert_eq!(TypeRegistry::kind_of(SqlTypeId::CLOB), TargetKind::String);
//! ```

pub mod convert;
pub mod holdability;
pub mod kind;
pub mod registry;
pub mod type_id;
pub mod value;

pub use convert::{ConversionError, TemporalMode};
pub use holdability::Holdability;
pub use kind::{TargetKind, UnknownKind};
pub use registry::TypeRegistry;
pub use type_id::SqlTypeId;
pub use value::RowValue;
