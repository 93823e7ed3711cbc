//! sql-rowstream
//!
//! A typed, lazily-materialized row-streaming adapter between a blocking,
//! forward-only SQL cursor and application code that wants ordinary records.
//!
//! # Components
//!
//! - [`sql_types::TypeRegistry`] - SQL type code → [`TargetKind`] lookup
//! - [`ColumnPlan`] - per-column label and kind, built once per result
//! - [`RowCoercer`] - reads one column as a [`RowValue`], applying the null policy
//! - [`RowIterator`] - lazy, single-pass producer of hydrated rows
//! - [`ResultSet`] - the facade: plan, stream, collect, close
//!
//! The data source is reached only through two collaborator traits,
//! [`ResultSetMetadata`] and [`Cursor`]. The [`memory`] module provides
//! in-memory implementations of both.
//!
//! # Example
//!
//! ```rust
//! use sql_rowstream::memory::{MemoryCursor, MemoryMetadata};
//! use sql_rowstream::{Hydration, ResultSet, RowValue, SqlTypeId};
//!
//! # tokio_test::block_on(async {
//! let metadata = MemoryMetadata::new(vec![
//!     ("user_id", SqlTypeId::INTEGER),
//!     ("user_name", SqlTypeId::VARCHAR),
//! ]);
//! let cursor = MemoryCursor::new(vec![
//!     vec![RowValue::Int(1), RowValue::from("alice")],
//!     vec![RowValue::Null, RowValue::from("bob")],
//! ]);
//! let result = ResultSet::new(metadata, cursor);
//!
//! let rows = result
//!     .collect_array(Hydration::record().camelize(true))
//!     .await
//!     .unwrap();
//! assert_eq!(rows[0].get("userId"), Some(&RowValue::Int(1)));
//! assert_eq!(rows[1].get("userId"), Some(&RowValue::Null));
//! # });
//! ```

pub mod casing;
pub mod coerce;
pub mod cursor;
pub mod error;
pub mod iter;
pub mod memory;
pub mod metadata;
pub mod options;
pub mod plan;
pub mod result_set;
pub mod row;

pub use coerce::RowCoercer;
pub use cursor::Cursor;
pub use error::{BoxError, DriverResult, Error, Result};
pub use iter::RowIterator;
pub use metadata::ResultSetMetadata;
pub use options::{Hydration, IntNullProbe, StreamOptions};
pub use plan::{build_plan, ColumnDescriptor, ColumnPlan};
pub use result_set::{ResultSet, RowSet, RowStream};
pub use row::{Row, RowTarget};

// Re-export the type crate for convenience
pub use sql_types::{Holdability, RowValue, SqlTypeId, TargetKind, TemporalMode, TypeRegistry};
