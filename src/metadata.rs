//! Result-set metadata collaborator.

use crate::error::DriverResult;
use async_trait::async_trait;
use sql_types::SqlTypeId;

/// Column metadata of an executed query.
///
/// Positions are 1-based. Implementations must answer any number of times;
/// the adapter asks at most once per column over a result set's lifetime.
#[async_trait]
pub trait ResultSetMetadata: Send + Sync {
    /// Number of columns in the result.
    async fn column_count(&self) -> DriverResult<usize>;

    /// Label (alias or name) of the column at `position`.
    async fn column_label(&self, position: usize) -> DriverResult<String>;

    /// SQL type code of the column at `position`.
    async fn column_type(&self, position: usize) -> DriverResult<SqlTypeId>;
}
