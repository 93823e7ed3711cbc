//! The public result-set facade.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::iter::{lock_cursor, CursorState, RowIterator, SharedCursor};
use crate::metadata::ResultSetMetadata;
use crate::options::Hydration;
use crate::plan::{build_plan, ColumnPlan};
use crate::row::RowTarget;
use serde::Serialize;
use sql_types::Holdability;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::debug;

/// Labels, kind names and a lazy row iterator.
#[derive(Debug)]
pub struct RowStream<C, T> {
    pub labels: Vec<String>,
    pub types: Vec<String>,
    pub rows: RowIterator<C, T>,
}

/// Labels, kind names and every row, collected eagerly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSet<T> {
    pub labels: Vec<String>,
    pub types: Vec<String>,
    pub rows: Vec<T>,
}

/// A query result: metadata plus a forward-only cursor.
///
/// The column plan is built from the metadata on first use and cached for
/// the lifetime of the result set. Cursor access is serialized internally;
/// iterators obtained from [`ResultSet::stream_rows`] share the cursor with
/// the result set, so [`ResultSet::close`] invalidates them.
pub struct ResultSet<M, C> {
    metadata: M,
    cursor: SharedCursor<C>,
    plan: OnceCell<Arc<ColumnPlan>>,
}

impl<M, C> ResultSet<M, C>
where
    M: ResultSetMetadata,
    C: Cursor,
{
    pub fn new(metadata: M, cursor: C) -> Self {
        Self {
            metadata,
            cursor: Arc::new(Mutex::new(CursorState {
                cursor,
                closed: false,
            })),
            plan: OnceCell::new(),
        }
    }

    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    /// The column plan, built on first call and cached afterwards.
    pub async fn column_plan(&self) -> Result<Arc<ColumnPlan>> {
        let plan = self
            .plan
            .get_or_try_init(|| async { build_plan(&self.metadata, None).await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(plan))
    }

    /// Labels, kind names and a lazy iterator over the remaining rows.
    ///
    /// No row is read until the iterator is advanced.
    pub async fn stream_rows<T: RowTarget>(
        &self,
        hydration: Hydration<T>,
    ) -> Result<RowStream<C, T>> {
        let base = self.column_plan().await?;
        let plan = match hydration.effective_rewrite() {
            Some(rewrite) => Arc::new(base.relabel(&rewrite)),
            None => base,
        };

        Ok(RowStream {
            labels: plan.labels(),
            types: plan.type_names(),
            rows: RowIterator::new(Arc::clone(&self.cursor), plan, hydration),
        })
    }

    /// Like [`ResultSet::stream_rows`] but reads every remaining row.
    ///
    /// Memory use grows with the row count. On error no partial rows are
    /// returned.
    pub async fn collect_rows<T: RowTarget>(&self, hydration: Hydration<T>) -> Result<RowSet<T>> {
        let RowStream {
            labels,
            types,
            rows,
        } = self.stream_rows(hydration).await?;
        let rows = rows.collect::<Result<Vec<T>>>()?;
        debug!("Collected {} rows with {} columns", rows.len(), labels.len());
        Ok(RowSet {
            labels,
            types,
            rows,
        })
    }

    /// Only the rows of [`ResultSet::collect_rows`].
    pub async fn collect_array<T: RowTarget>(&self, hydration: Hydration<T>) -> Result<Vec<T>> {
        Ok(self.collect_rows(hydration).await?.rows)
    }

    /// Close the underlying cursor.
    ///
    /// Outstanding iterators fail with a cursor error on their next advance.
    /// Whether closing twice is an error is decided by the cursor.
    pub fn close(&self) -> Result<()> {
        let mut state = lock_cursor(&self.cursor)?;
        state.closed = true;
        state
            .cursor
            .close()
            .map_err(|e| Error::cursor_with_source("failed to close cursor", e))?;
        debug!("Closed result set cursor");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        lock_cursor(&self.cursor).map_or(true, |state| state.closed)
    }

    /// Holdability reported by the cursor.
    pub fn holdability(&self) -> Result<Holdability> {
        let state = lock_cursor(&self.cursor)?;
        let code = state
            .cursor
            .holdability()
            .map_err(|e| Error::cursor_with_source("failed to read holdability", e))?;
        Holdability::from_code(code)
            .map_err(|e| Error::cursor_with_source("unrecognized holdability", Box::new(e)))
    }
}

impl<M, C> std::fmt::Debug for ResultSet<M, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSet")
            .field("plan", &self.plan.get())
            .finish_non_exhaustive()
    }
}
