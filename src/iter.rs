//! Lazy, single-pass row iterator.

use crate::coerce::RowCoercer;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::options::Hydration;
use crate::plan::ColumnPlan;
use crate::row::RowTarget;
use sql_types::RowValue;
use std::iter::FusedIterator;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A cursor plus the adapter's own record of whether it was closed.
#[derive(Debug)]
pub(crate) struct CursorState<C> {
    pub(crate) cursor: C,
    pub(crate) closed: bool,
}

pub(crate) type SharedCursor<C> = Arc<Mutex<CursorState<C>>>;

pub(crate) fn lock_cursor<C>(cursor: &SharedCursor<C>) -> Result<MutexGuard<'_, CursorState<C>>> {
    cursor
        .lock()
        .map_err(|_| Error::cursor("cursor lock poisoned by a panicking reader"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IterState {
    Ready,
    Exhausted,
    Failed,
}

/// Produces one hydrated row per cursor advance.
///
/// Once the cursor reports no more rows the iterator is exhausted and keeps
/// returning `None` without touching the cursor again. An advance or
/// coercion error is returned once; after it the iterator also returns
/// `None`.
pub struct RowIterator<C, T> {
    cursor: SharedCursor<C>,
    plan: Arc<ColumnPlan>,
    hydration: Hydration<T>,
    coercer: RowCoercer,
    state: IterState,
    rows_read: u64,
}

impl<C: Cursor, T: RowTarget> RowIterator<C, T> {
    pub(crate) fn new(
        cursor: SharedCursor<C>,
        plan: Arc<ColumnPlan>,
        hydration: Hydration<T>,
    ) -> Self {
        let coercer = RowCoercer::new(hydration.stream_options());
        Self {
            cursor,
            plan,
            hydration,
            coercer,
            state: IterState::Ready,
            rows_read: 0,
        }
    }

    /// Advance once. `Ok(None)` is the end marker, returned again on every
    /// later call.
    pub fn next_row(&mut self) -> Result<Option<T>> {
        if self.state != IterState::Ready {
            return Ok(None);
        }
        match self.fetch() {
            Ok(Some(row)) => {
                self.rows_read += 1;
                Ok(Some(row))
            }
            Ok(None) => {
                self.state = IterState::Exhausted;
                debug!("Cursor exhausted after {} rows", self.rows_read);
                Ok(None)
            }
            Err(e) => {
                self.state = IterState::Failed;
                Err(e)
            }
        }
    }

    /// Rows produced so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub fn is_exhausted(&self) -> bool {
        self.state != IterState::Ready
    }

    pub fn plan(&self) -> &ColumnPlan {
        &self.plan
    }

    fn fetch(&mut self) -> Result<Option<T>> {
        let Some(values) = self.read_values()? else {
            return Ok(None);
        };

        // Caller code runs with the cursor lock released.
        let mut target = self.hydration.build();
        for (column, value) in self.plan.columns().iter().zip(values) {
            target.set_field(&column.label, value);
        }
        Ok(Some(target))
    }

    /// Advance and coerce every column of the new row under the cursor lock.
    fn read_values(&self) -> Result<Option<Vec<RowValue>>> {
        let mut state = lock_cursor(&self.cursor)?;
        if state.closed {
            return Err(Error::cursor("cursor is closed"));
        }

        let has_row = state
            .cursor
            .advance()
            .map_err(|e| Error::cursor_with_source("failed to advance cursor", e))?;
        if !has_row {
            return Ok(None);
        }

        self.plan
            .columns()
            .iter()
            .map(|column| self.coercer.coerce(&state.cursor, column))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

impl<C: Cursor, T: RowTarget> Iterator for RowIterator<C, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl<C: Cursor, T: RowTarget> FusedIterator for RowIterator<C, T> {}

impl<C, T> std::fmt::Debug for RowIterator<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowIterator")
            .field("columns", &self.plan.len())
            .field("state", &self.state)
            .field("rows_read", &self.rows_read)
            .finish()
    }
}
