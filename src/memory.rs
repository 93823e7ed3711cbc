//! In-memory metadata and cursor collaborators.
//!
//! `MemoryCursor` behaves like a typical driver cursor: the primitive
//! integer accessor reads NULL as `0`, every call fails after `close`, and
//! advancing past the end marker is an error. Useful for adapting rows that
//! were fetched elsewhere and for exercising the adapter in tests.

use crate::cursor::Cursor;
use crate::error::DriverResult;
use crate::metadata::ResultSetMetadata;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sql_types::{Holdability, RowValue, SqlTypeId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Misuse or injected failure of an in-memory collaborator.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("cursor is closed")]
    Closed,
    #[error("cursor is not positioned on a row")]
    NoCurrentRow,
    #[error("cursor advanced past the end of the result")]
    PastEnd,
    #[error("column {position} out of range (1..={count})")]
    ColumnOutOfRange { position: usize, count: usize },
    #[error("cannot read {value:?} at column {position} with the {accessor} accessor")]
    TypeMismatch {
        position: usize,
        accessor: &'static str,
        value: RowValue,
    },
    #[error("injected failure: {0}")]
    Injected(String),
}

/// Number of calls made against a [`MemoryMetadata`].
#[derive(Debug, Default)]
pub struct MetadataCalls {
    pub column_count: AtomicUsize,
    pub column_label: AtomicUsize,
    pub column_type: AtomicUsize,
}

impl MetadataCalls {
    pub fn total(&self) -> usize {
        self.column_count.load(Ordering::SeqCst)
            + self.column_label.load(Ordering::SeqCst)
            + self.column_type.load(Ordering::SeqCst)
    }
}

/// Metadata backed by a list of `(label, type code)` pairs.
#[derive(Debug, Clone)]
pub struct MemoryMetadata {
    columns: Vec<(String, SqlTypeId)>,
    calls: Arc<MetadataCalls>,
    fail_label_at: Option<usize>,
    fail_count: bool,
    reverse_completion: bool,
}

impl MemoryMetadata {
    pub fn new<L: Into<String>>(columns: Vec<(L, SqlTypeId)>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|(label, ty)| (label.into(), ty))
                .collect(),
            calls: Arc::new(MetadataCalls::default()),
            fail_label_at: None,
            fail_count: false,
            reverse_completion: false,
        }
    }

    /// Fail the label lookup of the column at `position`.
    pub fn fail_label_at(mut self, position: usize) -> Self {
        self.fail_label_at = Some(position);
        self
    }

    /// Fail the column count lookup.
    pub fn fail_count(mut self) -> Self {
        self.fail_count = true;
        self
    }

    /// Make label lookups for later columns complete before earlier ones.
    pub fn reverse_completion(mut self) -> Self {
        self.reverse_completion = true;
        self
    }

    /// Shared call counters, still readable after the metadata is moved.
    pub fn calls(&self) -> Arc<MetadataCalls> {
        Arc::clone(&self.calls)
    }

    fn column(&self, position: usize) -> DriverResult<&(String, SqlTypeId)> {
        position
            .checked_sub(1)
            .and_then(|idx| self.columns.get(idx))
            .ok_or_else(|| {
                MemoryError::ColumnOutOfRange {
                    position,
                    count: self.columns.len(),
                }
                .into()
            })
    }
}

#[async_trait]
impl ResultSetMetadata for MemoryMetadata {
    async fn column_count(&self) -> DriverResult<usize> {
        self.calls.column_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_count {
            return Err(MemoryError::Injected("column count unavailable".to_string()).into());
        }
        Ok(self.columns.len())
    }

    async fn column_label(&self, position: usize) -> DriverResult<String> {
        self.calls.column_label.fetch_add(1, Ordering::SeqCst);
        if self.reverse_completion {
            for _ in position..=self.columns.len() {
                tokio::task::yield_now().await;
            }
        }
        if self.fail_label_at == Some(position) {
            return Err(MemoryError::Injected(format!("no label for column {position}")).into());
        }
        Ok(self.column(position)?.0.clone())
    }

    async fn column_type(&self, position: usize) -> DriverResult<SqlTypeId> {
        self.calls.column_type.fetch_add(1, Ordering::SeqCst);
        Ok(self.column(position)?.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    OnRow(usize),
    AfterLast,
    Closed,
}

/// Forward-only cursor over rows held in memory.
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    rows: Vec<Vec<RowValue>>,
    position: Position,
    advances: usize,
    fail_advance_at: Option<usize>,
    holdability: i32,
}

impl MemoryCursor {
    pub fn new(rows: Vec<Vec<RowValue>>) -> Self {
        Self {
            rows,
            position: Position::BeforeFirst,
            advances: 0,
            fail_advance_at: None,
            holdability: Holdability::HOLD_CURSORS_OVER_COMMIT,
        }
    }

    /// Fail the `n`-th call to `advance` (1-based).
    pub fn fail_advance_at(mut self, n: usize) -> Self {
        self.fail_advance_at = Some(n);
        self
    }

    pub fn with_holdability(mut self, code: i32) -> Self {
        self.holdability = code;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.position == Position::Closed
    }

    fn cell(&self, position: usize) -> DriverResult<&RowValue> {
        let row = match self.position {
            Position::Closed => return Err(MemoryError::Closed.into()),
            Position::OnRow(idx) => &self.rows[idx],
            Position::BeforeFirst | Position::AfterLast => {
                return Err(MemoryError::NoCurrentRow.into())
            }
        };
        position
            .checked_sub(1)
            .and_then(|idx| row.get(idx))
            .ok_or_else(|| {
                MemoryError::ColumnOutOfRange {
                    position,
                    count: row.len(),
                }
                .into()
            })
    }

    fn read<T>(
        &self,
        position: usize,
        accessor: &'static str,
        convert: impl FnOnce(&RowValue) -> Option<T>,
    ) -> DriverResult<Option<T>> {
        let value = self.cell(position)?;
        if value.is_null() {
            return Ok(None);
        }
        convert(value).map(Some).ok_or_else(|| {
            MemoryError::TypeMismatch {
                position,
                accessor,
                value: value.clone(),
            }
            .into()
        })
    }
}

impl Cursor for MemoryCursor {
    fn advance(&mut self) -> DriverResult<bool> {
        if self.position == Position::Closed {
            return Err(MemoryError::Closed.into());
        }
        self.advances += 1;
        if self.fail_advance_at == Some(self.advances) {
            return Err(MemoryError::Injected(format!("advance #{} failed", self.advances)).into());
        }
        let next = match self.position {
            Position::BeforeFirst => 0,
            Position::OnRow(idx) => idx + 1,
            Position::AfterLast => return Err(MemoryError::PastEnd.into()),
            Position::Closed => return Err(MemoryError::Closed.into()),
        };
        if next < self.rows.len() {
            self.position = Position::OnRow(next);
            Ok(true)
        } else {
            self.position = Position::AfterLast;
            Ok(false)
        }
    }

    fn bool_at(&self, position: usize) -> DriverResult<Option<bool>> {
        self.read(position, "bool", |v| match v {
            RowValue::Bool(b) => Some(*b),
            RowValue::Short(i) => Some(*i != 0),
            RowValue::Int(i) => Some(*i != 0),
            _ => None,
        })
    }

    fn short_at(&self, position: usize) -> DriverResult<Option<i16>> {
        self.read(position, "short", |v| match v {
            RowValue::Short(i) => Some(*i),
            RowValue::Int(i) => i16::try_from(*i).ok(),
            _ => None,
        })
    }

    fn int_at(&self, position: usize) -> DriverResult<i32> {
        let value = self.read(position, "int", |v| match v {
            RowValue::Int(i) => Some(*i),
            RowValue::Short(i) => Some(i32::from(*i)),
            RowValue::Long(i) => i32::try_from(*i).ok(),
            _ => None,
        })?;
        Ok(value.unwrap_or(0))
    }

    fn string_at(&self, position: usize) -> DriverResult<Option<String>> {
        self.read(position, "string", |v| match v {
            RowValue::String(s) | RowValue::DecimalText(s) => Some(s.clone()),
            RowValue::Bytes(_) => None,
            other => match other.to_json() {
                serde_json::Value::String(s) => Some(s),
                json => Some(json.to_string()),
            },
        })
    }

    fn float_at(&self, position: usize) -> DriverResult<Option<f32>> {
        self.read(position, "float", |v| match v {
            RowValue::Float(f) => Some(*f),
            RowValue::Double(f) => Some(*f as f32),
            RowValue::Short(i) => Some(f32::from(*i)),
            RowValue::Int(i) => Some(*i as f32),
            _ => None,
        })
    }

    fn double_at(&self, position: usize) -> DriverResult<Option<f64>> {
        self.read(position, "double", |v| match v {
            RowValue::Double(f) => Some(*f),
            RowValue::Float(f) => Some(f64::from(*f)),
            RowValue::Short(i) => Some(f64::from(*i)),
            RowValue::Int(i) => Some(f64::from(*i)),
            _ => None,
        })
    }

    fn bytes_at(&self, position: usize) -> DriverResult<Option<Vec<u8>>> {
        self.read(position, "bytes", |v| match v {
            RowValue::Bytes(b) => Some(b.clone()),
            RowValue::String(s) => Some(s.as_bytes().to_vec()),
            _ => None,
        })
    }

    fn decimal_at(&self, position: usize) -> DriverResult<Option<String>> {
        self.read(position, "decimal", |v| match v {
            RowValue::Decimal(d) => Some(d.to_string()),
            RowValue::DecimalText(s) | RowValue::String(s) => Some(s.clone()),
            RowValue::Short(i) => Some(i.to_string()),
            RowValue::Int(i) => Some(i.to_string()),
            RowValue::Long(i) => Some(i.to_string()),
            _ => None,
        })
    }

    fn date_at(&self, position: usize) -> DriverResult<Option<NaiveDate>> {
        self.read(position, "date", |v| match v {
            RowValue::Date(d) => Some(*d),
            RowValue::Timestamp(ts) => Some(ts.date()),
            _ => None,
        })
    }

    fn time_at(&self, position: usize) -> DriverResult<Option<NaiveTime>> {
        self.read(position, "time", |v| match v {
            RowValue::Time(t) => Some(*t),
            RowValue::Timestamp(ts) => Some(ts.time()),
            _ => None,
        })
    }

    fn timestamp_at(&self, position: usize) -> DriverResult<Option<NaiveDateTime>> {
        self.read(position, "timestamp", |v| match v {
            RowValue::Timestamp(ts) => Some(*ts),
            RowValue::Date(d) => d.and_hms_opt(0, 0, 0),
            _ => None,
        })
    }

    fn object_at(&self, position: usize) -> DriverResult<Option<RowValue>> {
        let value = self.cell(position)?;
        Ok((!value.is_null()).then(|| value.clone()))
    }

    /// Closing twice is allowed.
    fn close(&mut self) -> DriverResult<()> {
        self.position = Position::Closed;
        Ok(())
    }

    fn holdability(&self) -> DriverResult<i32> {
        if self.position == Position::Closed {
            return Err(MemoryError::Closed.into());
        }
        Ok(self.holdability)
    }
}
