//! Forward-only cursor collaborator.

use crate::error::DriverResult;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sql_types::{Holdability, RowValue};

/// Blocking, forward-only handle over a SQL result.
///
/// Every call may block on the data source and may fail on misuse, most
/// notably any call after [`Cursor::close`]. Accessors read the current row
/// at a 1-based column position.
pub trait Cursor: Send {
    /// Move to the next row. `Ok(false)` once the rows are exhausted.
    fn advance(&mut self) -> DriverResult<bool>;

    fn bool_at(&self, position: usize) -> DriverResult<Option<bool>>;

    fn short_at(&self, position: usize) -> DriverResult<Option<i16>>;

    /// Primitive integer read. Drivers commonly report SQL NULL as `0` here,
    /// which is why INTEGER columns are probed through [`Cursor::object_at`]
    /// first.
    fn int_at(&self, position: usize) -> DriverResult<i32>;

    fn string_at(&self, position: usize) -> DriverResult<Option<String>>;

    fn float_at(&self, position: usize) -> DriverResult<Option<f32>>;

    fn double_at(&self, position: usize) -> DriverResult<Option<f64>>;

    fn bytes_at(&self, position: usize) -> DriverResult<Option<Vec<u8>>>;

    /// Decimal in the driver's textual form, e.g. `"-1234.5600"`.
    fn decimal_at(&self, position: usize) -> DriverResult<Option<String>>;

    fn date_at(&self, position: usize) -> DriverResult<Option<NaiveDate>>;

    fn time_at(&self, position: usize) -> DriverResult<Option<NaiveTime>>;

    fn timestamp_at(&self, position: usize) -> DriverResult<Option<NaiveDateTime>>;

    /// Untyped read of the column; `None` for SQL NULL.
    fn object_at(&self, position: usize) -> DriverResult<Option<RowValue>>;

    /// Release the cursor. Whether a second close is tolerated is up to the
    /// implementation.
    fn close(&mut self) -> DriverResult<()>;

    /// Holdability code as reported by the driver.
    fn holdability(&self) -> DriverResult<i32> {
        Ok(Holdability::HOLD_CURSORS_OVER_COMMIT)
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn advance(&mut self) -> DriverResult<bool> {
        (**self).advance()
    }

    fn bool_at(&self, position: usize) -> DriverResult<Option<bool>> {
        (**self).bool_at(position)
    }

    fn short_at(&self, position: usize) -> DriverResult<Option<i16>> {
        (**self).short_at(position)
    }

    fn int_at(&self, position: usize) -> DriverResult<i32> {
        (**self).int_at(position)
    }

    fn string_at(&self, position: usize) -> DriverResult<Option<String>> {
        (**self).string_at(position)
    }

    fn float_at(&self, position: usize) -> DriverResult<Option<f32>> {
        (**self).float_at(position)
    }

    fn double_at(&self, position: usize) -> DriverResult<Option<f64>> {
        (**self).double_at(position)
    }

    fn bytes_at(&self, position: usize) -> DriverResult<Option<Vec<u8>>> {
        (**self).bytes_at(position)
    }

    fn decimal_at(&self, position: usize) -> DriverResult<Option<String>> {
        (**self).decimal_at(position)
    }

    fn date_at(&self, position: usize) -> DriverResult<Option<NaiveDate>> {
        (**self).date_at(position)
    }

    fn time_at(&self, position: usize) -> DriverResult<Option<NaiveTime>> {
        (**self).time_at(position)
    }

    fn timestamp_at(&self, position: usize) -> DriverResult<Option<NaiveDateTime>> {
        (**self).timestamp_at(position)
    }

    fn object_at(&self, position: usize) -> DriverResult<Option<RowValue>> {
        (**self).object_at(position)
    }

    fn close(&mut self) -> DriverResult<()> {
        (**self).close()
    }

    fn holdability(&self) -> DriverResult<i32> {
        (**self).holdability()
    }
}
