//! Per-column value coercion.
//!
//! Accessor selection is a `match` on [`TargetKind`]; the null policy for
//! each kind lives here.

use crate::cursor::Cursor;
use crate::error::{BoxError, Error, Result};
use crate::options::{IntNullProbe, StreamOptions};
use crate::plan::ColumnDescriptor;
use sql_types::convert::{date_to_value, decimal_from_text, time_to_value, timestamp_to_value};
use sql_types::{ConversionError, RowValue, TargetKind, TemporalMode};

/// Reads one column of the cursor's current row as a [`RowValue`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RowCoercer {
    int_null_probe: IntNullProbe,
    temporal: TemporalMode,
}

impl RowCoercer {
    pub fn new(options: &StreamOptions) -> Self {
        Self {
            int_null_probe: options.int_null_probe,
            temporal: options.temporal,
        }
    }

    /// Coerce the column described by `column` on the current row.
    ///
    /// - Date/Time/Timestamp and BigDecimal: absent values become null,
    ///   present ones go through [`sql_types::convert`].
    /// - Int: the untyped accessor is probed first, see [`IntNullProbe`].
    /// - Everything else is passed through, null included.
    pub fn coerce<C>(&self, cursor: &C, column: &ColumnDescriptor) -> Result<RowValue>
    where
        C: Cursor + ?Sized,
    {
        let pos = column.position;
        let value = match column.kind {
            TargetKind::Date => match cursor
                .date_at(pos)
                .map_err(|e| accessor_error(column, "date", e))?
            {
                Some(date) => {
                    date_to_value(date, self.temporal).map_err(|e| conversion_error(column, e))?
                }
                None => RowValue::Null,
            },
            TargetKind::Time => match cursor
                .time_at(pos)
                .map_err(|e| accessor_error(column, "time", e))?
            {
                Some(time) => {
                    time_to_value(time, self.temporal).map_err(|e| conversion_error(column, e))?
                }
                None => RowValue::Null,
            },
            TargetKind::Timestamp => match cursor
                .timestamp_at(pos)
                .map_err(|e| accessor_error(column, "timestamp", e))?
            {
                Some(ts) => timestamp_to_value(ts, self.temporal)
                    .map_err(|e| conversion_error(column, e))?,
                None => RowValue::Null,
            },
            TargetKind::BigDecimal => match cursor
                .decimal_at(pos)
                .map_err(|e| accessor_error(column, "decimal", e))?
            {
                Some(text) => decimal_from_text(&text).map_err(|e| conversion_error(column, e))?,
                None => RowValue::Null,
            },
            TargetKind::Int => {
                let probe = cursor
                    .object_at(pos)
                    .map_err(|e| accessor_error(column, "object", e))?;
                let probe_is_null = matches!(probe, None | Some(RowValue::Null));
                let output_null = match self.int_null_probe {
                    IntNullProbe::SqlNull => probe_is_null,
                    IntNullProbe::NonNullIsNull => !probe_is_null,
                };
                if output_null {
                    RowValue::Null
                } else {
                    cursor
                        .int_at(pos)
                        .map_err(|e| accessor_error(column, "int", e))?
                        .into()
                }
            }
            TargetKind::Boolean => cursor
                .bool_at(pos)
                .map_err(|e| accessor_error(column, "bool", e))?
                .into(),
            TargetKind::Short => cursor
                .short_at(pos)
                .map_err(|e| accessor_error(column, "short", e))?
                .into(),
            TargetKind::String => cursor
                .string_at(pos)
                .map_err(|e| accessor_error(column, "string", e))?
                .into(),
            TargetKind::Float => cursor
                .float_at(pos)
                .map_err(|e| accessor_error(column, "float", e))?
                .into(),
            TargetKind::Double => cursor
                .double_at(pos)
                .map_err(|e| accessor_error(column, "double", e))?
                .into(),
            TargetKind::Bytes => cursor
                .bytes_at(pos)
                .map_err(|e| accessor_error(column, "bytes", e))?
                .into(),
        };
        Ok(value)
    }
}

fn accessor_error(column: &ColumnDescriptor, accessor: &str, source: BoxError) -> Error {
    Error::coercion(
        column.position,
        &column.label,
        format!("{accessor} accessor failed for {} column", column.kind),
        Some(source),
    )
}

fn conversion_error(column: &ColumnDescriptor, source: ConversionError) -> Error {
    Error::coercion(
        column.position,
        &column.label,
        source.to_string(),
        Some(Box::new(source)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCursor;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sql_types::SqlTypeId;
    use std::str::FromStr;

    fn column(position: usize, label: &str, sql_type: SqlTypeId) -> ColumnDescriptor {
        ColumnDescriptor::new(position, label, sql_type)
    }

    fn on_first_row(row: Vec<RowValue>) -> MemoryCursor {
        let mut cursor = MemoryCursor::new(vec![row]);
        assert!(cursor.advance().unwrap());
        cursor
    }

    #[test]
    fn test_int_null_probe_sql_null() {
        let coercer = RowCoercer::default();
        let cursor = on_first_row(vec![RowValue::Null, RowValue::Int(0), RowValue::Int(7)]);

        let id = column(1, "id", SqlTypeId::INTEGER);
        assert_eq!(cursor.int_at(1).unwrap(), 0);
        assert_eq!(coercer.coerce(&cursor, &id).unwrap(), RowValue::Null);

        let zero = column(2, "zero", SqlTypeId::INTEGER);
        assert_eq!(coercer.coerce(&cursor, &zero).unwrap(), RowValue::Int(0));

        let seven = column(3, "seven", SqlTypeId::INTEGER);
        assert_eq!(coercer.coerce(&cursor, &seven).unwrap(), RowValue::Int(7));
    }

    #[test]
    fn test_int_null_probe_non_null_is_null() {
        let options = StreamOptions {
            int_null_probe: IntNullProbe::NonNullIsNull,
            ..Default::default()
        };
        let coercer = RowCoercer::new(&options);
        // Object accessor sees a value while the primitive accessor reads 0.
        let cursor = on_first_row(vec![RowValue::Int(0), RowValue::Null]);

        let marked = column(1, "marked", SqlTypeId::INTEGER);
        assert_eq!(coercer.coerce(&cursor, &marked).unwrap(), RowValue::Null);

        let unmarked = column(2, "unmarked", SqlTypeId::INTEGER);
        assert_eq!(coercer.coerce(&cursor, &unmarked).unwrap(), RowValue::Int(0));
    }

    #[test]
    fn test_null_temporal_and_decimal() {
        let coercer = RowCoercer::default();
        let cursor = on_first_row(vec![RowValue::Null; 4]);
        for (pos, ty) in [
            (1, SqlTypeId::DATE),
            (2, SqlTypeId::TIME),
            (3, SqlTypeId::TIMESTAMP),
            (4, SqlTypeId::NUMERIC),
        ] {
            let value = coercer.coerce(&cursor, &column(pos, "c", ty)).unwrap();
            assert_eq!(value, RowValue::Null, "{ty}");
        }
    }

    #[test]
    fn test_decimal_precision_preserved() {
        let coercer = RowCoercer::default();
        let cursor = on_first_row(vec![
            RowValue::Decimal(Decimal::from_str("0.1000000000000000055511").unwrap()),
            RowValue::DecimalText("98765432109876543210987654321.5".to_string()),
        ]);

        let exact = coercer
            .coerce(&cursor, &column(1, "a", SqlTypeId::DECIMAL))
            .unwrap();
        assert_eq!(exact.to_json(), serde_json::json!("0.1000000000000000055511"));

        let wide = coercer
            .coerce(&cursor, &column(2, "b", SqlTypeId::NUMERIC))
            .unwrap();
        assert_eq!(
            wide,
            RowValue::DecimalText("98765432109876543210987654321.5".to_string())
        );
    }

    #[test]
    fn test_temporal_modes() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 3).unwrap();
        let cursor = on_first_row(vec![RowValue::Date(date)]);
        let col = column(1, "d", SqlTypeId::DATE);

        let native = RowCoercer::default().coerce(&cursor, &col).unwrap();
        assert_eq!(native, RowValue::Date(date));

        let options = StreamOptions {
            temporal: TemporalMode::EpochMillis,
            ..Default::default()
        };
        let millis = RowCoercer::new(&options).coerce(&cursor, &col).unwrap();
        assert_eq!(millis, RowValue::Long(2 * 86_400_000));
    }

    #[test]
    fn test_passthrough_kinds() {
        let coercer = RowCoercer::default();
        let cursor = on_first_row(vec![
            RowValue::Bool(true),
            RowValue::Short(-3),
            RowValue::String("9007199254740993".to_string()),
            RowValue::Float(1.25),
            RowValue::Double(-0.5),
            RowValue::Bytes(vec![1, 2, 3]),
            RowValue::Null,
        ]);
        let expected = [
            (SqlTypeId::BIT, RowValue::Bool(true)),
            (SqlTypeId::SMALLINT, RowValue::Short(-3)),
            (SqlTypeId::BIGINT, RowValue::String("9007199254740993".to_string())),
            (SqlTypeId::REAL, RowValue::Float(1.25)),
            (SqlTypeId::DOUBLE, RowValue::Double(-0.5)),
            (SqlTypeId::VARBINARY, RowValue::Bytes(vec![1, 2, 3])),
            (SqlTypeId::VARCHAR, RowValue::Null),
        ];
        for (idx, (ty, value)) in expected.into_iter().enumerate() {
            let got = coercer.coerce(&cursor, &column(idx + 1, "c", ty)).unwrap();
            assert_eq!(got, value, "{ty}");
        }
    }

    #[test]
    fn test_accessor_failure_tagged_with_column() {
        let coercer = RowCoercer::default();
        let cursor = on_first_row(vec![RowValue::String("not a date".to_string())]);
        let err = coercer
            .coerce(&cursor, &column(1, "born_on", SqlTypeId::DATE))
            .unwrap_err();
        assert_eq!(err.column(), Some((1, "born_on")));
    }

    #[test]
    fn test_malformed_decimal_is_coercion_error() {
        let coercer = RowCoercer::default();
        let cursor = on_first_row(vec![RowValue::String("12,50".to_string())]);
        let err = coercer
            .coerce(&cursor, &column(1, "price", SqlTypeId::DECIMAL))
            .unwrap_err();
        assert!(err.is_coercion());
        assert_eq!(err.column(), Some((1, "price")));
    }
}
