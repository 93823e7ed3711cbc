//! Integration tests for the ResultSet facade
//!
//! These drive the facade end to end through the in-memory metadata and
//! cursor collaborators.

use anyhow::Result;
use serde_json::json;
use sql_rowstream::memory::{MemoryCursor, MemoryMetadata};
use sql_rowstream::{
    Cursor, Hydration, IntNullProbe, ResultSet, Row, RowTarget, RowValue, SqlTypeId,
    StreamOptions, TemporalMode,
};
use std::collections::HashMap;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn id_name_result(rows: Vec<Vec<RowValue>>) -> ResultSet<MemoryMetadata, MemoryCursor> {
    let metadata = MemoryMetadata::new(vec![
        ("id", SqlTypeId::INTEGER),
        ("name", SqlTypeId::VARCHAR),
    ]);
    ResultSet::new(metadata, MemoryCursor::new(rows))
}

fn three_rows() -> Vec<Vec<RowValue>> {
    vec![
        vec![RowValue::Int(1), RowValue::from("a")],
        vec![RowValue::Null, RowValue::from("b")],
        vec![RowValue::Int(3), RowValue::Null],
    ]
}

#[tokio::test]
async fn test_collect_array_id_name() -> Result<()> {
    init_logging();
    let result = id_name_result(three_rows());

    let rows = result.collect_array(Hydration::record()).await?;
    let rendered: Vec<_> = rows.iter().map(Row::to_json).collect();
    assert_eq!(
        rendered,
        vec![
            json!({"id": 1, "name": "a"}),
            json!({"id": null, "name": "b"}),
            json!({"id": 3, "name": null}),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_real_zero_is_not_null() -> Result<()> {
    let result = id_name_result(vec![
        vec![RowValue::Int(0), RowValue::from("zero")],
        vec![RowValue::Null, RowValue::from("null")],
    ]);

    let rows = result.collect_array(Hydration::record()).await?;
    assert_eq!(rows[0].get("id"), Some(&RowValue::Int(0)));
    assert_eq!(rows[1].get("id"), Some(&RowValue::Null));
    Ok(())
}

#[tokio::test]
async fn test_non_null_probe_policy_yields_null() -> Result<()> {
    // Object accessor sees a value while the primitive accessor reads 0.
    let result = id_name_result(vec![vec![RowValue::Int(0), RowValue::from("marker")]]);

    let rows = result
        .collect_array(Hydration::record().int_null_probe(IntNullProbe::NonNullIsNull))
        .await?;
    assert_eq!(rows[0].get("id"), Some(&RowValue::Null));
    assert_eq!(rows[0].get("name"), Some(&RowValue::from("marker")));
    Ok(())
}

#[tokio::test]
async fn test_stream_yields_k_rows_then_end_marker() -> Result<()> {
    let result = id_name_result(three_rows());

    let mut stream = result.stream_rows(Hydration::record()).await?;
    assert_eq!(stream.labels, vec!["id", "name"]);
    assert_eq!(stream.types, vec!["Int", "String"]);

    let mut produced = 0;
    while let Some(row) = stream.rows.next_row()? {
        assert_eq!(row.len(), 2);
        produced += 1;
    }
    assert_eq!(produced, 3);

    for _ in 0..5 {
        assert!(stream.rows.next_row()?.is_none());
        assert!(stream.rows.next().is_none());
    }
    assert_eq!(stream.rows.rows_read(), 3);
    Ok(())
}

#[tokio::test]
async fn test_stream_reads_lazily() -> Result<()> {
    // The second advance fails; taking only the first row never reaches it.
    let metadata = MemoryMetadata::new(vec![("n", SqlTypeId::INTEGER)]);
    let cursor = MemoryCursor::new(vec![vec![RowValue::Int(1)], vec![RowValue::Int(2)]])
        .fail_advance_at(2);
    let result = ResultSet::new(metadata, cursor);

    let stream = result.stream_rows(Hydration::record()).await?;
    let first: Vec<Row> = stream.rows.take(1).collect::<sql_rowstream::Result<_>>()?;
    assert_eq!(first[0].get("n"), Some(&RowValue::Int(1)));
    Ok(())
}

#[tokio::test]
async fn test_collect_rows_empty_cursor_keeps_metadata() -> Result<()> {
    let result = id_name_result(vec![]);

    let set = result.collect_rows(Hydration::record()).await?;
    assert_eq!(set.labels, vec!["id", "name"]);
    assert_eq!(set.types, vec!["Int", "String"]);
    assert!(set.rows.is_empty());
    assert_eq!(
        serde_json::to_value(&set)?,
        json!({"labels": ["id", "name"], "types": ["Int", "String"], "rows": []})
    );
    Ok(())
}

#[tokio::test]
async fn test_advance_after_close_is_cursor_error() -> Result<()> {
    let result = id_name_result(three_rows());

    let mut stream = result.stream_rows(Hydration::record()).await?;
    assert!(stream.rows.next_row()?.is_some());

    result.close()?;
    assert!(result.is_closed());

    let err = stream.rows.next_row().unwrap_err();
    assert!(err.is_cursor(), "unexpected error: {err}");
    assert!(stream.rows.next_row()?.is_none());

    let mut late = result.stream_rows(Hydration::record()).await?;
    assert!(late.rows.next_row().unwrap_err().is_cursor());
    Ok(())
}

#[tokio::test]
async fn test_collect_failure_discards_partial_rows() {
    let metadata = MemoryMetadata::new(vec![("n", SqlTypeId::INTEGER)]);
    let cursor = MemoryCursor::new(vec![
        vec![RowValue::Int(1)],
        vec![RowValue::Int(2)],
        vec![RowValue::Int(3)],
    ])
    .fail_advance_at(3);
    let result = ResultSet::new(metadata, cursor);

    let err = result
        .collect_array(Hydration::record())
        .await
        .unwrap_err();
    assert!(err.is_cursor());
}

#[tokio::test]
async fn test_coercion_error_carries_column() {
    let metadata = MemoryMetadata::new(vec![
        ("id", SqlTypeId::INTEGER),
        ("amount", SqlTypeId::NUMERIC),
    ]);
    let cursor = MemoryCursor::new(vec![vec![RowValue::Int(1), RowValue::from("n/a")]]);
    let result = ResultSet::new(metadata, cursor);

    let err = result
        .collect_rows(Hydration::record())
        .await
        .unwrap_err();
    assert_eq!(err.column(), Some((2, "amount")));
}

#[tokio::test]
async fn test_metadata_queried_once_per_result() -> Result<()> {
    let metadata = MemoryMetadata::new(vec![
        ("user_id", SqlTypeId::INTEGER),
        ("created_at", SqlTypeId::TIMESTAMP),
        ("is_active", SqlTypeId::BIT),
    ]);
    let calls = metadata.calls();
    let result = ResultSet::new(metadata, MemoryCursor::new(vec![]));

    let plan = result.column_plan().await?;
    assert_eq!(plan.len(), 3);
    assert_eq!(calls.total(), 1 + 3 + 3);

    let plain = result.stream_rows(Hydration::record()).await?;
    let camel = result
        .stream_rows(Hydration::record().camelize(true))
        .await?;
    let _ = result.column_plan().await?;

    assert_eq!(calls.total(), 1 + 3 + 3);
    assert_eq!(plain.labels, vec!["user_id", "created_at", "is_active"]);
    assert_eq!(camel.labels, vec!["userId", "createdAt", "isActive"]);
    assert_eq!(camel.types, vec!["Int", "Timestamp", "Boolean"]);
    Ok(())
}

#[tokio::test]
async fn test_plan_order_independent_of_completion_order() -> Result<()> {
    let labels: Vec<String> = (1..=8).map(|i| format!("c{i}")).collect();
    let metadata = MemoryMetadata::new(
        labels
            .iter()
            .map(|l| (l.clone(), SqlTypeId::VARCHAR))
            .collect(),
    )
    .reverse_completion();
    let result = ResultSet::new(metadata, MemoryCursor::new(vec![]));

    let plan = result.column_plan().await?;
    assert_eq!(plan.labels(), labels);
    let positions: Vec<_> = plan.columns().iter().map(|c| c.position).collect();
    assert_eq!(positions, (1..=8).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
async fn test_metadata_failure_surfaces() {
    let result = ResultSet::new(
        MemoryMetadata::new(vec![("a", SqlTypeId::INTEGER)]).fail_count(),
        MemoryCursor::new(vec![]),
    );
    assert!(result.column_plan().await.unwrap_err().is_metadata());
    assert!(result
        .collect_array(Hydration::record())
        .await
        .unwrap_err()
        .is_metadata());
}

/// Caller-defined row shape filled field by field.
#[derive(Debug, Default, PartialEq)]
struct Account {
    id: Option<i32>,
    owner: Option<String>,
    extra: usize,
}

impl RowTarget for Account {
    fn set_field(&mut self, label: &str, value: RowValue) {
        match label {
            "accountId" => self.id = value.as_i32(),
            "ownerName" => self.owner = value.as_str().map(str::to_string),
            _ => self.extra += 1,
        }
    }
}

#[tokio::test]
async fn test_default_and_factory_hydration() -> Result<()> {
    let metadata = MemoryMetadata::new(vec![
        ("ACCOUNT_ID", SqlTypeId::INTEGER),
        ("owner_name", SqlTypeId::NVARCHAR),
        ("notes", SqlTypeId::CLOB),
    ]);
    let rows = vec![vec![
        RowValue::Int(42),
        RowValue::from("carol"),
        RowValue::from("vip"),
    ]];

    let result = ResultSet::new(metadata.clone(), MemoryCursor::new(rows.clone()));
    let accounts = result
        .collect_array(Hydration::<Account>::of().camelize(true))
        .await?;
    assert_eq!(
        accounts,
        vec![Account {
            id: Some(42),
            owner: Some("carol".to_string()),
            extra: 1,
        }]
    );

    let result = ResultSet::new(metadata, MemoryCursor::new(rows));
    let maps = result
        .collect_array(Hydration::with_factory(|| {
            let mut map = HashMap::new();
            map.insert("source".to_string(), RowValue::from("memory"));
            map
        }))
        .await?;
    assert_eq!(maps[0].get("ACCOUNT_ID"), Some(&RowValue::Int(42)));
    assert_eq!(maps[0].get("notes"), Some(&RowValue::from("vip")));
    assert_eq!(maps[0].get("source"), Some(&RowValue::from("memory")));
    Ok(())
}

#[tokio::test]
async fn test_all_kinds_through_facade() -> Result<()> {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
    let at = day.and_hms_opt(9, 30, 0).unwrap();
    let metadata = MemoryMetadata::new(vec![
        ("flag", SqlTypeId::BOOLEAN),
        ("tiny", SqlTypeId::TINYINT),
        ("big", SqlTypeId::BIGINT),
        ("ratio", SqlTypeId::FLOAT),
        ("score", SqlTypeId::DOUBLE),
        ("price", SqlTypeId::DECIMAL),
        ("born", SqlTypeId::DATE),
        ("alarm", SqlTypeId::TIME),
        ("seen", SqlTypeId::TIMESTAMP),
        ("blob", SqlTypeId::BLOB),
    ]);
    let cursor = MemoryCursor::new(vec![vec![
        RowValue::Bool(true),
        RowValue::Short(7),
        RowValue::from("9223372036854775807"),
        RowValue::Float(0.5),
        RowValue::Double(99.25),
        RowValue::Decimal(Decimal::new(1999, 2)),
        RowValue::Date(day),
        RowValue::Time(at.time()),
        RowValue::Timestamp(at),
        RowValue::Bytes(vec![0x00, 0xff]),
    ]]);
    let result = ResultSet::new(metadata, cursor);

    let set = result
        .collect_rows(Hydration::<serde_json::Map<String, serde_json::Value>>::of())
        .await?;
    info!("types: {:?}", set.types);
    assert_eq!(
        set.types,
        vec![
            "Boolean",
            "Short",
            "String",
            "Float",
            "Double",
            "BigDecimal",
            "Date",
            "Time",
            "Timestamp",
            "Bytes"
        ]
    );
    assert_eq!(
        serde_json::Value::Object(set.rows[0].clone()),
        json!({
            "flag": true,
            "tiny": 7,
            "big": "9223372036854775807",
            "ratio": 0.5,
            "score": 99.25,
            "price": "19.99",
            "born": "2024-05-17",
            "alarm": "09:30:00",
            "seen": "2024-05-17T09:30:00",
            "blob": "AP8="
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_options_from_yaml_drive_stream() -> Result<()> {
    let options = StreamOptions::from_yaml_str("camelize: true\ntemporal: epoch_millis\n")?;
    assert_eq!(options.temporal, TemporalMode::EpochMillis);

    let metadata = MemoryMetadata::new(vec![("last_seen", SqlTypeId::TIMESTAMP)]);
    let ts = chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_hms_milli_opt(0, 0, 1, 500)
        .unwrap();
    let result = ResultSet::new(metadata, MemoryCursor::new(vec![vec![RowValue::Timestamp(ts)]]));

    let rows = result
        .collect_array(Hydration::record().options(options))
        .await?;
    assert_eq!(rows[0].get("lastSeen"), Some(&RowValue::Long(1500)));
    Ok(())
}

#[tokio::test]
async fn test_boxed_cursor_and_holdability() -> Result<()> {
    let cursor: Box<dyn Cursor> = Box::new(
        MemoryCursor::new(vec![vec![RowValue::Int(5)]])
            .with_holdability(sql_rowstream::Holdability::CLOSE_CURSORS_AT_COMMIT),
    );
    let result = ResultSet::new(MemoryMetadata::new(vec![("n", SqlTypeId::INTEGER)]), cursor);

    assert_eq!(
        result.holdability()?,
        sql_rowstream::Holdability::CloseCursorsAtCommit
    );
    let rows = result.collect_array(Hydration::record()).await?;
    assert_eq!(rows[0].get("n"), Some(&RowValue::Int(5)));

    result.close()?;
    assert!(result.holdability().unwrap_err().is_cursor());
    Ok(())
}
