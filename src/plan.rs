//! Column plan: per-column label and target kind, derived once per result.

use crate::casing::LabelRewrite;
use crate::error::{Error, Result};
use crate::metadata::ResultSetMetadata;
use futures::future::try_join_all;
use serde::Serialize;
use sql_types::{SqlTypeId, TargetKind, TypeRegistry};
use std::collections::HashSet;
use tracing::{debug, warn};

/// One result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// 1-based column position
    pub position: usize,
    /// Output label, possibly rewritten
    pub label: String,
    /// SQL type code reported by the driver
    pub sql_type: SqlTypeId,
    /// Resolved target kind
    pub kind: TargetKind,
}

impl ColumnDescriptor {
    pub fn new(position: usize, label: impl Into<String>, sql_type: SqlTypeId) -> Self {
        Self {
            position,
            label: label.into(),
            sql_type,
            kind: TypeRegistry::kind_of(sql_type),
        }
    }
}

/// Ordered column descriptors, index-aligned with the result columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ColumnPlan {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnPlan {
    /// Build a plan from descriptors. Positions must run 1..=N in order.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self> {
        for (idx, column) in columns.iter().enumerate() {
            if column.position != idx + 1 {
                return Err(Error::metadata(format!(
                    "column {} reported at position {}",
                    idx + 1,
                    column.position
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.clone()).collect()
    }

    /// Kind name of every column, e.g. `["Int", "String"]`.
    pub fn type_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.kind.name().to_string())
            .collect()
    }

    /// A copy of this plan with every label passed through `rewrite`.
    pub fn relabel(&self, rewrite: &LabelRewrite) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| ColumnDescriptor {
                label: rewrite(&c.label),
                ..c.clone()
            })
            .collect();
        let plan = Self { columns };
        plan.warn_on_duplicate_labels();
        plan
    }

    fn warn_on_duplicate_labels(&self) {
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.label.as_str()) {
                warn!(
                    "Duplicate column label '{}' at position {}; later columns overwrite earlier ones",
                    column.label, column.position
                );
            }
        }
    }
}

impl<'a> IntoIterator for &'a ColumnPlan {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Query `metadata` and build the column plan.
///
/// Label and type lookups for all columns are issued concurrently; the
/// descriptors come back in ascending position order regardless of which
/// lookup finishes first.
pub async fn build_plan<M>(metadata: &M, rewrite: Option<&LabelRewrite>) -> Result<ColumnPlan>
where
    M: ResultSetMetadata + ?Sized,
{
    let count = metadata
        .column_count()
        .await
        .map_err(|e| Error::metadata_with_source("failed to read column count", e))?;

    let lookups = (1..=count).map(|position| async move {
        let label = metadata.column_label(position).await.map_err(|e| {
            Error::metadata_with_source(format!("failed to read label of column {position}"), e)
        })?;
        let sql_type = metadata.column_type(position).await.map_err(|e| {
            Error::metadata_with_source(format!("failed to read type of column {position}"), e)
        })?;
        Ok::<_, Error>(ColumnDescriptor::new(position, label, sql_type))
    });
    let columns = try_join_all(lookups).await?;

    let plan = ColumnPlan::new(columns)?;
    let plan = match rewrite {
        Some(rewrite) => plan.relabel(rewrite),
        None => {
            plan.warn_on_duplicate_labels();
            plan
        }
    };

    debug!(
        "Built column plan with {} columns: {:?}",
        plan.len(),
        plan.type_names()
    );
    Ok(plan)
}
