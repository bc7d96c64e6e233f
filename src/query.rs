//! Read-only queries against a dataset snapshot: substring search and
//! grouped averages.
//!
//! Column names are only ever resolved against the dataset's own column
//! list; nothing user-supplied is spliced into a query string.

use std::collections::HashMap;

use crate::data::model::{CellValue, Dataset, QueryResult};
use crate::error::{AnalysisError, Result};

/// Rows whose `column` text contains `pattern` (case-sensitive), in dataset
/// order. An empty pattern matches every row.
pub fn search(dataset: &Dataset, column: &str, pattern: &str) -> Result<QueryResult> {
    let col = dataset.require_column(column)?;

    let rows: Vec<Vec<CellValue>> = col
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.search_text().contains(pattern))
        .map(|(i, _)| dataset.row(i))
        .collect();

    log::debug!("search {column:?} ~ {pattern:?}: {} match(es)", rows.len());

    Ok(QueryResult {
        columns: dataset.column_names(),
        rows,
    })
}

/// Aggregate for one distinct value of the grouping column.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: CellValue,
    /// Rows carrying this key.
    pub rows: usize,
    /// Rows carrying this key with a non-missing target.
    pub samples: usize,
    /// Mean of the target over `samples`; `None` when there are none.
    pub mean: Option<f64>,
}

/// Mean of `target` per distinct value of `group_by`, in first-seen order.
/// Missing group keys form their own group.
pub fn compare_groups(dataset: &Dataset, target: &str, group_by: &str) -> Result<Vec<GroupSummary>> {
    let target_col = dataset.require_column(target)?;
    let group_col = dataset.require_column(group_by)?;
    if !target_col.kind.is_numeric() {
        return Err(AnalysisError::NonNumericTarget {
            column: target.to_string(),
        });
    }

    let mut order: Vec<(CellValue, usize, usize, f64)> = Vec::new();
    let mut slot: HashMap<&CellValue, usize> = HashMap::new();

    for (key, value) in group_col.values.iter().zip(&target_col.values) {
        let idx = *slot.entry(key).or_insert_with(|| {
            order.push((key.clone(), 0, 0, 0.0));
            order.len() - 1
        });
        let entry = &mut order[idx];
        entry.1 += 1;
        if let Some(v) = value.as_f64() {
            entry.2 += 1;
            entry.3 += v;
        }
    }

    Ok(order
        .into_iter()
        .map(|(key, rows, samples, sum)| GroupSummary {
            key,
            rows,
            samples,
            mean: (samples > 0).then(|| sum / samples as f64),
        })
        .collect())
}

/// [`compare_groups`] rendered as a two-column table:
/// `group_by` and `avg_<target>`.
pub fn compare(dataset: &Dataset, target: &str, group_by: &str) -> Result<QueryResult> {
    let groups = compare_groups(dataset, target, group_by)?;
    log::debug!("compare avg({target}) by {group_by}: {} group(s)", groups.len());

    Ok(QueryResult {
        columns: vec![group_by.to_string(), format!("avg_{target}")],
        rows: groups
            .into_iter()
            .map(|g| vec![g.key, g.mean.map_or(CellValue::Null, CellValue::Float)])
            .collect(),
    })
}
