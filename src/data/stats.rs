use std::collections::BTreeMap;

use super::model::{CellValue, Dataset};
use crate::error::{AnalysisError, Result};

/// Pairwise Pearson correlations between the numeric columns of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of `columns[i]` with `columns[j]`;
    /// `None` where it is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Correlate every pair of numeric columns over the rows where both are
/// present.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let numeric: Vec<(&str, Vec<Option<f64>>)> = dataset
        .columns()
        .iter()
        .filter(|c| c.kind.is_numeric())
        .map(|c| (c.name.as_str(), c.values.iter().map(|v| v.as_f64()).collect()))
        .collect();

    let values = numeric
        .iter()
        .map(|(_, a)| numeric.iter().map(|(_, b)| pearson(a, b)).collect())
        .collect();

    CorrelationMatrix {
        columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

/// Sum of `value` per distinct `key` over `rows`, in key order.
///
/// Rows with a missing key or value are skipped. Feeds the category share
/// chart and the per-date trend line.
pub fn totals_by(
    dataset: &Dataset,
    rows: &[usize],
    key: &str,
    value: &str,
) -> Result<Vec<(CellValue, f64)>> {
    let key_col = dataset.require_column(key)?;
    let value_col = dataset.require_column(value)?;
    if !value_col.kind.is_numeric() {
        return Err(AnalysisError::NonNumericTarget {
            column: value.to_string(),
        });
    }

    let mut totals: BTreeMap<&CellValue, f64> = BTreeMap::new();
    for &r in rows {
        let k = &key_col.values[r];
        let Some(v) = value_col.values[r].as_f64() else {
            continue;
        };
        if !k.is_null() {
            *totals.entry(k).or_default() += v;
        }
    }
    Ok(totals.into_iter().map(|(k, v)| (k.clone(), v)).collect())
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_str;

    #[test]
    fn perfect_positive_and_negative() {
        let ds = parse_csv_str("a,b,c,label\n1,2,9,x\n2,4,8,y\n3,6,7,z\n").unwrap();
        let m = correlation_matrix(&ds);
        assert_eq!(m.columns, vec!["a", "b", "c"]);
        assert!((m.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get("a", "c").unwrap() + 1.0).abs() < 1e-12);
        assert!((m.get("c", "c").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_is_undefined() {
        let ds = parse_csv_str("a,b\n1,5\n2,5\n3,5\n").unwrap();
        let m = correlation_matrix(&ds);
        assert_eq!(m.get("a", "b"), None);
    }

    #[test]
    fn uses_pairwise_complete_rows() {
        let ds = parse_csv_str("a,b\n1,1\n2,\n3,3\n4,4\n").unwrap();
        let m = correlation_matrix(&ds);
        assert!((m.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_numeric_columns() {
        let ds = parse_csv_str("name\nx\n").unwrap();
        assert!(correlation_matrix(&ds).is_empty());
    }

    #[test]
    fn totals_follow_key_order_and_skip_missing() {
        let ds = parse_csv_str(
            "Date,Category,Units Sold\n\
             2024-01-02,Toys,5\n\
             2024-01-01,Games,3\n\
             2024-01-02,Games,4\n\
             ,Toys,7\n\
             2024-01-01,Toys,\n",
        )
        .unwrap();
        let all: Vec<usize> = (0..ds.len()).collect();

        let by_category = totals_by(&ds, &all, "Category", "Units Sold").unwrap();
        assert_eq!(
            by_category,
            vec![
                (CellValue::Text("Games".into()), 7.0),
                (CellValue::Text("Toys".into()), 12.0),
            ]
        );

        let by_date = totals_by(&ds, &[0, 1, 2], "Date", "Units Sold").unwrap();
        assert_eq!(
            by_date,
            vec![
                (CellValue::Date("2024-01-01".into()), 3.0),
                (CellValue::Date("2024-01-02".into()), 9.0),
            ]
        );
    }

    #[test]
    fn totals_need_a_numeric_value_column() {
        let ds = parse_csv_str("Category,Region\nToys,North\n").unwrap();
        assert!(matches!(
            totals_by(&ds, &[0], "Category", "Region"),
            Err(AnalysisError::NonNumericTarget { .. })
        ));
        assert!(matches!(
            totals_by(&ds, &[0], "Brand", "Region"),
            Err(AnalysisError::UnknownColumn(_))
        ));
    }
}
