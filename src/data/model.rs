use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column
// ---------------------------------------------------------------------------

/// One parsed CSV cell. Totally ordered so it can key the unique-value sets
/// and filter selections.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    /// ISO-8601 date (`YYYY-MM-DD`) kept as text; sorts chronologically.
    Date(String),
}

impl CellValue {
    /// Variant position in the sort order: missing, integer, float, text,
    /// date.
    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Integer(_) => 1,
            CellValue::Float(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Date(_) => 4,
        }
    }
}

// Floats compare by `total_cmp` and hash by bit pattern, which keeps
// `Eq`, `Ord` and `Hash` in agreement (NaN equals itself, 0.0 != -0.0).

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) | (CellValue::Date(a), CellValue::Date(b)) => {
                a.cmp(b)
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(v) => v.to_bits().hash(state),
            CellValue::Text(s) | CellValue::Date(s) => s.hash(state),
        }
    }
}

/// Table rendering: floats to four decimals, missing cells as `<null>`.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("<null>"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Text(s) | CellValue::Date(s) => f.write_str(s),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` (numeric cells only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text form used for substring matching.
    ///
    /// Floats use the shortest round-trip form (`100` rather than `100.0000`)
    /// and missing values match only the empty pattern.
    pub fn search_text(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::Date(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Null => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Inferred type of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Integer,
    Float,
    Date,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// One named column; every cell is either `Null` or of the column's kind.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed distinct values per column.
///
/// Invariants: column names are unique and all columns have `row_count`
/// values. Both are checked once in [`Dataset::from_columns`].
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
    /// For each column the sorted set of distinct values.
    unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build a dataset from whole columns.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(AnalysisError::MalformedInput(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }

        let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != row_count) {
            return Err(AnalysisError::MalformedInput(format!(
                "column '{}' has {} values, expected {row_count}",
                bad.name,
                bad.values.len()
            )));
        }

        let unique_values = columns
            .iter()
            .map(|c| (c.name.clone(), c.values.iter().cloned().collect()))
            .collect();

        Ok(Self {
            columns,
            row_count,
            unique_values,
        })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Ordered column names, as in the header.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a column by exact (case-sensitive) name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like [`Dataset::column`] but reports `UnknownColumn`.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| AnalysisError::UnknownColumn(name.to_string()))
    }

    /// Names of the integer and float columns, in header order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Sorted distinct values of a column.
    pub fn unique_values(&self, column: &str) -> Option<&BTreeSet<CellValue>> {
        self.unique_values.get(column)
    }

    /// All cells of row `index`, in column order.
    pub fn row(&self, index: usize) -> Vec<CellValue> {
        self.columns
            .iter()
            .map(|c| c.values[index].clone())
            .collect()
    }

    /// A new dataset holding only the given rows, in the given order.
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|c| {
                Column::new(
                    c.name.clone(),
                    c.kind,
                    indices.iter().map(|&i| c.values[i].clone()).collect(),
                )
            })
            .collect();
        let unique_values = columns
            .iter()
            .map(|c| (c.name.clone(), c.values.iter().cloned().collect()))
            .collect();
        Dataset {
            row_count: indices.len(),
            columns,
            unique_values,
        }
    }
}

// ---------------------------------------------------------------------------
// QueryResult – output of search / compare
// ---------------------------------------------------------------------------

/// A tabular query result: column names plus rows in result order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn rejects_duplicate_column_names() {
        let cols = vec![
            Column::new("a", ColumnKind::Integer, vec![CellValue::Integer(1)]),
            Column::new("a", ColumnKind::Integer, vec![CellValue::Integer(2)]),
        ];
        assert!(matches!(
            Dataset::from_columns(cols),
            Err(AnalysisError::MalformedInput(_))
        ));
    }

    #[test]
    fn rejects_ragged_columns() {
        let cols = vec![
            Column::new("a", ColumnKind::Integer, vec![CellValue::Integer(1)]),
            Column::new("b", ColumnKind::Text, vec![text("x"), text("y")]),
        ];
        assert!(matches!(
            Dataset::from_columns(cols),
            Err(AnalysisError::MalformedInput(_))
        ));
    }

    #[test]
    fn subset_keeps_requested_order() {
        let ds = Dataset::from_columns(vec![Column::new(
            "city",
            ColumnKind::Text,
            vec![text("NY"), text("SF"), text("LA")],
        )])
        .unwrap();
        let sub = ds.subset(&[2, 0]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.row(0), vec![text("LA")]);
        assert_eq!(sub.row(1), vec![text("NY")]);
        assert_eq!(sub.unique_values("city").unwrap().len(), 2);
    }

    #[test]
    fn float_equality_is_total() {
        assert_eq!(CellValue::Float(f64::NAN), CellValue::Float(f64::NAN));
        assert_ne!(CellValue::Float(1.0), CellValue::Integer(1));
        assert!(CellValue::Null < CellValue::Integer(-5));
    }

    #[test]
    fn values_sort_by_variant_then_payload() {
        let mut values = vec![
            CellValue::Date("2024-01-02".into()),
            text("b"),
            CellValue::Float(0.5),
            CellValue::Integer(7),
            CellValue::Null,
            CellValue::Date("2024-01-01".into()),
            text("a"),
            CellValue::Integer(-1),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Integer(-1),
                CellValue::Integer(7),
                CellValue::Float(0.5),
                text("a"),
                text("b"),
                CellValue::Date("2024-01-01".into()),
                CellValue::Date("2024-01-02".into()),
            ]
        );
        // same text in a different variant is a different value
        assert_ne!(text("2024-01-01"), CellValue::Date("2024-01-01".into()));
        let set: HashSet<CellValue> = [text("x"), CellValue::Date("x".into())].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn search_text_formats() {
        assert_eq!(CellValue::Float(100.0).search_text(), "100");
        assert_eq!(CellValue::Float(2.5).search_text(), "2.5");
        assert_eq!(CellValue::Integer(-3).search_text(), "-3");
        assert_eq!(CellValue::Null.search_text(), "");
    }
}
