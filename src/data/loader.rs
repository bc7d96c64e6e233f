use std::io::Read;

use super::model::{CellValue, Column, ColumnKind, Dataset};
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse a CSV source into a [`Dataset`].
///
/// Layout: a header row with column names followed by comma-delimited,
/// UTF-8 data rows. Every row must have exactly as many fields as the
/// header. Column types are inferred from the data, see [`infer_column`].
pub fn parse_csv<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(malformed)?;
        if record.len() != headers.len() {
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(row_no as u64 + 2);
            return Err(AnalysisError::MalformedInput(format!(
                "line {line}: expected {} fields but found {}",
                headers.len(),
                record.len()
            )));
        }
        for (col_idx, value) in record.iter().enumerate() {
            cells[col_idx].push(value.to_string());
        }
    }

    if cells[0].is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();

    Dataset::from_columns(columns)
}

/// Convenience wrapper for in-memory text.
pub fn parse_csv_str(text: &str) -> Result<Dataset> {
    parse_csv(text.as_bytes())
}

fn malformed(err: csv::Error) -> AnalysisError {
    let reason = match err.position() {
        Some(pos) => format!("line {}: {err}", pos.line()),
        None => err.to_string(),
    };
    AnalysisError::MalformedInput(reason)
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

/// Choose a single kind for the whole column and coerce every cell to it.
///
/// Empty cells become `Null`. The first kind that accepts every non-empty
/// cell wins, tried in the order integer, float, date, text. A column with
/// no values at all is text.
pub fn infer_column(name: String, raw: Vec<String>) -> Column {
    let present = || raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty());

    let kind = if present().next().is_none() {
        ColumnKind::Text
    } else if present().all(|s| s.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present().all(|s| parse_finite(s).is_some()) {
        ColumnKind::Float
    } else if present().all(is_iso_date) {
        ColumnKind::Date
    } else {
        ColumnKind::Text
    };

    let values = raw
        .into_iter()
        .map(|s| coerce_cell(s, kind))
        .collect();

    Column::new(name, kind, values)
}

fn coerce_cell(raw: String, kind: ColumnKind) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    match kind {
        ColumnKind::Integer => trimmed
            .parse::<i64>()
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Null),
        ColumnKind::Float => parse_finite(trimmed)
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        ColumnKind::Date => CellValue::Date(trimmed.to_string()),
        ColumnKind::Text => CellValue::Text(raw),
    }
}

/// `"nan"` and `"inf"` parse as `f64` but are not data.
fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `YYYY-MM-DD` with a plausible month and day.
pub fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return false;
    }
    let digits = |r: std::ops::Range<usize>| b[r].iter().all(u8::is_ascii_digit);
    if !(digits(0..4) && digits(5..7) && digits(8..10)) {
        return false;
    }
    let month: u8 = s[5..7].parse().unwrap_or(0);
    let day: u8 = s[8..10].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_header_and_rows() {
        let ds = parse_csv_str("location,salary\nNY,100\nNY,200\nSF,300\n").unwrap();
        assert_eq!(ds.column_names(), vec!["location", "salary"]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("salary").unwrap().kind, ColumnKind::Integer);
        assert_eq!(ds.column("location").unwrap().kind, ColumnKind::Text);
    }

    #[test]
    fn infers_float_date_and_nulls() {
        let ds = parse_csv_str(
            "Date,Price,Note\n2024-01-02,1.5,a\n2024-01-03,,\n2024-02-01,2,c\n",
        )
        .unwrap();
        let date = ds.column("Date").unwrap();
        assert_eq!(date.kind, ColumnKind::Date);
        let price = ds.column("Price").unwrap();
        assert_eq!(price.kind, ColumnKind::Float);
        assert_eq!(price.values[1], CellValue::Null);
        assert_eq!(price.values[2], CellValue::Float(2.0));
        assert_eq!(ds.column("Note").unwrap().values[1], CellValue::Null);
    }

    #[test]
    fn mixed_column_falls_back_to_text() {
        let ds = parse_csv_str("code\n12\nA7\n").unwrap();
        let col = ds.column("code").unwrap();
        assert_eq!(col.kind, ColumnKind::Text);
        assert_eq!(col.values[0], CellValue::Text("12".into()));
    }

    #[test]
    fn nan_is_not_numeric() {
        let ds = parse_csv_str("x\n1.0\nnan\n").unwrap();
        assert_eq!(ds.column("x").unwrap().kind, ColumnKind::Text);
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let err = parse_csv_str("a,b\n1,2\n3\n").unwrap_err();
        match err {
            AnalysisError::MalformedInput(msg) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn header_only_is_empty() {
        assert!(matches!(
            parse_csv_str("a,b\n"),
            Err(AnalysisError::EmptyDataset)
        ));
        assert!(matches!(parse_csv_str(""), Err(AnalysisError::EmptyDataset)));
    }

    #[test]
    fn duplicate_headers_are_malformed() {
        assert!(matches!(
            parse_csv_str("a,a\n1,2\n"),
            Err(AnalysisError::MalformedInput(_))
        ));
    }

    #[test]
    fn iso_date_validation() {
        assert!(is_iso_date("2023-12-31"));
        assert!(!is_iso_date("2023-13-01"));
        assert!(!is_iso_date("2023/12/31"));
        assert!(!is_iso_date("23-12-31"));
    }
}
