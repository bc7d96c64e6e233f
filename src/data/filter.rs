use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, ColumnKind, Dataset};

// ---------------------------------------------------------------------------
// Filter predicate: which distinct values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// A column absent from the map is not filtered.
pub type FilterState = BTreeMap<String, BTreeSet<CellValue>>;

/// Initialise a [`FilterState`] over the categorical (text) columns with all
/// values selected, i.e. show everything.
pub fn init_filter_state(dataset: &Dataset) -> FilterState {
    dataset
        .columns()
        .iter()
        .filter(|c| c.kind == ColumnKind::Text)
        .filter_map(|c| {
            dataset
                .unique_values(&c.name)
                .map(|vals| (c.name.clone(), vals.clone()))
        })
        .collect()
}

/// Inclusive date window on one date column. Bounds are ISO `YYYY-MM-DD`
/// strings; `None` leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub column: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn is_active(&self) -> bool {
        self.column.is_some() && (self.start.is_some() || self.end.is_some())
    }

    fn contains(&self, value: &CellValue) -> bool {
        let CellValue::Date(date) = value else {
            return false;
        };
        let after_start = self.start.as_deref().map_or(true, |s| date.as_str() >= s);
        let before_end = self.end.as_deref().map_or(true, |e| date.as_str() <= e);
        after_start && before_end
    }

    /// Earliest and latest date present in the chosen column.
    pub fn bounds(dataset: &Dataset, column: &str) -> Option<(String, String)> {
        let values = dataset.unique_values(column)?;
        let mut dates = values.iter().filter_map(|v| match v {
            CellValue::Date(d) => Some(d.clone()),
            _ => None,
        });
        let first = dates.next()?;
        let last = dates.last().unwrap_or_else(|| first.clone());
        Some((first, last))
    }
}

/// Return indices of rows that pass all active filters, in dataset order.
///
/// A row passes a column filter when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The filter set for that column is empty → nothing selected → fails
/// * The row's value for that column is in the selected set → passes
///
/// With an active `dates` window the row's date must also fall inside it;
/// rows without a date are dropped.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState, dates: &DateRange) -> Vec<usize> {
    let active: Vec<(&[CellValue], &BTreeSet<CellValue>)> = filters
        .iter()
        .filter_map(|(col, selected)| {
            let column = dataset.column(col)?;
            // Check all distinct values are selected → no effective filter
            let all_selected = dataset
                .unique_values(col)
                .is_some_and(|all| selected.len() == all.len() && !selected.is_empty());
            (!all_selected).then_some((column.values.as_slice(), selected))
        })
        .collect();

    let date_values = if dates.is_active() {
        dates
            .column
            .as_deref()
            .and_then(|c| dataset.column(c))
            .map(|c| c.values.as_slice())
    } else {
        None
    };

    (0..dataset.len())
        .filter(|&row| {
            active
                .iter()
                .all(|(values, selected)| selected.contains(&values[row]))
        })
        .filter(|&row| date_values.map_or(true, |values| dates.contains(&values[row])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_str;

    fn sample() -> Dataset {
        parse_csv_str(
            "Date,Region,Units Sold\n\
             2024-01-01,North,10\n\
             2024-01-05,South,12\n\
             2024-02-01,North,7\n\
             ,East,3\n",
        )
        .unwrap()
    }

    #[test]
    fn all_selected_shows_everything() {
        let ds = sample();
        let filters = init_filter_state(&ds);
        assert!(filters.contains_key("Region"));
        assert!(!filters.contains_key("Units Sold"));
        assert_eq!(
            filtered_indices(&ds, &filters, &DateRange::default()),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn single_region_selection() {
        let ds = sample();
        let mut filters = init_filter_state(&ds);
        filters.insert(
            "Region".into(),
            [CellValue::Text("North".into())].into_iter().collect(),
        );
        assert_eq!(
            filtered_indices(&ds, &filters, &DateRange::default()),
            vec![0, 2]
        );
    }

    #[test]
    fn empty_selection_hides_all() {
        let ds = sample();
        let mut filters = init_filter_state(&ds);
        filters.insert("Region".into(), BTreeSet::new());
        assert!(filtered_indices(&ds, &filters, &DateRange::default()).is_empty());
    }

    #[test]
    fn date_range_is_inclusive_and_drops_missing_dates() {
        let ds = sample();
        let range = DateRange {
            column: Some("Date".into()),
            start: Some("2024-01-05".into()),
            end: Some("2024-02-01".into()),
        };
        assert_eq!(
            filtered_indices(&ds, &FilterState::new(), &range),
            vec![1, 2]
        );
    }

    #[test]
    fn date_bounds() {
        let ds = sample();
        assert_eq!(
            DateRange::bounds(&ds, "Date"),
            Some(("2024-01-01".to_string(), "2024-02-01".to_string()))
        );
        assert_eq!(DateRange::bounds(&ds, "Region"), None);
    }
}
