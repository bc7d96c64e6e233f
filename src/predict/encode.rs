use std::collections::BTreeSet;

use ndarray::Array2;

use crate::data::model::{CellValue, Column};

/// Numeric design matrix built from the selected feature columns.
#[derive(Debug, Clone)]
pub struct EncodedFeatures {
    /// One name per matrix column: numeric features keep their name,
    /// indicators are `"{feature}_{value}"`.
    pub names: Vec<String>,
    /// `rows × names.len()`, without an intercept column.
    pub matrix: Array2<f64>,
}

/// Encode `features` over the given `rows`.
///
/// Numeric columns pass through. Any other column becomes one 0/1 indicator
/// per distinct value among `reference` rows except the smallest, which is
/// the baseline. Category order is the sorted order of the values, so the
/// same input always produces the same columns. A row whose value never
/// occurs in `reference` encodes as the baseline.
///
/// Callers must have dropped rows with a missing value in any feature.
pub fn encode(features: &[&Column], rows: &[usize], reference: &[usize]) -> EncodedFeatures {
    let mut names = Vec::new();
    let mut blocks: Vec<Vec<f64>> = Vec::new();

    for col in features {
        if col.kind.is_numeric() {
            names.push(col.name.clone());
            blocks.push(
                rows.iter()
                    .map(|&r| col.values[r].as_f64().unwrap_or(f64::NAN))
                    .collect(),
            );
            continue;
        }

        let categories: BTreeSet<&CellValue> = reference.iter().map(|&r| &col.values[r]).collect();
        for category in categories.into_iter().skip(1) {
            names.push(format!("{}_{}", col.name, category.search_text()));
            blocks.push(
                rows.iter()
                    .map(|&r| if &col.values[r] == category { 1.0 } else { 0.0 })
                    .collect(),
            );
        }
    }

    let mut matrix = Array2::<f64>::zeros((rows.len(), names.len()));
    for (j, block) in blocks.iter().enumerate() {
        for (i, v) in block.iter().enumerate() {
            matrix[[i, j]] = *v;
        }
    }

    EncodedFeatures { names, matrix }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_str;

    #[test]
    fn numeric_passes_through_and_text_drops_first_category() {
        let ds = parse_csv_str(
            "rating,location\n4.0,SF\n3.5,NY\n2.0,LA\n1.0,NY\n",
        )
        .unwrap();
        let cols = [ds.column("rating").unwrap(), ds.column("location").unwrap()];
        let enc = encode(&cols, &[0, 1, 2, 3], &[0, 1, 2, 3]);

        // LA is the baseline (sorted first)
        assert_eq!(enc.names, vec!["rating", "location_NY", "location_SF"]);
        assert_eq!(enc.matrix.shape(), &[4, 3]);
        assert_eq!(enc.matrix.row(0).to_vec(), vec![4.0, 0.0, 1.0]);
        assert_eq!(enc.matrix.row(1).to_vec(), vec![3.5, 1.0, 0.0]);
        assert_eq!(enc.matrix.row(2).to_vec(), vec![2.0, 0.0, 0.0]);
    }

    #[test]
    fn categories_come_from_reference_rows_only() {
        let ds = parse_csv_str("city\nA\nB\nC\nD\n").unwrap();
        let cols = [ds.column("city").unwrap()];
        let enc = encode(&cols, &[0, 1, 2, 3], &[1, 2]);
        // B is the baseline; A and D never occur in the reference rows
        assert_eq!(enc.names, vec!["city_C"]);
        assert_eq!(enc.matrix.column(0).to_vec(), vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn encoding_is_independent_of_row_order() {
        let ds = parse_csv_str("city\nZ\nA\nM\n").unwrap();
        let cols = [ds.column("city").unwrap()];
        let a = encode(&cols, &[0, 1, 2], &[0, 1, 2]);
        let b = encode(&cols, &[2, 1, 0], &[2, 1, 0]);
        assert_eq!(a.names, b.names);
    }
}
