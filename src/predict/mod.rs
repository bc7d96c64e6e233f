/// Prediction service: fit a linear regression of a numeric target on a
/// user-chosen feature set and score it on a held-out partition.
///
/// Pipeline:
/// ```text
///   validate names → drop incomplete rows → split → encode → fit → evaluate
/// ```
///
/// Each call is self-contained and works on one dataset snapshot.
pub mod encode;
pub mod ols;
pub mod split;

use ndarray::{Array1, Axis};

use crate::config::PredictionSettings;
use crate::data::model::{Column, Dataset};
use crate::error::{AnalysisError, Result};

use encode::encode;
use ols::{mean_squared_error, LinearModel};
use split::train_test_split;

/// Outcome of one fit/evaluate cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Predicted target per held-out row, aligned with `held_out_rows`.
    pub predictions: Vec<f64>,
    /// Actual target per held-out row.
    pub actual: Vec<f64>,
    /// Dataset row indices of the held-out partition.
    pub held_out_rows: Vec<usize>,
    /// Mean squared error over the held-out partition.
    pub mse: f64,
    /// Names of the encoded model inputs.
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Rows used for fitting.
    pub train_rows: usize,
}

/// Run the whole pipeline for `features` → `target`.
pub fn predict<S: AsRef<str>>(
    dataset: &Dataset,
    features: &[S],
    target: &str,
    settings: &PredictionSettings,
) -> Result<PredictionResult> {
    let (feature_cols, target_col) = resolve(dataset, features, target)?;

    let complete: Vec<usize> = (0..dataset.len())
        .filter(|&r| {
            !target_col.values[r].is_null() && feature_cols.iter().all(|c| !c.values[r].is_null())
        })
        .collect();
    if complete.len() < settings.min_rows {
        log::warn!(
            "predict {target}: {} complete row(s), need {}",
            complete.len(),
            settings.min_rows
        );
        return Err(AnalysisError::InsufficientData {
            available: complete.len(),
            required: settings.min_rows,
        });
    }

    let partition = train_test_split(complete.len(), settings.test_fraction, settings.seed);
    let train_rows: Vec<usize> = partition.train.iter().map(|&i| complete[i]).collect();

    let encoded = encode(&feature_cols, &complete, &train_rows);
    let y: Array1<f64> = complete
        .iter()
        .map(|&r| target_col.values[r].as_f64().unwrap_or(f64::NAN))
        .collect();

    let x_train = encoded.matrix.select(Axis(0), &partition.train);
    let y_train = y.select(Axis(0), &partition.train);
    let x_test = encoded.matrix.select(Axis(0), &partition.held_out);
    let y_test = y.select(Axis(0), &partition.held_out);

    let model = LinearModel::fit(x_train.view(), y_train.view(), &encoded.names)?;
    let predicted = model.predict(x_test.view());
    let mse = mean_squared_error(y_test.view(), predicted.view());

    log::info!(
        "predict {target} from {:?}: {} train / {} held out, mse = {mse:.4}",
        encoded.names,
        partition.train.len(),
        partition.held_out.len()
    );

    Ok(PredictionResult {
        predictions: predicted.to_vec(),
        actual: y_test.to_vec(),
        held_out_rows: partition.held_out.iter().map(|&i| complete[i]).collect(),
        mse,
        feature_names: encoded.names,
        intercept: model.intercept,
        coefficients: model.coefficients.to_vec(),
        train_rows: partition.train.len(),
    })
}

/// Check every name before any row is touched.
fn resolve<'a, S: AsRef<str>>(
    dataset: &'a Dataset,
    features: &[S],
    target: &str,
) -> Result<(Vec<&'a Column>, &'a Column)> {
    if features.is_empty() {
        return Err(AnalysisError::EmptyFeatureSet);
    }

    let mut names: Vec<&str> = Vec::with_capacity(features.len());
    for f in features {
        if !names.contains(&f.as_ref()) {
            names.push(f.as_ref());
        }
    }

    let invalid: Vec<String> = names
        .iter()
        .filter(|n| **n == target || dataset.column(n).is_none())
        .map(|n| n.to_string())
        .collect();
    if !invalid.is_empty() {
        log::warn!("predict {target}: rejected features {invalid:?}");
        return Err(AnalysisError::InvalidFeature { names: invalid });
    }

    let target_col = dataset.require_column(target)?;
    if !target_col.kind.is_numeric() {
        return Err(AnalysisError::NonNumericTarget {
            column: target.to_string(),
        });
    }

    let feature_cols = names
        .iter()
        .filter_map(|n| dataset.column(n))
        .collect();
    Ok((feature_cols, target_col))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::loader::parse_csv_str;
    use crate::error::FitError;

    fn settings() -> PredictionSettings {
        PredictionSettings::default()
    }

    /// salary = 1000 * rating + 10 * reported + location premium
    fn linear_csv(rows: usize) -> String {
        let mut csv = String::from("rating,salaries_reported,location,salary\n");
        for i in 0..rows {
            let rating = 1.0 + (i % 5) as f64 * 0.5;
            let reported = (i * 7 % 11) as i64;
            let (loc, premium) = match i % 3 {
                0 => ("Bangalore", 0.0),
                1 => ("Mumbai", 500.0),
                _ => ("Pune", -200.0),
            };
            let salary = 1000.0 * rating + 10.0 * reported as f64 + premium;
            csv.push_str(&format!("{rating},{reported},{loc},{salary}\n"));
        }
        csv
    }

    #[test]
    fn exact_relationship_gives_zero_error() {
        let ds = parse_csv_str(&linear_csv(30)).unwrap();
        let res = predict(
            &ds,
            &["rating", "salaries_reported", "location"],
            "salary",
            &settings(),
        )
        .unwrap();

        assert_eq!(res.predictions.len(), 6);
        assert_eq!(res.train_rows, 24);
        assert!(res.mse < 1e-6, "mse = {}", res.mse);
        assert_eq!(
            res.feature_names,
            vec!["rating", "salaries_reported", "location_Mumbai", "location_Pune"]
        );
        for (p, a) in res.predictions.iter().zip(&res.actual) {
            assert!((p - a).abs() < 1e-6);
        }
    }

    #[test]
    fn held_out_rows_align_with_actuals() {
        let ds = parse_csv_str(&linear_csv(20)).unwrap();
        let res = predict(&ds, &["rating", "salaries_reported"], "salary", &settings()).unwrap();
        let salary = ds.column("salary").unwrap();
        for (row, actual) in res.held_out_rows.iter().zip(&res.actual) {
            assert_eq!(salary.values[*row].as_f64(), Some(*actual));
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let ds = parse_csv_str(&linear_csv(40)).unwrap();
        let a = predict(&ds, &["rating", "salaries_reported"], "salary", &settings()).unwrap();
        let b = predict(&ds, &["rating", "salaries_reported"], "salary", &settings()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_feature_set() {
        let ds = parse_csv_str(&linear_csv(20)).unwrap();
        let none: [&str; 0] = [];
        assert!(matches!(
            predict(&ds, &none, "salary", &settings()),
            Err(AnalysisError::EmptyFeatureSet)
        ));
    }

    #[test]
    fn unknown_features_are_listed() {
        let ds = parse_csv_str(&linear_csv(20)).unwrap();
        let err = predict(&ds, &["rating", "age", "tenure"], "salary", &settings()).unwrap_err();
        match err {
            AnalysisError::InvalidFeature { names } => assert_eq!(names, vec!["age", "tenure"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn target_as_feature_is_invalid() {
        let ds = parse_csv_str(&linear_csv(20)).unwrap();
        assert!(matches!(
            predict(&ds, &["salary"], "salary", &settings()),
            Err(AnalysisError::InvalidFeature { .. })
        ));
    }

    #[test]
    fn target_checks() {
        let ds = parse_csv_str(&linear_csv(20)).unwrap();
        assert!(matches!(
            predict(&ds, &["rating"], "bonus", &settings()),
            Err(AnalysisError::UnknownColumn(_))
        ));
        assert!(matches!(
            predict(&ds, &["rating"], "location", &settings()),
            Err(AnalysisError::NonNumericTarget { .. })
        ));
    }

    #[test]
    fn incomplete_rows_are_dropped_before_threshold() {
        let mut csv = String::from("rating,salary\n");
        for i in 0..12 {
            // every other row misses its rating
            if i % 2 == 0 {
                csv.push_str(&format!(",{}\n", i * 100));
            } else {
                csv.push_str(&format!("{i},{}\n", i * 100));
            }
        }
        let ds = parse_csv_str(&csv).unwrap();
        match predict(&ds, &["rating"], "salary", &settings()).unwrap_err() {
            AnalysisError::InsufficientData {
                available,
                required,
            } => assert_eq!((available, required), (6, 10)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn collinear_design_surfaces_as_model_fit_error() {
        let mut csv = String::from("hours,minutes,salary\n");
        for i in 0..15 {
            csv.push_str(&format!("{i},{},{}\n", i * 60, 100 + i * 3));
        }
        let ds = parse_csv_str(&csv).unwrap();
        match predict(&ds, &["hours", "minutes"], "salary", &settings()).unwrap_err() {
            AnalysisError::ModelFit(FitError::Singular { column }) => assert_eq!(column, "minutes"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn constant_feature_predicts_training_mean() {
        let mut csv = String::from("flat,salary\n");
        for i in 0..15 {
            csv.push_str(&format!("3,{}\n", 100 + i));
        }
        let ds = parse_csv_str(&csv).unwrap();
        let res = predict(&ds, &["flat"], "salary", &settings()).unwrap();
        assert_eq!(res.coefficients, vec![0.0]);
        assert!(res.predictions.iter().all(|p| (p - res.intercept).abs() < 1e-12));
    }

    #[test]
    fn many_job_titles_with_rare_categories() {
        // 20 titles over 30 rows: ten titles appear twice, ten only once, so
        // some categories end up only in the held-out rows
        let mut csv = String::from("rating,job_title,salary\n");
        for i in 0..30 {
            let rating = 1.0 + (i % 7) as f64 * 0.5;
            let title = i % 20;
            let salary = 1000.0 * rating + 100.0 * title as f64;
            csv.push_str(&format!("{rating},Title{title:02},{salary}\n"));
        }
        let ds = parse_csv_str(&csv).unwrap();
        let res = predict(&ds, &["rating", "job_title"], "salary", &settings()).unwrap();

        let held_out: BTreeSet<usize> = res.held_out_rows.iter().copied().collect();
        let train_titles: BTreeSet<usize> = (0..30)
            .filter(|r| !held_out.contains(r))
            .map(|r| r % 20)
            .collect();
        assert_eq!(res.feature_names.len(), train_titles.len());
        assert_eq!(res.feature_names[0], "rating");
        assert_eq!(res.predictions.len(), 6);
        assert!(res.predictions.iter().all(|p| p.is_finite()));
        assert!(res.mse.is_finite());
        let rating = res.feature_names.iter().position(|n| n == "rating").unwrap();
        assert!((res.coefficients[rating] - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn salary_from_revenue_and_margin() {
        // revenue around 1e6, margin around 1e-3
        let mut csv = String::from("revenue,margin,salary\n");
        for i in 0..40 {
            let revenue = 1.0e6 + 37_000.0 * (i % 9) as f64 + 1_500.0 * i as f64;
            let margin = 1.0e-3 * (1.0 + 0.3 * ((i * 5) % 7) as f64);
            let noise = ((i % 3) as f64 - 1.0) * 0.5;
            let salary = 5.0e-4 * revenue + 1.0e5 * margin + noise;
            csv.push_str(&format!("{revenue},{margin},{salary}\n"));
        }
        let ds = parse_csv_str(&csv).unwrap();
        let res = predict(&ds, &["revenue", "margin"], "salary", &settings()).unwrap();
        assert_eq!(res.feature_names, vec!["revenue", "margin"]);
        assert!(res.mse < 1.0, "mse = {}", res.mse);
    }

    #[test]
    fn duplicate_feature_names_collapse() {
        let ds = parse_csv_str(&linear_csv(20)).unwrap();
        let res = predict(&ds, &["rating", "rating"], "salary", &settings()).unwrap();
        assert_eq!(res.feature_names, vec!["rating"]);
    }
}
