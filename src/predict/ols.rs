use linfa::traits::Fit;
use linfa::DatasetBase;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::FitError;

/// Residual norm (of a unit-norm centred column) below which the column is
/// treated as a combination of the columns before it.
const DEPENDENCE_TOLERANCE: f64 = 1e-8;

/// Fitted ordinary-least-squares model with an intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Array1<f64>,
}

impl LinearModel {
    /// Fit `y ≈ intercept + x · coefficients` with `linfa-linear`.
    ///
    /// Columns that are constant over the training rows carry no signal once
    /// the intercept is fitted; they get a zero coefficient. This covers
    /// indicator columns of categories that only occur in held-out rows.
    /// Remaining columns are rescaled to unit spread before solving, so the
    /// result does not depend on the units of each feature.
    ///
    /// `names` labels the columns of `x` for error reporting.
    pub fn fit(x: ArrayView2<f64>, y: ArrayView1<f64>, names: &[String]) -> Result<Self, FitError> {
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite);
        }

        let (n, p) = x.dim();
        let mut active = Vec::with_capacity(p);
        let mut spreads = Vec::with_capacity(p);
        for (j, col) in x.axis_iter(Axis(1)).enumerate() {
            let mean = col.mean().unwrap_or(0.0);
            let spread = col.mapv(|v| (v - mean) * (v - mean)).sum().sqrt();
            if spread > 0.0 {
                active.push(j);
                spreads.push(spread);
            } else {
                log::debug!("feature {:?} is constant in training rows", names.get(j));
            }
        }

        let mut coefficients = Array1::<f64>::zeros(p);
        if active.is_empty() {
            return Ok(Self {
                intercept: y.mean().unwrap_or(0.0),
                coefficients,
            });
        }

        let mut scaled = Array2::<f64>::zeros((n, active.len()));
        for (k, (&j, &spread)) in active.iter().zip(&spreads).enumerate() {
            scaled.column_mut(k).assign(&x.column(j).mapv(|v| v / spread));
        }

        if let Some(k) = first_dependent_column(&scaled) {
            let j = active[k];
            return Err(FitError::Singular {
                column: names.get(j).cloned().unwrap_or_else(|| format!("#{j}")),
            });
        }

        let samples = DatasetBase::new(scaled, y.to_owned());
        let fitted = LinearRegression::new()
            .fit(&samples)
            .map_err(|e| FitError::Solver(e.to_string()))?;

        for ((&j, &spread), &b) in active.iter().zip(&spreads).zip(fitted.params()) {
            coefficients[j] = b / spread;
        }
        let intercept = fitted.intercept();
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(FitError::Solver("non-finite coefficients".to_string()));
        }

        Ok(Self {
            intercept,
            coefficients,
        })
    }

    pub fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
        x.dot(&self.coefficients) + self.intercept
    }
}

/// Mean squared error between two equally long series.
pub fn mean_squared_error(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    let diff = &actual - &predicted;
    diff.mapv(|d| d * d).mean().unwrap_or(0.0)
}

/// Index of the first column lying in the span of the intercept and the
/// columns before it. Centres each column and orthogonalises it against the
/// earlier ones (modified Gram-Schmidt).
fn first_dependent_column(x: &Array2<f64>) -> Option<usize> {
    let mut basis: Vec<Array1<f64>> = Vec::with_capacity(x.ncols());
    for (j, col) in x.axis_iter(Axis(1)).enumerate() {
        let mean = col.mean().unwrap_or(0.0);
        let mut v = col.mapv(|c| c - mean);
        let norm = v.dot(&v).sqrt();
        if norm == 0.0 {
            return Some(j);
        }
        v /= norm;
        for q in &basis {
            let proj = q.dot(&v);
            v.scaled_add(-proj, q);
        }
        let residual = v.dot(&v).sqrt();
        if residual < DEPENDENCE_TOLERANCE {
            return Some(j);
        }
        basis.push(v / residual);
    }
    None
}
