use std::io::Read;
use std::sync::Arc;

use crate::config::AnalyzerConfig;
use crate::data::filter::{filtered_indices, DateRange, FilterState};
use crate::data::model::{Dataset, QueryResult};
use crate::data::stats::{correlation_matrix, CorrelationMatrix};
use crate::data::store::DatasetStore;
use crate::error::Result;
use crate::predict::{self, PredictionResult};
use crate::query;

/// Entry point for the presentation layer: owns the dataset store and the
/// configuration, and runs every operation on a single snapshot of the
/// active dataset.
#[derive(Debug, Default)]
pub struct Analyzer {
    store: DatasetStore,
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Out-of-range prediction settings are clamped the same way as when
    /// they come from a config file.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            store: DatasetStore::new(),
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Parse a CSV source and make it the active dataset.
    pub fn load<R: Read>(&self, source: R) -> Result<Arc<Dataset>> {
        self.store.load(source)
    }

    pub fn load_str(&self, csv: &str) -> Result<Arc<Dataset>> {
        self.store.load(csv.as_bytes())
    }

    pub fn current(&self) -> Result<Arc<Dataset>> {
        self.store.current()
    }

    pub fn search(&self, column: &str, pattern: &str) -> Result<QueryResult> {
        let dataset = self.current()?;
        query::search(&dataset, column, pattern)
    }

    pub fn compare(&self, target: &str, group_by: &str) -> Result<QueryResult> {
        let dataset = self.current()?;
        query::compare(&dataset, target, group_by)
    }

    /// Predict `target`, or the configured target column when `None`.
    pub fn predict<S: AsRef<str>>(&self, features: &[S], target: Option<&str>) -> Result<PredictionResult> {
        let settings = &self.config.prediction;
        let target = target.unwrap_or(&settings.target_column);
        let dataset = self.current()?;
        predict::predict(&dataset, features, target, settings)
    }

    /// Rows of the active dataset passing the dashboard filters.
    pub fn filtered(&self, filters: &FilterState, dates: &DateRange) -> Result<Dataset> {
        let dataset = self.current()?;
        let rows = filtered_indices(&dataset, filters, dates);
        Ok(dataset.subset(&rows))
    }

    pub fn correlations(&self, filters: &FilterState, dates: &DateRange) -> Result<CorrelationMatrix> {
        Ok(correlation_matrix(&self.filtered(filters, dates)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_built_in_code_are_normalized() {
        let mut config = AnalyzerConfig::default();
        config.prediction.min_rows = 0;
        config.prediction.test_fraction = 0.95;
        let analyzer = Analyzer::new(config);
        assert_eq!(analyzer.config().prediction.min_rows, 2);
        assert_eq!(analyzer.config().prediction.test_fraction, 0.5);
    }

    #[test]
    fn facade_runs_on_the_active_snapshot() {
        let analyzer = Analyzer::default();
        analyzer.load_str("location,salary\nNY,100\nNY,200\nSF,300\n").unwrap();
        assert_eq!(analyzer.search("location", "NY").unwrap().len(), 2);
        assert_eq!(analyzer.compare("salary", "location").unwrap().len(), 2);
        assert!(matches!(
            analyzer.predict(&["location"], None),
            Err(crate::AnalysisError::InsufficientData { available: 3, .. })
        ));
    }
}
