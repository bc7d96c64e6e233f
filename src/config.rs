use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the config file used by the desktop app.
pub const CONFIG_ENV_VAR: &str = "TREND_ANALYZER_CONFIG";
/// Default config filename, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "trend-analyzer.toml";

const MIN_ROWS_FLOOR: usize = 2;
const TEST_FRACTION_RANGE: (f64, f64) = (0.05, 0.5);

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level application settings.
///
/// Config keys (TOML): `prediction`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub prediction: PredictionSettings,
}

/// Knobs of the regression pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSettings {
    /// Column predicted when the caller names none.
    #[serde(default = "default_target_column")]
    pub target_column: String,
    /// Fewer complete rows than this is `InsufficientData`.
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
    /// Share of rows held out for evaluation.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed of the train/test shuffle.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            target_column: default_target_column(),
            min_rows: default_min_rows(),
            test_fraction: default_test_fraction(),
            seed: default_seed(),
        }
    }
}

impl PredictionSettings {
    pub(crate) fn normalized(mut self) -> Self {
        self.min_rows = self.min_rows.max(MIN_ROWS_FLOOR);
        self.test_fraction = if self.test_fraction.is_finite() {
            self.test_fraction
                .clamp(TEST_FRACTION_RANGE.0, TEST_FRACTION_RANGE.1)
        } else {
            default_test_fraction()
        };
        self
    }
}

fn default_target_column() -> String {
    "salary".to_string()
}

fn default_min_rows() -> usize {
    10
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

impl AnalyzerConfig {
    pub fn normalized(self) -> Self {
        Self {
            prediction: self.prediction.normalized(),
        }
    }

    /// Parse TOML text.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig =
            toml::from_str(text).map_err(|source| ConfigError::ParseToml {
                path: origin.to_path_buf(),
                source,
            })?;
        Ok(config.normalized())
    }
}

/// Resolve the config path: `$TREND_ANALYZER_CONFIG`, else
/// `trend-analyzer.toml` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Load configuration from `path`, returning defaults if the file is missing.
pub fn load_or_default(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(AnalyzerConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = AnalyzerConfig::from_toml_str(&text, path)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.prediction.target_column, "salary");
        assert_eq!(config.prediction.min_rows, 10);
        assert_eq!(config.prediction.seed, 42);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[prediction]\ntarget_column = \"Price\"\nseed = 7").unwrap();
        let config = load_or_default(file.path()).unwrap();
        assert_eq!(config.prediction.target_column, "Price");
        assert_eq!(config.prediction.seed, 7);
        assert_eq!(config.prediction.min_rows, 10);
        assert_eq!(config.prediction.test_fraction, 0.2);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = AnalyzerConfig::from_toml_str(
            "[prediction]\nmin_rows = 0\ntest_fraction = 0.9\n",
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(config.prediction.min_rows, 2);
        assert_eq!(config.prediction.test_fraction, 0.5);
    }

    #[test]
    fn invalid_toml_names_the_path() {
        let err = AnalyzerConfig::from_toml_str("[prediction\n", Path::new("bad.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
