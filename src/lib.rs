//! Core of the market / salary trend analyzer: load a CSV dataset, search
//! and compare it, and fit a linear-regression prediction over chosen
//! features.
//!
//! ```text
//!   Analyzer ──► DatasetStore (load / current)
//!      │
//!      ├──► query    (search, compare)
//!      └──► predict  (encode → split → fit → evaluate)
//! ```

pub mod accounts;
pub mod config;
pub mod data;
pub mod error;
pub mod predict;
pub mod query;
pub mod service;

pub use config::AnalyzerConfig;
pub use data::model::{CellValue, Column, ColumnKind, Dataset, QueryResult};
pub use error::{AnalysisError, FitError};
pub use predict::PredictionResult;
pub use service::Analyzer;
