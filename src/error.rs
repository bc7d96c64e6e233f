use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy shared by the store, the query engine and the predictor
// ---------------------------------------------------------------------------

/// Every failure the analysis core can report.
///
/// All variants describe caller-supplied bad input; none leave the dataset
/// store modified.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("dataset contains no data rows")]
    EmptyDataset,

    #[error("no dataset has been loaded")]
    NoDatasetLoaded,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{column}' is not numeric")]
    NonNumericTarget { column: String },

    #[error("invalid feature column(s): {}", .names.join(", "))]
    InvalidFeature { names: Vec<String> },

    #[error("no feature columns selected")]
    EmptyFeatureSet,

    #[error("only {available} complete row(s) remain, at least {required} required")]
    InsufficientData { available: usize, required: usize },

    #[error("model fit failed: {0}")]
    ModelFit(#[from] FitError),
}

/// Low-level failure of the regression fit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("feature matrix is singular (column '{column}' is collinear or constant)")]
    Singular { column: String },

    #[error("non-finite value in feature matrix or target")]
    NonFinite,

    #[error("least-squares solver failed: {0}")]
    Solver(String),
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
