use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use trend_analyzer::accounts::UserRegistry;
use trend_analyzer::data::filter::{filtered_indices, init_filter_state, DateRange, FilterState};
use trend_analyzer::data::stats::CorrelationMatrix;
use trend_analyzer::{Analyzer, AnalyzerConfig, CellValue, ColumnKind, Dataset, PredictionResult, QueryResult};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Pages and chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Account,
    Dashboard,
    TrendAnalyzer,
    SearchCompare,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Account,
        Page::Dashboard,
        Page::TrendAnalyzer,
        Page::SearchCompare,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Account => "Login / Register",
            Page::Dashboard => "Dashboard",
            Page::TrendAnalyzer => "Trend Analyzer",
            Page::SearchCompare => "Search & Comparative Analysis",
        }
    }

    pub fn requires_login(self) -> bool {
        !matches!(self, Page::Account)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Pie,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Pie => "Pie Chart",
        }
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AccountForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct SearchForm {
    pub column: String,
    pub pattern: String,
    pub result: Option<QueryResult>,
}

#[derive(Debug, Default)]
pub struct CompareForm {
    pub target: String,
    pub group_by: String,
    pub result: Option<QueryResult>,
}

#[derive(Debug, Default)]
pub struct PredictForm {
    pub target: String,
    pub features: BTreeSet<String>,
    pub result: Option<PredictionResult>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub analyzer: Analyzer,
    pub users: UserRegistry,
    /// Logged-in user.
    pub user: Option<String>,
    pub page: Page,
    pub account_form: AccountForm,

    /// Snapshot of the active dataset (None until user loads a file).
    pub dataset: Option<Arc<Dataset>>,

    /// Per-column filter selections.
    pub filters: FilterState,

    /// Date window applied on top of `filters`.
    pub date_range: DateRange,

    /// Text typed into the from / to date boxes.
    pub date_inputs: [String; 2],

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub chart: ChartKind,
    pub x_column: Option<String>,
    pub y_column: Option<String>,

    /// Which categorical column is used for colouring.
    pub color_column: Option<String>,

    /// Active colour map.
    pub color_map: Option<ColorMap>,

    pub correlations: Option<CorrelationMatrix>,

    /// Numeric column summed per day on the trend page.
    pub trend_column: Option<String>,

    pub search: SearchForm,
    pub compare: CompareForm,
    pub predict: PredictForm,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AnalyzerConfig) -> Self {
        let target = config.prediction.target_column.clone();
        Self {
            analyzer: Analyzer::new(config),
            users: UserRegistry::new(),
            user: None,
            page: Page::Account,
            account_form: AccountForm::default(),
            dataset: None,
            filters: FilterState::default(),
            date_range: DateRange::default(),
            date_inputs: Default::default(),
            visible_indices: Vec::new(),
            chart: ChartKind::Line,
            x_column: None,
            y_column: None,
            color_column: None,
            color_map: None,
            correlations: None,
            trend_column: None,
            search: SearchForm::default(),
            compare: CompareForm::default(),
            predict: PredictForm {
                target,
                ..PredictForm::default()
            },
            status_message: None,
        }
    }

    // -- accounts --

    pub fn register(&mut self) {
        let form = &self.account_form;
        match self.users.register(&form.username, &form.password) {
            Ok(()) => self.status_message = Some("User registered successfully!".into()),
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    pub fn login(&mut self) {
        let form = &self.account_form;
        if self.users.authenticate(&form.username, &form.password) {
            log::info!("User {} logged in", form.username);
            self.user = Some(form.username.clone());
            self.account_form.password.clear();
            self.status_message = None;
            self.page = Page::Dashboard;
        } else {
            self.status_message = Some("Invalid credentials".into());
        }
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.page = Page::Account;
    }

    // -- dataset --

    /// Read a CSV file and make it the active dataset.
    pub fn load_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let dataset = self
            .analyzer
            .load(std::io::BufReader::new(file))
            .with_context(|| format!("loading {}", path.display()))?;
        self.set_dataset(dataset);
        Ok(())
    }

    /// Ingest a newly loaded dataset, initialise filters, chart axes and colour.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filters = init_filter_state(&dataset);
        self.date_range = DateRange::default();
        self.date_range.column = first_of_kind(&dataset, |k| k == ColumnKind::Date);
        self.date_inputs = Default::default();
        self.visible_indices = (0..dataset.len()).collect();

        let numeric = dataset.numeric_columns();
        self.x_column = self
            .date_range
            .column
            .clone()
            .or_else(|| numeric.first().map(|s| s.to_string()));
        self.y_column = numeric.last().map(|s| s.to_string());
        self.trend_column = numeric.first().map(|s| s.to_string());

        // Default colour column: first categorical column (if any).
        self.color_column = first_of_kind(&dataset, |k| k == ColumnKind::Text);
        self.rebuild_color_map(&dataset);

        let names = dataset.column_names();
        let first = names.first().cloned().unwrap_or_default();
        self.search = SearchForm {
            column: first.clone(),
            ..SearchForm::default()
        };
        self.compare = CompareForm {
            target: numeric.first().map(|s| s.to_string()).unwrap_or_default(),
            group_by: self.color_column.clone().unwrap_or(first),
            result: None,
        };
        self.predict.features.clear();
        self.predict.result = None;

        self.dataset = Some(dataset);
        self.refresh_correlations();
        self.status_message = None;
    }

    /// Rebuild the colour map from the current `color_column`.
    pub fn rebuild_color_map(&mut self, dataset: &Dataset) {
        self.color_map = self.color_column.as_ref().and_then(|col| {
            dataset
                .unique_values(col)
                .map(|vals| ColorMap::new(col, vals))
        });
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters, &self.date_range);
        }
        self.refresh_correlations();
    }

    fn refresh_correlations(&mut self) {
        self.correlations = match self.analyzer.correlations(&self.filters, &self.date_range) {
            Ok(m) => Some(m),
            Err(e) => {
                log::debug!("No correlations: {e}");
                None
            }
        };
    }

    /// Set colour column and rebuild the map.
    pub fn set_color_column(&mut self, col: String) {
        self.color_column = Some(col);
        if let Some(ds) = self.dataset.clone() {
            self.rebuild_color_map(&ds);
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        let selected = self.filters.entry(column.to_string()).or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(ds) = &self.dataset {
            if let Some(all_vals) = ds.unique_values(column) {
                self.filters.insert(column.to_string(), all_vals.clone());
                self.refilter();
            }
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        self.filters.insert(column.to_string(), BTreeSet::new());
        self.refilter();
    }

    // -- queries --

    pub fn run_search(&mut self) {
        match self.analyzer.search(&self.search.column, &self.search.pattern) {
            Ok(res) => {
                self.status_message = res
                    .is_empty()
                    .then(|| "No data found for your search.".to_string());
                self.search.result = Some(res);
            }
            Err(e) => self.report(e),
        }
    }

    pub fn run_compare(&mut self) {
        match self.analyzer.compare(&self.compare.target, &self.compare.group_by) {
            Ok(res) => {
                self.compare.result = Some(res);
                self.status_message = None;
            }
            Err(e) => self.report(e),
        }
    }

    pub fn run_predict(&mut self) {
        let features: Vec<&str> = self.predict.features.iter().map(String::as_str).collect();
        match self.analyzer.predict(&features, Some(self.predict.target.as_str())) {
            Ok(res) => {
                self.predict.result = Some(res);
                self.status_message = None;
            }
            Err(e) => {
                self.predict.result = None;
                self.report(e);
            }
        }
    }

    fn report(&mut self, err: impl std::fmt::Display) {
        log::error!("{err}");
        self.status_message = Some(format!("Error: {err}"));
    }
}

fn first_of_kind(dataset: &Dataset, pred: impl Fn(ColumnKind) -> bool) -> Option<String> {
    dataset
        .columns()
        .iter()
        .find(|c| pred(c.kind))
        .map(|c| c.name.clone())
}
