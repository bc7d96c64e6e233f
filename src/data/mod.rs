/// Data layer: core types, loading, the active-dataset store, filtering and
/// summary statistics.
///
/// Architecture:
/// ```text
///   CSV bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + infer column kinds → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  one active Arc<Dataset>, swapped on load
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  categorical / date predicates → row indices
///   │  stats    │  correlation matrix over numeric columns
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod store;
