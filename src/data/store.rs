use std::io::Read;
use std::sync::{Arc, PoisonError, RwLock};

use super::loader;
use super::model::Dataset;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// DatasetStore – the single active dataset
// ---------------------------------------------------------------------------

/// Holds at most one dataset. A new load replaces the previous one.
///
/// Readers receive an `Arc` snapshot, so an operation that started before a
/// replacement keeps working on the dataset it began with.
#[derive(Debug, Default)]
pub struct DatasetStore {
    active: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source` and make it the active dataset.
    ///
    /// Parsing happens before the write lock is taken; on error the previous
    /// dataset stays active.
    pub fn load<R: Read>(&self, source: R) -> Result<Arc<Dataset>> {
        let dataset = Arc::new(loader::parse_csv(source)?);
        self.replace(Arc::clone(&dataset));
        log::info!(
            "Loaded dataset with {} rows and columns {:?}",
            dataset.len(),
            dataset.column_names()
        );
        Ok(dataset)
    }

    /// Install an already-built dataset.
    pub fn replace(&self, dataset: Arc<Dataset>) {
        let mut guard = self.active.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            log::debug!("Replacing previously loaded dataset");
        }
        *guard = Some(dataset);
    }

    /// The active dataset.
    pub fn current(&self) -> Result<Arc<Dataset>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AnalysisError::NoDatasetLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_before_load_fails() {
        let store = DatasetStore::new();
        assert!(matches!(
            store.current(),
            Err(AnalysisError::NoDatasetLoaded)
        ));
    }

    #[test]
    fn load_replaces_wholesale() {
        let store = DatasetStore::new();
        store.load("a\n1\n2\n".as_bytes()).unwrap();
        let first = store.current().unwrap();
        store.load("b,c\nx,1\n".as_bytes()).unwrap();
        let second = store.current().unwrap();

        assert_eq!(first.column_names(), vec!["a"]);
        assert_eq!(second.column_names(), vec!["b", "c"]);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let store = DatasetStore::new();
        store.load("a\n1\n".as_bytes()).unwrap();
        assert!(store.load("a,b\n1\n".as_bytes()).is_err());
        assert_eq!(store.current().unwrap().column_names(), vec!["a"]);
    }
}
