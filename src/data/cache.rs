//! Dataset Cache
//! Prepared frames memoized per source file, shared read-only across threads.

use super::preparer::{prepare_dataset, ParseError};
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Prepared datasets keyed by canonical source path.
///
/// Entries are immutable once inserted. Use [`DatasetCache::invalidate`] to
/// force a file to be read again.
#[derive(Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<PathBuf, Arc<DataFrame>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached frame for `path`, preparing it on first use.
    pub fn get_or_prepare(&self, path: &Path) -> Result<Arc<DataFrame>, ParseError> {
        let key = Self::key(path);

        if let Some(df) = self.read_entries().get(&key) {
            log::info!("Dataset cache hit for {}", key.display());
            return Ok(Arc::clone(df));
        }

        log::info!("Dataset cache miss for {}", key.display());
        let df = Arc::new(prepare_dataset(&key)?);

        // Another thread may have prepared the same file meanwhile; keep the first.
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(Arc::clone(entries.entry(key).or_insert(df)))
    }

    /// Drop the cached frame for `path`. Returns whether one was present.
    pub fn invalidate(&self, path: &Path) -> bool {
        let key = Self::key(path);
        let removed = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&key)
            .is_some();
        if removed {
            log::info!("Invalidated cached dataset {}", key.display());
        }
        removed
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<PathBuf, Arc<DataFrame>>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Source identity: the canonical path when it resolves, else the path as given.
    fn key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "company,country,vertical,status,raised_usd,valuation_usd,unicorn_month"
        )
        .unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_second_lookup_shares_frame() {
        let file = write_csv(&["Bolt,Estonia,Mobility,Active,$2B,$8.4B,May 2018"]);
        let cache = DatasetCache::new();

        let first = cache.get_or_prepare(file.path()).unwrap();
        let second = cache.get_or_prepare(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_rereads_file() {
        let mut file = write_csv(&["Bolt,Estonia,Mobility,Active,$2B,$8.4B,May 2018"]);
        let cache = DatasetCache::new();
        assert_eq!(cache.get_or_prepare(file.path()).unwrap().height(), 1);

        writeln!(file, "Wise,United Kingdom,Fintech,Exited,$1.3B,$11B,May 2017").unwrap();
        file.flush().unwrap();

        // Still served from cache until invalidated.
        assert_eq!(cache.get_or_prepare(file.path()).unwrap().height(), 1);
        assert!(cache.invalidate(file.path()));
        assert_eq!(cache.get_or_prepare(file.path()).unwrap().height(), 2);
        assert!(!cache.invalidate(Path::new("/not/cached.csv")));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = DatasetCache::new();
        assert!(cache.get_or_prepare(Path::new("/missing/data.csv")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let file = write_csv(&["Bolt,Estonia,Mobility,Active,$2B,$8.4B,May 2018"]);
        let cache = DatasetCache::new();
        cache.get_or_prepare(file.path()).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
