use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::error::DataError;
use super::loader::load_table;
use super::model::{Table, TableSchema};

type CacheKey = (PathBuf, String);

/// Loaded sheets keyed by (resource, sheet), kept for the life of the process.
///
/// Entries are written once and only read afterwards. Failed loads are not
/// stored, so fixing the file and opening it again retries the read.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: Mutex<HashMap<CacheKey, Arc<Table>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached sheet, reading it from `resource` on first use.
    pub fn get_or_load(
        &self,
        resource: &Path,
        sheet: &str,
        schema: &TableSchema,
    ) -> Result<Arc<Table>, DataError> {
        let key = (canonical(resource), sheet.to_string());

        if let Some(table) = self.lock().get(&key) {
            log::debug!("Cache hit for sheet '{}' of {}", key.1, key.0.display());
            return Ok(Arc::clone(table));
        }

        // Read outside the lock; a concurrent loader of the same key loses the
        // race below and adopts the stored table.
        let table = Arc::new(load_table(resource, sheet, schema)?);
        let mut tables = self.lock();
        Ok(Arc::clone(tables.entry(key).or_insert(table)))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Arc<Table>>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `data.xlsx` and `./data.xlsx` name the same resource. Paths that cannot be
/// resolved are kept as given; the loader reports them.
fn canonical(resource: &Path) -> PathBuf {
    std::fs::canonicalize(resource).unwrap_or_else(|_| resource.to_path_buf())
}
