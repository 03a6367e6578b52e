//! JSON file storage implementation
//!
//! The whole store lives in memory for the duration of a run. The backing
//! file is a single pretty-printed JSON object keyed by identity; keys are
//! kept sorted so an unchanged store serializes to identical bytes.

use crate::storage::traits::RecordStore;
use crate::storage::RentalRecord;
use crate::{StoreError, StoreResult};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// JSON file backed record store
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: BTreeMap<String, RentalRecord>,
}

impl JsonStore {
    /// Opens the store at `path`, loading every record into memory
    ///
    /// A missing file is treated as an empty store (first run). A file that
    /// exists but cannot be parsed is fatal: the caller must not continue
    /// and later overwrite it.
    ///
    /// # Returns
    ///
    /// * `Ok(JsonStore)` - Store loaded (possibly empty)
    /// * `Err(StoreError::Corrupt)` - The file is not a valid store
    /// * `Err(StoreError::Io)` - The file exists but could not be read
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No store at {}, starting empty", path.display());
                return Ok(Self {
                    path,
                    records: BTreeMap::new(),
                });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let records: BTreeMap<String, RentalRecord> = serde_json::from_str(&content)
            .map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?;

        tracing::info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self { path, records })
    }

    /// Returns up to `n` records ordered by `compare`
    pub fn take<F>(&self, n: usize, mut compare: F) -> Vec<(&str, &RentalRecord)>
    where
        F: FnMut(&RentalRecord, &RentalRecord) -> Ordering,
    {
        let mut entries: Vec<(&str, &RentalRecord)> = self
            .records
            .iter()
            .map(|(identity, record)| (identity.as_str(), record))
            .collect();
        entries.sort_by(|a, b| compare(a.1, b.1));
        entries.truncate(n);
        entries
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl RecordStore for JsonStore {
    fn get(&self, identity: &str) -> Option<&RentalRecord> {
        self.records.get(identity)
    }

    fn set(&mut self, identity: &str, record: RentalRecord) {
        self.records.insert(identity.to_string(), record);
    }

    /// Writes the full mapping to a sibling temp file, then renames it over
    /// the canonical file so readers only ever see a complete store.
    fn save(&mut self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }

        let temp_path = self.temp_path();
        let file = File::create(&temp_path).map_err(|e| self.io_error(&temp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.records)?;
        writer
            .flush()
            .map_err(|e| self.io_error(&temp_path, e))?;
        drop(writer);

        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(&self.path, e))?;

        tracing::debug!(
            "Saved {} records to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
