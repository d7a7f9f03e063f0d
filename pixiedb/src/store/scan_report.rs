use crate::collection::Collection;
use crate::errors::PixieError;
use std::path::{Path, PathBuf};

/// A file that could not be loaded during a directory scan.
#[derive(Debug, Clone)]
pub struct ScanFailure {
    path: PathBuf,
    error: PixieError,
}

impl ScanFailure {
    pub fn new(path: PathBuf, error: PixieError) -> Self {
        ScanFailure { path, error }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn error(&self) -> &PixieError {
        &self.error
    }
}

/// Outcome of [`PixieStore::find_all_by_name`](crate::store::PixieStore::find_all_by_name).
///
/// One corrupt file never fails a scan. Collections that loaded are returned
/// alongside the files that did not, each with the error that stopped it.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    collections: Vec<Collection>,
    failures: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn new() -> Self {
        ScanReport::default()
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn failures(&self) -> &[ScanFailure] {
        &self.failures
    }

    /// True when every candidate file loaded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Drops the failures and keeps the loaded collections.
    pub fn into_collections(self) -> Vec<Collection> {
        self.collections
    }

    pub(crate) fn push_collection(&mut self, collection: Collection) {
        self.collections.push(collection);
    }

    pub(crate) fn push_failure(&mut self, path: PathBuf, error: PixieError) {
        self.failures.push(ScanFailure::new(path, error));
    }
}
