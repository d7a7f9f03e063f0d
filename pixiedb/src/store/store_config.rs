use crate::common::{atomic, Atomic, DEFAULT_STORE_DIR};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration of a [`PixieStore`](crate::store::PixieStore).
///
/// Uses the PIMPL pattern: clones share one `Arc<StoreConfigInner>`. Setters
/// are crate-private; the public way to configure a store is
/// [`PixieStore::with_config`](crate::store::PixieStore::with_config).
///
/// Defaults:
/// - directory: `./.pixiedb_collections`
/// - create_directory: `true`
#[derive(Clone)]
pub struct StoreConfig {
    inner: Arc<StoreConfigInner>,
}

impl StoreConfig {
    #[inline]
    pub fn new() -> StoreConfig {
        StoreConfig {
            inner: Arc::new(StoreConfigInner::new()),
        }
    }

    /// Directory holding the collection files.
    #[inline]
    pub fn directory(&self) -> PathBuf {
        self.inner.directory()
    }

    #[inline]
    pub(crate) fn set_directory(&self, directory: PathBuf) {
        self.inner.set_directory(directory)
    }

    /// Whether `save` creates a missing directory.
    #[inline]
    pub fn create_directory(&self) -> bool {
        self.inner.create_directory()
    }

    #[inline]
    pub(crate) fn set_create_directory(&self, value: bool) {
        self.inner.set_create_directory(value)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new()
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("directory", &self.directory())
            .field("create_directory", &self.create_directory())
            .finish()
    }
}

struct StoreConfigInner {
    directory: Atomic<PathBuf>,
    create_directory: AtomicBool,
}

impl StoreConfigInner {
    fn new() -> StoreConfigInner {
        StoreConfigInner {
            directory: atomic(PathBuf::from(DEFAULT_STORE_DIR)),
            create_directory: AtomicBool::new(true),
        }
    }

    #[inline]
    fn directory(&self) -> PathBuf {
        self.directory.read().clone()
    }

    #[inline]
    fn set_directory(&self, directory: PathBuf) {
        *self.directory.write() = directory;
    }

    #[inline]
    fn create_directory(&self) -> bool {
        self.create_directory.load(Ordering::Relaxed)
    }

    #[inline]
    fn set_create_directory(&self, value: bool) {
        self.create_directory.store(value, Ordering::Relaxed)
    }
}
