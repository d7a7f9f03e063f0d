use crate::codec::ByteReader;
use crate::collection::Collection;
use crate::common::{FILE_EXTENSION, NAME_SEPARATOR};
use crate::errors::{ErrorKind, PixieError, PixieResult};
use crate::store::{FileHeader, ScanReport, StoreConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File-per-collection persistence for root [Collection]s.
///
/// Each root collection is written to `{id}_{name}.bin` inside the configured
/// directory. The file starts with a [FileHeader] carrying the format version,
/// collection id and name, followed by the collection's wire encoding. Names
/// may contain underscores: the file name is only used to pick candidates,
/// identity always comes from the header. Because `x_app` + `users` and
/// `x` + `app_users` share a file name, `save` refuses to replace a file whose
/// header names another collection.
///
/// All operations are blocking and run on the calling thread. There is no
/// locking; one writer per file at a time is assumed.
///
/// # Examples
///
/// ```rust,no_run
/// use pixiedb::collection::{Collection, Document};
/// use pixiedb::map;
/// use pixiedb::store::PixieStore;
///
/// # fn main() -> pixiedb::errors::PixieResult<()> {
/// let store = PixieStore::with_config()
///     .directory("/var/lib/myapp/collections")
///     .build();
///
/// let users = Collection::new("users").with_document(Document::new(map! { "name": "Alice" }));
/// store.save(&users)?;
///
/// let loaded = store.get_by_id("users", users.id())?;
/// assert_eq!(loaded.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PixieStore {
    config: StoreConfig,
}

impl PixieStore {
    /// Creates a store over `directory` with default settings otherwise.
    pub fn new(directory: impl Into<PathBuf>) -> PixieStore {
        PixieStore::with_config().directory(directory).build()
    }

    /// Creates a builder for configuring a store.
    #[inline]
    pub fn with_config() -> PixieStoreBuilder {
        PixieStoreBuilder::new()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn directory(&self) -> PathBuf {
        self.config.directory()
    }

    /// Path that [PixieStore::save] writes `collection` to.
    pub fn file_path(&self, collection: &Collection) -> PathBuf {
        self.directory().join(file_name(collection.id(), collection.name()))
    }

    /// Persists a root collection, replacing any previous file for the same
    /// id and name. Returns the path written.
    ///
    /// Fails with [ErrorKind::OwnershipViolation] for a collection attached to
    /// a document and with [ErrorKind::EncodingError] for a tree nested too
    /// deeply to be read back, both before touching the filesystem. Fails with
    /// [ErrorKind::InvalidOperation] when the target file holds a different
    /// collection.
    pub fn save(&self, collection: &Collection) -> PixieResult<PathBuf> {
        if let Some(parent) = collection.parent_id() {
            log::error!(
                "Collection {} ({}) belongs to document {} and cannot be saved on its own",
                collection.name(),
                collection.id(),
                parent
            );
            return Err(PixieError::new(
                &format!(
                    "Collection {} ({}) belongs to document {} and cannot be saved on its own",
                    collection.name(),
                    collection.id(),
                    parent
                ),
                ErrorKind::OwnershipViolation,
            ));
        }
        validate_file_component(collection.name(), "Collection name")?;
        validate_file_component(collection.id(), "Collection id")?;

        let header = FileHeader::new(collection.id(), collection.name());
        let mut bytes = Vec::with_capacity(header.encoded_len());
        header.write_to(&mut bytes)?;
        collection.write_to(&mut bytes, 0)?;

        let directory = self.directory();
        if self.config.create_directory() {
            fs::create_dir_all(&directory).map_err(|err| {
                log::error!("Failed to create directory {}: {}", directory.display(), err);
                PixieError::new_with_cause(
                    &format!("Failed to create directory {}", directory.display()),
                    ErrorKind::IOError,
                    PixieError::from(err),
                )
            })?;
        }

        let path = directory.join(file_name(collection.id(), collection.name()));
        check_file_owner(&path, collection)?;
        fs::write(&path, &bytes).map_err(|err| {
            log::error!("Failed to write {}: {}", path.display(), err);
            let cause = PixieError::from(err);
            PixieError::new_with_cause(
                &format!("Failed to write {}", path.display()),
                cause.kind().clone(),
                cause,
            )
        })?;

        log::info!(
            "Saved collection {} ({}) with {} documents to {}",
            collection.name(),
            collection.id(),
            collection.len(),
            path.display()
        );
        Ok(path)
    }

    /// Loads one collection file. The result is a root collection whose id
    /// and name come from the file header.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> PixieResult<Collection> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| {
            log::error!("Failed to read {}: {}", path.display(), err);
            let cause = PixieError::from(err);
            PixieError::new_with_cause(
                &format!("Failed to read {}", path.display()),
                cause.kind().clone(),
                cause,
            )
        })?;

        let collection = decode_file(&bytes).map_err(|err| {
            log::error!("Failed to decode {}: {}", path.display(), err);
            PixieError::new_with_cause(
                &format!("Failed to decode {}: {}", path.display(), err),
                err.kind().clone(),
                err,
            )
        })?;

        log::debug!(
            "Loaded collection {} ({}) from {}",
            collection.name(),
            collection.id(),
            path.display()
        );
        Ok(collection)
    }

    /// Loads every collection named `name` in the store directory.
    ///
    /// Files that fail to load are reported in the [ScanReport] and do not
    /// stop the scan. A missing directory yields an empty report. Results are
    /// ordered by file name.
    pub fn find_all_by_name(&self, name: &str) -> PixieResult<ScanReport> {
        validate_file_component(name, "Collection name")?;

        let directory = self.directory();
        let mut report = ScanReport::new();

        let entries = match fs::read_dir(&directory) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("Store directory {} does not exist", directory.display());
                return Ok(report);
            }
            Err(err) => {
                log::error!("Failed to list {}: {}", directory.display(), err);
                let cause = PixieError::from(err);
                return Err(PixieError::new_with_cause(
                    &format!("Failed to list {}", directory.display()),
                    cause.kind().clone(),
                    cause,
                ));
            }
        };

        let suffix = format!("{}{}.{}", NAME_SEPARATOR, name, FILE_EXTENSION);
        let mut candidates = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping unreadable entry in {}: {}", directory.display(), err);
                    report.push_failure(directory.clone(), PixieError::from(err));
                    continue;
                }
            };

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|file| file.len() > suffix.len() && file.ends_with(&suffix));
            if is_file && matches {
                candidates.push(entry.path());
            }
        }
        candidates.sort();

        for path in candidates {
            match self.load_from_file(&path) {
                Ok(collection) if collection.name() == name => report.push_collection(collection),
                Ok(collection) => {
                    log::debug!(
                        "Skipping {}: holds collection {}, not {}",
                        path.display(),
                        collection.name(),
                        name
                    );
                }
                Err(err) => {
                    log::warn!("Skipping {}: {}", path.display(), err);
                    report.push_failure(path, err);
                }
            }
        }

        log::debug!(
            "Found {} collections named {} in {} ({} failures)",
            report.collections().len(),
            name,
            directory.display(),
            report.failure_count()
        );
        Ok(report)
    }

    /// Loads the collection named `name` with identity `id`.
    ///
    /// When the file for `id` exists but cannot be loaded, its error is
    /// returned rather than [ErrorKind::NotFound].
    pub fn get_by_id(&self, name: &str, id: &str) -> PixieResult<Collection> {
        let report = self.find_all_by_name(name)?;
        if let Some(index) = report.collections().iter().position(|c| c.id() == id) {
            return Ok(report.into_collections().swap_remove(index));
        }

        let target = self.directory().join(file_name(id, name));
        if let Some(failure) = report.failures().iter().find(|f| f.path() == target.as_path()) {
            log::error!(
                "Collection {} with id {} could not be loaded: {}",
                name,
                id,
                failure.error()
            );
            return Err(PixieError::new_with_cause(
                &format!("Collection {} with id {} could not be loaded", name, id),
                failure.error().kind().clone(),
                failure.error().clone(),
            ));
        }

        log::error!(
            "Collection {} with id {} not found ({} unreadable candidates)",
            name,
            id,
            report.failure_count()
        );
        let message = format!("Collection {} with id {} not found", name, id);
        match report.failures().first() {
            Some(failure) => Err(PixieError::new_with_cause(
                &message,
                ErrorKind::NotFound,
                failure.error().clone(),
            )),
            None => Err(PixieError::new(&message, ErrorKind::NotFound)),
        }
    }
}

/// Builder for a [PixieStore].
pub struct PixieStoreBuilder {
    config: StoreConfig,
}

impl PixieStoreBuilder {
    #[inline]
    pub fn new() -> PixieStoreBuilder {
        PixieStoreBuilder {
            config: StoreConfig::new(),
        }
    }

    /// Sets the directory holding the collection files.
    pub fn directory(self, directory: impl Into<PathBuf>) -> Self {
        self.config.set_directory(directory.into());
        self
    }

    /// Sets whether `save` creates a missing directory. Defaults to `true`.
    pub fn create_directory(self, value: bool) -> Self {
        self.config.set_create_directory(value);
        self
    }

    pub fn build(self) -> PixieStore {
        PixieStore {
            config: self.config,
        }
    }
}

impl Default for PixieStoreBuilder {
    fn default() -> Self {
        PixieStoreBuilder::new()
    }
}

fn file_name(id: &str, name: &str) -> String {
    format!("{}{}{}.{}", id, NAME_SEPARATOR, name, FILE_EXTENSION)
}

fn validate_file_component(value: &str, what: &str) -> PixieResult<()> {
    if value.is_empty() {
        log::error!("{} cannot be empty", what);
        return Err(PixieError::new(
            &format!("{} cannot be empty", what),
            ErrorKind::InvalidOperation,
        ));
    }

    if value.contains(['/', '\\', '\0']) {
        log::error!("{} {:?} contains a path separator or NUL", what, value);
        return Err(PixieError::new(
            &format!("{} {:?} contains a path separator or NUL", what, value),
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}

/// Fails when `path` already holds a collection other than `collection`.
/// A missing file, or one whose header cannot be read, may be replaced.
fn check_file_owner(path: &Path, collection: &Collection) -> PixieResult<()> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => {
            log::error!("Failed to read {}: {}", path.display(), err);
            let cause = PixieError::from(err);
            return Err(PixieError::new_with_cause(
                &format!("Failed to read {}", path.display()),
                cause.kind().clone(),
                cause,
            ));
        }
    };

    let header = match FileHeader::decode(&bytes) {
        Ok((header, _)) => header,
        Err(err) => {
            log::warn!("Replacing unreadable file {}: {}", path.display(), err);
            return Ok(());
        }
    };

    if header.collection_id() != collection.id() || header.collection_name() != collection.name() {
        log::error!(
            "{} holds collection {} ({}), refusing to replace it with {} ({})",
            path.display(),
            header.collection_name(),
            header.collection_id(),
            collection.name(),
            collection.id()
        );
        return Err(PixieError::new(
            &format!(
                "{} holds collection {} ({}), refusing to replace it with {} ({})",
                path.display(),
                header.collection_name(),
                header.collection_id(),
                collection.name(),
                collection.id()
            ),
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}

fn decode_file(bytes: &[u8]) -> PixieResult<Collection> {
    let mut reader = ByteReader::new(bytes);
    let header = FileHeader::read_from(&mut reader)?;
    let mut collection = Collection::read_from(&mut reader, 0)?;

    if !reader.is_empty() {
        log::error!(
            "{} trailing bytes after collection body at offset {}",
            reader.remaining(),
            reader.position()
        );
        return Err(PixieError::new(
            &format!(
                "{} trailing bytes after collection body at offset {}",
                reader.remaining(),
                reader.position()
            ),
            ErrorKind::MalformedInput,
        ));
    }

    collection.set_id(header.collection_id().to_string());
    collection.set_name(header.collection_name().to_string());
    Ok(collection)
}
