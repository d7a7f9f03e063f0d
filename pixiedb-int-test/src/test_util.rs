use pixiedb::collection::{Collection, Document};
use pixiedb::errors::{ErrorKind, PixieError, PixieResult};
use pixiedb::map;
use pixiedb::store::PixieStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Runs `test` against a context made by `before`, always calling `after`.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> PixieResult<()>,
    B: Fn() -> PixieResult<TestContext>,
    A: Fn(TestContext) -> PixieResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let result = test(ctx.clone());
    let after_result = after(ctx);

    if let Err(e) = result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    dir: Arc<TempDir>,
    store: PixieStore,
}

impl TestContext {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> PixieStore {
        self.store.clone()
    }

    /// Path of a file inside the store directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Creates a store over a fresh temporary directory.
pub fn create_test_context() -> PixieResult<TestContext> {
    let dir = tempfile::Builder::new()
        .prefix("pixiedb-")
        .tempdir()
        .map_err(|e| {
            PixieError::new_with_cause(
                "Failed to create test directory",
                ErrorKind::IOError,
                PixieError::from(e),
            )
        })?;

    let store = PixieStore::with_config().directory(dir.path()).build();
    Ok(TestContext {
        dir: Arc::new(dir),
        store,
    })
}

/// Removes every file the test left in the store directory.
pub fn cleanup(ctx: TestContext) -> PixieResult<()> {
    if !ctx.path().exists() {
        return Ok(());
    }
    for entry in std::fs::read_dir(ctx.path())? {
        let path = entry?.path();
        if path.is_dir() {
            std::fs::remove_dir_all(path)?;
        } else {
            std::fs::remove_file(path)?;
        }
    }
    Ok(())
}

/// A root "users" collection; Alice owns a "logs" sub-collection with a
/// login and a logout entry.
pub fn users_with_logs() -> Collection {
    let alice = Document::new(map! { "name": "Alice" }).with_sub_collection(
        Collection::new("logs")
            .with_document(Document::new(map! { "action": "login" }))
            .with_document(Document::new(map! { "action": "logout" })),
    );

    Collection::new("users")
        .with_document(alice)
        .with_document(Document::new(map! { "name": "Bob" }))
}

/// A chain of `depth` nested sub-collections named "level", one document each.
pub fn nested_document(depth: usize) -> Document {
    let mut document = Document::new(map! { "level": (depth as i64) });
    for level in (0..depth).rev() {
        document = Document::new(map! { "level": (level as i64) })
            .with_sub_collection(Collection::new("level").with_document(document));
    }
    document
}

/// Depth of the "level" chain built by [nested_document].
pub fn nesting_depth(document: &Document) -> usize {
    let mut depth = 0;
    let mut current = document;
    while let Some(next) = current
        .sub_collection("level")
        .and_then(|c| c.documents().first())
    {
        depth += 1;
        current = next;
    }
    depth
}
