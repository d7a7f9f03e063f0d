use crate::codec::{put_len, wire_len, ByteReader};
use crate::collection::Document;
use crate::common::{generate_id, Value, LENGTH_PREFIX_SIZE, MAX_NESTING_DEPTH};
use crate::errors::{ErrorKind, PixieError, PixieResult};
use std::fmt::Display;

/// An ordered sequence of [Document]s with a name and an identity.
///
/// A collection is either a root, or a sub-collection owned by a document. The
/// owner is remembered by id only (`parent_id`), so the tree has a single
/// ownership direction: document to collection. Only root collections can be
/// persisted by [`crate::store::PixieStore`].
///
/// Queries run over the in-memory documents in insertion order. Lookups are
/// linear scans; there is no index.
///
/// # Wire format
///
/// ```text
/// [u32 document count]
/// repeated: [u32 document byte length][encoded document]
/// ```
///
/// The name is not part of a collection's own encoding. It is carried by the
/// containing document (or by the file header for root collections).
///
/// # Examples
///
/// ```rust
/// use pixiedb::collection::{Collection, Document};
/// use pixiedb::{map, val};
///
/// let users = Collection::new("users")
///     .with_document(Document::new(map! { "name": "Alice", "age": 30 }))
///     .with_document(Document::new(map! { "name": "Bob", "age": 25 }));
///
/// let bob = users.find_first(|d| d.get("name") == Some(&val!("Bob")));
/// assert!(bob.is_some());
/// assert!(users.has_matching(|d| d.get("age") == Some(&val!(30))));
/// ```
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    id: String,
    documents: Vec<Document>,
    parent: Option<String>,
}

impl Collection {
    /// Creates an empty root collection with a generated identity.
    pub fn new(name: impl Into<String>) -> Self {
        Collection::with_id(name, generate_id())
    }

    /// Creates an empty root collection with an explicit identity.
    pub fn with_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Collection {
            name: name.into(),
            id: id.into(),
            documents: Vec::new(),
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Id of the document holding this collection, `None` for a root.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Appends a document and returns `self` for chaining.
    pub fn add_document(&mut self, document: Document) -> &mut Self {
        self.documents.push(document);
        self
    }

    /// Consuming variant of [Collection::add_document].
    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    /// All documents accepted by `predicate`, in insertion order.
    pub fn documents_matching<F>(&self, mut predicate: F) -> Vec<&Document>
    where
        F: FnMut(&Document) -> bool,
    {
        self.documents.iter().filter(|&doc| predicate(doc)).collect()
    }

    pub fn document_by_id(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id() == id)
    }

    /// First document accepted by `predicate`. Stops at the first match.
    pub fn find_first<F>(&self, mut predicate: F) -> Option<&Document>
    where
        F: FnMut(&Document) -> bool,
    {
        self.documents.iter().find(|&doc| predicate(doc))
    }

    /// Whether any document is accepted by `predicate`. Stops at the first match.
    pub fn has_matching<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&Document) -> bool,
    {
        self.documents.iter().any(|doc| predicate(doc))
    }

    /// Encodes the documents of this collection, recursively.
    ///
    /// Fails with [ErrorKind::EncodingError] when sub-collections nest deeper
    /// than decoding accepts.
    pub fn to_bytes(&self) -> PixieResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, 0)?;
        Ok(buf)
    }

    /// Decodes a collection from the start of `bytes`, returning it with the
    /// number of bytes consumed.
    ///
    /// The result is a root collection with a fresh identity and an empty
    /// name; callers that know the name (the containing document, the file
    /// header) assign it.
    pub fn from_bytes_with_offset(bytes: &[u8]) -> PixieResult<(Collection, usize)> {
        let mut reader = ByteReader::new(bytes);
        let collection = Collection::read_from(&mut reader, 0)?;
        Ok((collection, reader.position()))
    }

    /// Renders the documents as an array of plain value trees.
    pub fn to_list(&self) -> Value {
        Value::Array(self.documents.iter().map(Document::to_value).collect())
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = id;
    }

    pub(crate) fn attach_to(&mut self, parent_id: &str) {
        if let Some(previous) = &self.parent {
            log::debug!(
                "Collection {} moves from document {} to {}",
                self.name,
                previous,
                parent_id
            );
        }
        self.parent = Some(parent_id.to_string());
    }

    /// Appends the encoding to `buf`. On error `buf` may hold a partial
    /// encoding and must be discarded.
    pub(crate) fn write_to(&self, buf: &mut Vec<u8>, depth: usize) -> PixieResult<()> {
        if depth > MAX_NESTING_DEPTH {
            log::error!(
                "Collection {} nests sub-collections deeper than {} levels",
                self.name,
                MAX_NESTING_DEPTH
            );
            return Err(PixieError::new(
                &format!(
                    "Collection {} nests sub-collections deeper than {} levels",
                    self.name, MAX_NESTING_DEPTH
                ),
                ErrorKind::EncodingError,
            ));
        }

        put_len(buf, wire_len(self.documents.len(), "Document count")?);
        for document in &self.documents {
            // length placeholder, patched once the document is written
            let start = buf.len();
            put_len(buf, 0);
            document.write_to(buf, depth)?;

            let len = wire_len(buf.len() - start - LENGTH_PREFIX_SIZE, "Document")?;
            buf[start..start + LENGTH_PREFIX_SIZE].copy_from_slice(&len.to_le_bytes());
        }
        Ok(())
    }

    pub(crate) fn read_from(reader: &mut ByteReader<'_>, depth: usize) -> PixieResult<Collection> {
        if depth > MAX_NESTING_DEPTH {
            log::error!("Sub-collection nesting exceeds {} levels", MAX_NESTING_DEPTH);
            return Err(PixieError::new(
                &format!("Sub-collection nesting exceeds {} levels", MAX_NESTING_DEPTH),
                ErrorKind::MalformedInput,
            ));
        }

        let count = reader.read_len()?;
        let mut collection = Collection::new(String::new());
        // smallest document: length prefix, bool value, sub-collection count
        collection
            .documents
            .reserve(reader.capacity_hint(count, 2 * LENGTH_PREFIX_SIZE + 2));

        for index in 0..count {
            let len = reader.read_len()?;
            let offset = reader.position();
            let mut document_reader = ByteReader::new(reader.read_bytes(len)?);
            let document = Document::read_from(&mut document_reader, depth)?;

            if document_reader.position() != len {
                log::error!(
                    "Document {} at offset {} declares {} bytes but encodes {}",
                    index,
                    offset,
                    len,
                    document_reader.position()
                );
                return Err(PixieError::new(
                    &format!(
                        "Document {} at offset {} declares {} bytes but encodes {}",
                        index,
                        offset,
                        len,
                        document_reader.position()
                    ),
                    ErrorKind::MalformedInput,
                ));
            }
            collection.documents.push(document);
        }
        Ok(collection)
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Collection(name={:?}, documents={})",
            self.name,
            self.to_list()
        )
    }
}
