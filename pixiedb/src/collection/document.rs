use crate::codec::{encode_value_into, put_len, put_str, read_value, wire_len, ByteReader};
use crate::collection::Collection;
use crate::common::{
    generate_id, prune_empty_sub_collections, Value, ValueMap, DOC_DATA, DOC_ID,
    DOC_SUB_COLLECTIONS,
};
use crate::errors::{ErrorKind, PixieError, PixieResult};
use indexmap::IndexMap;
use std::fmt::Display;

/// A node of the document tree: a [Value] payload plus named sub-collections.
///
/// Every document has an identity, generated as a random UUID unless supplied
/// with [Document::with_id]. The payload is usually a [Value::Map] and defaults
/// to an empty one.
///
/// A document owns its sub-collections exclusively, at most one per name.
/// Attaching a collection under a name that is already taken replaces the
/// previous one. Attaching also records this document's id as the
/// collection's parent, which makes the collection non-persistable on its own
/// (see [`crate::store::PixieStore::save`]).
///
/// # Wire format
///
/// ```text
/// [encoded value]
/// [u32 sub-collection count]
/// repeated: [u32 name length][name bytes][encoded collection]
/// ```
///
/// The identity is not part of the encoding: a decoded document always gets a
/// fresh id.
///
/// # Examples
///
/// ```rust
/// use pixiedb::collection::{Collection, Document};
/// use pixiedb::map;
///
/// let alice = Document::new(map! { "name": "Alice", "age": 30 }).with_sub_collection(
///     Collection::new("logs")
///         .with_document(Document::new(map! { "action": "login" }))
///         .with_document(Document::new(map! { "action": "logout" })),
/// );
///
/// let logs = alice.sub_collection("logs").unwrap();
/// assert_eq!(logs.len(), 2);
/// assert_eq!(logs.parent_id(), Some(alice.id()));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    value: Value,
    sub_collections: IndexMap<String, Collection>,
}

impl Document {
    /// Creates a document with a generated identity.
    pub fn new<T: Into<Value>>(value: T) -> Self {
        Document::with_id(generate_id(), value)
    }

    /// Creates a document with an explicit identity.
    pub fn with_id<T: Into<Value>>(id: impl Into<String>, value: T) -> Self {
        Document {
            id: id.into(),
            value: value.into(),
            sub_collections: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replaces the payload.
    pub fn set_value<T: Into<Value>>(&mut self, value: T) -> &mut Self {
        self.value = value.into();
        self
    }

    /// Looks up a key of a map payload.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    /// Attaches `collection` under its own name and returns `self` for chaining.
    pub fn add_sub_collection(&mut self, mut collection: Collection) -> &mut Self {
        collection.attach_to(&self.id);
        let name = collection.name().to_string();
        if let Some(previous) = self.sub_collections.insert(name, collection) {
            log::warn!(
                "Sub-collection {} of document {} replaced (previous id {})",
                previous.name(),
                self.id,
                previous.id()
            );
        }
        self
    }

    /// Consuming variant of [Document::add_sub_collection].
    pub fn with_sub_collection(mut self, collection: Collection) -> Self {
        self.add_sub_collection(collection);
        self
    }

    pub fn sub_collection(&self, name: &str) -> Option<&Collection> {
        self.sub_collections.get(name)
    }

    pub fn sub_collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.sub_collections.get_mut(name)
    }

    /// Sub-collections in attachment order.
    pub fn sub_collections(&self) -> impl Iterator<Item = &Collection> {
        self.sub_collections.values()
    }

    pub fn sub_collection_count(&self) -> usize {
        self.sub_collections.len()
    }

    /// Encodes the document and, recursively, all of its sub-collections.
    pub fn to_bytes(&self) -> PixieResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, 0)?;
        Ok(buf)
    }

    /// Decodes a document from the start of `bytes`, returning it with the
    /// number of bytes consumed.
    pub fn from_bytes(bytes: &[u8]) -> PixieResult<(Document, usize)> {
        let mut reader = ByteReader::new(bytes);
        let document = Document::read_from(&mut reader, 0)?;
        Ok((document, reader.position()))
    }

    /// Renders the document as a plain value tree:
    /// `{"id": .., "data": .., "subcollections": {name: [documents..]}}`.
    pub fn to_value(&self) -> Value {
        let sub_collections: ValueMap = self
            .sub_collections
            .iter()
            .map(|(name, collection)| (Value::from(name.as_str()), collection.to_list()))
            .collect();

        let mut map = ValueMap::new();
        map.insert(Value::from(DOC_ID), Value::from(self.id.as_str()));
        map.insert(Value::from(DOC_DATA), self.value.clone());
        map.insert(Value::from(DOC_SUB_COLLECTIONS), Value::Map(sub_collections));
        Value::Map(map)
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>, depth: usize) -> PixieResult<()> {
        encode_value_into(&self.value, buf)?;
        put_len(buf, wire_len(self.sub_collections.len(), "Sub-collection count")?);
        for (name, collection) in &self.sub_collections {
            wire_len(name.len(), "Sub-collection name")?;
            put_str(buf, name);
            collection.write_to(buf, depth + 1)?;
        }
        Ok(())
    }

    pub(crate) fn read_from(reader: &mut ByteReader<'_>, depth: usize) -> PixieResult<Document> {
        let value = read_value(reader)?;
        let mut document = Document::new(value);

        let count = reader.read_len()?;
        for _ in 0..count {
            let name_offset = reader.position();
            let name = reader.read_string()?;
            if document.sub_collections.contains_key(&name) {
                log::error!("Duplicate sub-collection {:?} at offset {}", name, name_offset);
                return Err(PixieError::new(
                    &format!("Duplicate sub-collection {:?} at offset {}", name, name_offset),
                    ErrorKind::MalformedInput,
                ));
            }

            let mut collection = Collection::read_from(reader, depth + 1)?;
            collection.set_name(name);
            document.add_sub_collection(collection);
        }
        Ok(document)
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new(Value::default())
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pruned = prune_empty_sub_collections(self.to_value());
        write!(f, "Document({})", pruned)
    }
}
