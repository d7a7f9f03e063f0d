//! Document tree: [Document]s hold a value and named sub-collections,
//! [Collection]s hold an ordered sequence of documents.
//!
//! Ownership runs one way only, from a document to the collections attached
//! to it. A sub-collection refers back to its owner by document id.

mod document;
mod pixie_collection;

pub use document::*;
pub use pixie_collection::*;
