//! # PixieDB - Minimal Embedded Document Store
//!
//! PixieDB keeps small trees of documents in memory and persists them as
//! compact, length-prefixed binary files. It is meant for config-like data,
//! not bulk storage: lookups are linear scans and there is no index.
//!
//! ## Key Features
//!
//! - **Typed values**: integers, floats, strings, booleans, UTC timestamps,
//!   lists and string-keyed maps
//! - **Nested collections**: every document can own named sub-collections,
//!   to any depth
//! - **Self-describing files**: each file carries a header with format
//!   version, collection id and collection name
//! - **Tolerant scans**: a corrupt file is reported, never fatal to a
//!   directory scan
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pixiedb::collection::{Collection, Document};
//! use pixiedb::store::PixieStore;
//! use pixiedb::{map, val};
//!
//! # fn main() -> pixiedb::errors::PixieResult<()> {
//! let store = PixieStore::new("./data");
//!
//! let alice = Document::new(map! { "name": "Alice", "age": 30 }).with_sub_collection(
//!     Collection::new("logs")
//!         .with_document(Document::new(map! { "action": "login" }))
//!         .with_document(Document::new(map! { "action": "logout" })),
//! );
//! let users = Collection::new("users").with_document(alice);
//! store.save(&users)?;
//!
//! let loaded = store.get_by_id("users", users.id())?;
//! let alice = loaded.find_first(|d| d.get("name") == Some(&val!("Alice")));
//! assert!(alice.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`codec`] - Type-tagged binary encoding of values
//! - [`collection`] - Documents and collections, their wire format and rendering
//! - [`common`] - Value model, constants and utilities
//! - [`errors`] - Error types and result definitions
//! - [`store`] - File persistence of root collections

pub mod codec;
pub mod collection;
pub mod common;
pub mod errors;
pub mod store;
