//! File-based persistence of root collections.
//!
//! [PixieStore] is the façade: save a root [Collection](crate::collection::Collection),
//! load one file, scan the directory by collection name, or fetch by id.

mod file_header;
mod pixie_store;
mod scan_report;
mod store_config;

pub use file_header::*;
pub use pixie_store::*;
pub use scan_report::*;
pub use store_config::*;
