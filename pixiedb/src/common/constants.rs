// value type tags
pub const TAG_I64: u8 = 1;
pub const TAG_F64: u8 = 2;
pub const TAG_STRING: u8 = 3;
pub const TAG_BOOL: u8 = 4;
pub const TAG_TIMESTAMP: u8 = 5;
/// Reserved, never assigned to a value type. Decoding it is an error.
pub const TAG_RESERVED: u8 = 6;
pub const TAG_ARRAY: u8 = 7;
pub const TAG_MAP: u8 = 8;

// wire constants
pub const LENGTH_PREFIX_SIZE: usize = 4;
pub const MAX_NESTING_DEPTH: usize = 128;

// store constants
pub const FILE_MAGIC: [u8; 4] = *b"PXDB";
pub const FORMAT_VERSION: u8 = 1;
pub const FILE_EXTENSION: &str = "bin";
pub const NAME_SEPARATOR: &str = "_";
pub const DEFAULT_STORE_DIR: &str = "./.pixiedb_collections";

// rendering keys
pub const DOC_ID: &str = "id";
pub const DOC_DATA: &str = "data";
pub const DOC_SUB_COLLECTIONS: &str = "subcollections";

// tag 6 must stay unassigned
const _: () = {
    const TAGS: [u8; 7] = [
        TAG_I64,
        TAG_F64,
        TAG_STRING,
        TAG_BOOL,
        TAG_TIMESTAMP,
        TAG_ARRAY,
        TAG_MAP,
    ];
    let mut i = 0;
    while i < TAGS.len() {
        assert!(TAGS[i] != TAG_RESERVED);
        i += 1;
    }
};
