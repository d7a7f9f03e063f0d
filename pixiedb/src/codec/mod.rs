//! Type-tagged binary codec for [`Value`](crate::common::Value)s.
//!
//! Every value starts with a one-byte type tag followed by a tag-specific
//! payload. Fixed-width numbers are little-endian; strings, arrays and maps
//! carry a 4-byte unsigned length or count prefix.
//!
//! | Tag | Type      | Payload                                              |
//! |-----|-----------|------------------------------------------------------|
//! | 1   | Integer   | 8 bytes, `i64`                                       |
//! | 2   | Float     | 8 bytes, IEEE-754 `f64`                              |
//! | 3   | String    | `u32` byte length + UTF-8 bytes                      |
//! | 4   | Boolean   | 1 byte, 0 or 1                                       |
//! | 5   | Timestamp | `i64` seconds since the Unix epoch + `u32` nanos     |
//! | 6   | reserved  | never written, rejected on decode                    |
//! | 7   | List      | `u32` count + encoded elements                       |
//! | 8   | Map       | `u32` count + (`u32` key length + key + value) pairs |

mod reader;
mod value_codec;

pub use reader::ByteReader;
pub(crate) use reader::{put_len, put_str, str_len, wire_len};
pub(crate) use value_codec::read_value;
pub use value_codec::{decode_value, encode_value, encode_value_into, encoded_len};
