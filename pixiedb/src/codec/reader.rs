use crate::common::LENGTH_PREFIX_SIZE;
use crate::errors::{ErrorKind, PixieError, PixieResult};

/// A forward-only cursor over an encoded byte slice.
///
/// Every read is bounds-checked: asking for more bytes than remain fails with
/// [ErrorKind::TruncatedInput] and leaves the cursor where it was. All fixed
/// width integers are little-endian.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteReader { bytes, position: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unconsumed tail of the input.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }

    /// Marks `len` bytes of [Self::rest] as consumed by a nested decoder.
    pub fn advance(&mut self, len: usize) -> PixieResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn read_bytes(&mut self, len: usize) -> PixieResult<&'a [u8]> {
        if len > self.remaining() {
            log::error!(
                "Truncated input: need {} bytes at offset {}, {} left",
                len,
                self.position,
                self.remaining()
            );
            return Err(PixieError::new(
                &format!(
                    "Truncated input: need {} bytes at offset {}, {} left",
                    len,
                    self.position,
                    self.remaining()
                ),
                ErrorKind::TruncatedInput,
            ));
        }

        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> PixieResult<[u8; N]> {
        let slice = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(slice);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> PixieResult<u8> {
        self.read_array::<1>().map(|b| b[0])
    }

    pub fn read_u32(&mut self) -> PixieResult<u32> {
        self.read_array::<4>().map(u32::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> PixieResult<i64> {
        self.read_array::<8>().map(i64::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> PixieResult<f64> {
        self.read_array::<8>().map(f64::from_le_bytes)
    }

    /// Reads a 4-byte length prefix as a `usize`.
    pub fn read_len(&mut self) -> PixieResult<usize> {
        self.read_u32().map(|len| len as usize)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> PixieResult<String> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        let text = std::str::from_utf8(bytes).map_err(|err| {
            log::error!("Invalid UTF-8 string at offset {}: {}", self.position - len, err);
            PixieError::from(err)
        })?;
        Ok(text.to_string())
    }

    /// Upper bound for pre-allocating `count` items that each take at least
    /// `min_item_size` bytes, so a forged count cannot force a huge allocation.
    pub fn capacity_hint(&self, count: usize, min_item_size: usize) -> usize {
        count.min(self.remaining() / min_item_size.max(1))
    }
}

/// Converts an in-memory length into a 4-byte wire length prefix.
pub(crate) fn wire_len(len: usize, what: &str) -> PixieResult<u32> {
    u32::try_from(len).map_err(|_| {
        log::error!("{} length {} does not fit in a 4-byte prefix", what, len);
        PixieError::new(
            &format!("{} length {} does not fit in a 4-byte prefix", what, len),
            ErrorKind::EncodingError,
        )
    })
}

/// Appends a 4-byte little-endian length prefix.
#[inline]
pub(crate) fn put_len(buf: &mut Vec<u8>, len: u32) {
    buf.extend_from_slice(&len.to_le_bytes());
}

/// Appends a length-prefixed UTF-8 string. The length must already be known
/// to fit in a prefix.
#[inline]
pub(crate) fn put_str(buf: &mut Vec<u8>, text: &str) {
    put_len(buf, text.len() as u32);
    buf.extend_from_slice(text.as_bytes());
}

/// Size of a length-prefixed string on the wire.
#[inline]
pub(crate) fn str_len(text: &str) -> usize {
    LENGTH_PREFIX_SIZE + text.len()
}
