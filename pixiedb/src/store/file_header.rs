use crate::codec::{put_str, str_len, wire_len, ByteReader};
use crate::common::{FILE_MAGIC, FORMAT_VERSION};
use crate::errors::{ErrorKind, PixieError, PixieResult};

/// Header stored at the beginning of every collection file.
///
/// ```text
/// [4 bytes magic "PXDB"][u8 format version]
/// [u32 id length][id bytes][u32 name length][name bytes]
/// ```
///
/// Identity and name of a persisted collection are read from here, never from
/// the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    version: u8,
    collection_id: String,
    collection_name: String,
}

impl FileHeader {
    pub fn new(collection_id: impl Into<String>, collection_name: impl Into<String>) -> Self {
        FileHeader {
            version: FORMAT_VERSION,
            collection_id: collection_id.into(),
            collection_name: collection_name.into(),
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Size of the encoded header in bytes.
    pub fn encoded_len(&self) -> usize {
        FILE_MAGIC.len() + 1 + str_len(&self.collection_id) + str_len(&self.collection_name)
    }

    pub fn encode(&self) -> PixieResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Decodes a header from the start of `bytes`, returning it with the number
    /// of bytes consumed.
    pub fn decode(bytes: &[u8]) -> PixieResult<(FileHeader, usize)> {
        let mut reader = ByteReader::new(bytes);
        let header = FileHeader::read_from(&mut reader)?;
        Ok((header, reader.position()))
    }

    pub fn validate(&self) -> PixieResult<()> {
        if self.version != FORMAT_VERSION {
            log::error!(
                "Unsupported file format version {}, expected {}",
                self.version,
                FORMAT_VERSION
            );
            return Err(PixieError::new(
                &format!(
                    "Unsupported file format version {}, expected {}",
                    self.version, FORMAT_VERSION
                ),
                ErrorKind::UnsupportedFormatVersion,
            ));
        }
        Ok(())
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) -> PixieResult<()> {
        wire_len(self.collection_id.len(), "Collection id")?;
        wire_len(self.collection_name.len(), "Collection name")?;

        buf.extend_from_slice(&FILE_MAGIC);
        buf.push(self.version);
        put_str(buf, &self.collection_id);
        put_str(buf, &self.collection_name);
        Ok(())
    }

    pub(crate) fn read_from(reader: &mut ByteReader<'_>) -> PixieResult<FileHeader> {
        let magic = reader.read_bytes(FILE_MAGIC.len())?;
        if magic != FILE_MAGIC {
            log::error!("Invalid file format (bad magic {:02x?})", magic);
            return Err(PixieError::new(
                &format!("Invalid file format (bad magic {:02x?})", magic),
                ErrorKind::MalformedInput,
            ));
        }

        let version = reader.read_u8()?;
        let header = FileHeader {
            version,
            collection_id: String::new(),
            collection_name: String::new(),
        };
        header.validate()?;

        Ok(FileHeader {
            collection_id: reader.read_string()?,
            collection_name: reader.read_string()?,
            ..header
        })
    }
}
