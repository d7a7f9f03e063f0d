use crate::codec::reader::{put_len, put_str, str_len, wire_len, ByteReader};
use crate::common::{
    Value, ValueMap, LENGTH_PREFIX_SIZE, MAX_NESTING_DEPTH, TAG_ARRAY, TAG_BOOL, TAG_F64, TAG_I64,
    TAG_MAP, TAG_RESERVED, TAG_STRING, TAG_TIMESTAMP,
};
use crate::errors::{ErrorKind, PixieError, PixieResult};
use chrono::DateTime;

/// Encodes a [Value] into its type-tagged wire form.
///
/// The whole value tree is checked before anything is written, so a map with a
/// non-string key anywhere inside fails with [ErrorKind::UnsupportedValueType]
/// without producing output.
///
/// ```rust
/// use pixiedb::codec::{decode_value, encode_value};
/// use pixiedb::val;
///
/// let bytes = encode_value(&val!(vec![1, 2, 3])).unwrap();
/// assert_eq!(bytes.len(), 1 + 4 + 3 * (1 + 8));
/// assert_eq!(decode_value(&bytes).unwrap(), (val!(vec![1, 2, 3]), 32));
/// ```
pub fn encode_value(value: &Value) -> PixieResult<Vec<u8>> {
    check_encodable(value, 0)?;
    let mut buf = Vec::with_capacity(encoded_len(value));
    write_value(value, &mut buf);
    Ok(buf)
}

/// Appends the encoding of `value` to `buf`. On error `buf` is left untouched.
pub fn encode_value_into(value: &Value, buf: &mut Vec<u8>) -> PixieResult<()> {
    check_encodable(value, 0)?;
    buf.reserve(encoded_len(value));
    write_value(value, buf);
    Ok(())
}

/// Decodes one value from the start of `bytes`, returning it together with
/// the number of bytes consumed. Trailing bytes are left for the caller.
pub fn decode_value(bytes: &[u8]) -> PixieResult<(Value, usize)> {
    let mut reader = ByteReader::new(bytes);
    let value = read_value(&mut reader)?;
    Ok((value, reader.position()))
}

/// Number of bytes [encode_value] produces for `value`.
pub fn encoded_len(value: &Value) -> usize {
    1 + match value {
        Value::I64(_) | Value::F64(_) => 8,
        Value::String(v) => str_len(v),
        Value::Bool(_) => 1,
        Value::Timestamp(_) => 12,
        Value::Array(items) => LENGTH_PREFIX_SIZE + items.iter().map(encoded_len).sum::<usize>(),
        Value::Map(map) => {
            LENGTH_PREFIX_SIZE
                + map
                    .iter()
                    .map(|(key, value)| {
                        key.as_string().map(str_len).unwrap_or(0) + encoded_len(value)
                    })
                    .sum::<usize>()
        }
    }
}

/// Reads one value at the reader's position.
pub(crate) fn read_value(reader: &mut ByteReader<'_>) -> PixieResult<Value> {
    read_nested(reader, 0)
}

fn check_encodable(value: &Value, depth: usize) -> PixieResult<()> {
    if depth > MAX_NESTING_DEPTH {
        log::error!("Value nesting exceeds {} levels", MAX_NESTING_DEPTH);
        return Err(PixieError::new(
            &format!("Value nesting exceeds {} levels", MAX_NESTING_DEPTH),
            ErrorKind::EncodingError,
        ));
    }

    match value {
        Value::String(v) => wire_len(v.len(), "String").map(|_| ()),
        Value::Array(items) => {
            wire_len(items.len(), "Array")?;
            items
                .iter()
                .try_for_each(|item| check_encodable(item, depth + 1))
        }
        Value::Map(map) => {
            wire_len(map.len(), "Map")?;
            for (key, value) in map {
                match key {
                    Value::String(key) => {
                        wire_len(key.len(), "Map key")?;
                    }
                    other => {
                        log::error!("Map keys must be strings, found {}", other.type_name());
                        return Err(PixieError::new(
                            &format!("Map keys must be strings, found {}", other.type_name()),
                            ErrorKind::UnsupportedValueType,
                        ));
                    }
                }
                check_encodable(value, depth + 1)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

// Infallible once check_encodable has passed.
fn write_value(value: &Value, buf: &mut Vec<u8>) {
    buf.push(value.tag());
    match value {
        Value::I64(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::F64(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::String(v) => put_str(buf, v),
        Value::Bool(v) => buf.push(u8::from(*v)),
        Value::Timestamp(v) => {
            // seconds and sub-second nanos stay integers end to end
            buf.extend_from_slice(&v.timestamp().to_le_bytes());
            buf.extend_from_slice(&v.timestamp_subsec_nanos().to_le_bytes());
        }
        Value::Array(items) => {
            put_len(buf, items.len() as u32);
            for item in items {
                write_value(item, buf);
            }
        }
        Value::Map(map) => {
            put_len(buf, map.len() as u32);
            for (key, value) in map {
                if let Value::String(key) = key {
                    put_str(buf, key);
                }
                write_value(value, buf);
            }
        }
    }
}

fn read_nested(reader: &mut ByteReader<'_>, depth: usize) -> PixieResult<Value> {
    if depth > MAX_NESTING_DEPTH {
        log::error!("Value nesting exceeds {} levels", MAX_NESTING_DEPTH);
        return Err(PixieError::new(
            &format!("Value nesting exceeds {} levels", MAX_NESTING_DEPTH),
            ErrorKind::MalformedInput,
        ));
    }

    let tag_offset = reader.position();
    let tag = reader.read_u8()?;
    match tag {
        TAG_I64 => Ok(Value::I64(reader.read_i64()?)),
        TAG_F64 => Ok(Value::F64(reader.read_f64()?)),
        TAG_STRING => Ok(Value::String(reader.read_string()?)),
        TAG_BOOL => match reader.read_u8()? {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            other => {
                log::error!("Invalid boolean byte {} at offset {}", other, tag_offset + 1);
                Err(PixieError::new(
                    &format!("Invalid boolean byte {} at offset {}", other, tag_offset + 1),
                    ErrorKind::MalformedInput,
                ))
            }
        },
        TAG_TIMESTAMP => {
            let seconds = reader.read_i64()?;
            let nanos = reader.read_u32()?;
            match DateTime::from_timestamp(seconds, nanos) {
                Some(timestamp) => Ok(Value::Timestamp(timestamp)),
                None => {
                    log::error!("Timestamp {}s {}ns is out of range", seconds, nanos);
                    Err(PixieError::new(
                        &format!("Timestamp {}s {}ns is out of range", seconds, nanos),
                        ErrorKind::MalformedInput,
                    ))
                }
            }
        }
        TAG_ARRAY => {
            let count = reader.read_len()?;
            // smallest element is a bool: tag + 1 byte
            let mut items = Vec::with_capacity(reader.capacity_hint(count, 2));
            for _ in 0..count {
                items.push(read_nested(reader, depth + 1)?);
            }
            Ok(Value::Array(items))
        }
        TAG_MAP => {
            let count = reader.read_len()?;
            // smallest pair is an empty key and a bool
            let mut map = ValueMap::with_capacity(reader.capacity_hint(count, LENGTH_PREFIX_SIZE + 2));
            for _ in 0..count {
                let key_offset = reader.position();
                let key = reader.read_string()?;
                let value = read_nested(reader, depth + 1)?;
                if map.insert(Value::String(key.clone()), value).is_some() {
                    log::error!("Duplicate map key {:?} at offset {}", key, key_offset);
                    return Err(PixieError::new(
                        &format!("Duplicate map key {:?} at offset {}", key, key_offset),
                        ErrorKind::MalformedInput,
                    ));
                }
            }
            Ok(Value::Map(map))
        }
        other => {
            let reason = if other == TAG_RESERVED { "reserved" } else { "unknown" };
            log::error!("Type tag {} ({}) at offset {}", other, reason, tag_offset);
            Err(PixieError::new(
                &format!("Type tag {} ({}) at offset {}", other, reason, tag_offset),
                ErrorKind::UnknownTypeTag,
            ))
        }
    }
}
