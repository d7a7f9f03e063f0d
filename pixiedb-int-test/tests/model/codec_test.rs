use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use pixiedb::codec::{decode_value, encode_value, encode_value_into, encoded_len};
use pixiedb::common::Value;
use pixiedb::errors::ErrorKind;
use pixiedb::{map, val};

fn round_trip(value: &Value) {
    let bytes = encode_value(value).unwrap();
    let (decoded, used) = decode_value(&bytes).unwrap();
    assert_eq!(&decoded, value);
    assert_eq!(used, bytes.len());
    assert_eq!(encoded_len(value), bytes.len());
}

#[test]
fn test_user_record_round_trip() {
    let user = map! { "name": "Alice", "age": 30 };
    round_trip(&user);
}

#[test]
fn test_integer_list_consumes_32_bytes() {
    let list = val!(vec![1, 2, 3]);
    let bytes = encode_value(&list).unwrap();
    assert_eq!(bytes.len(), 1 + 4 + 3 * (1 + 8));

    let (decoded, used) = decode_value(&bytes).unwrap();
    assert_eq!(decoded, list);
    assert_eq!(used, 32);
}

#[test]
fn test_every_value_type_round_trips() {
    let ts = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()
        + chrono::Duration::nanoseconds(123_456_789);

    let value = map! {
        "int": (i64::MIN),
        "float": (-0.1),
        "text": "héllo wörld",
        "flag": false,
        "when": ts,
        "list": [1, "two", 3.0, true, []],
        "nested": { "empty": {}, "deeper": { "x": [{ "y": 1 }] } },
    };
    round_trip(&value);
}

#[test]
fn test_timestamp_is_stored_in_utc() {
    let offset = FixedOffset::east_opt(9 * 3600).unwrap();
    let local: DateTime<FixedOffset> = offset.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let bytes = encode_value(&val!(local)).unwrap();
    let (decoded, _) = decode_value(&bytes).unwrap();
    assert_eq!(
        decoded.as_timestamp(),
        Some(&Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_non_string_key_writes_nothing() {
    let value = map! { "ok": 1, 2: "bad" };
    let mut buf = vec![0xAA];
    let err = encode_value_into(&value, &mut buf).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnsupportedValueType);
    assert_eq!(buf, vec![0xAA]);
}

#[test]
fn test_reserved_and_unknown_tags_fail() {
    for tag in [0u8, 6, 9, 255] {
        let err = decode_value(&[tag, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownTypeTag);
    }
}

#[test]
fn test_overlong_string_prefix_is_truncated_input() {
    let mut bytes = vec![3u8];
    bytes.extend_from_slice(&100u32.to_le_bytes());
    bytes.extend_from_slice(b"short");
    let err = decode_value(&bytes).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TruncatedInput);
}

#[test]
fn test_decode_leaves_trailing_bytes_alone() {
    let mut bytes = encode_value(&val!("a")).unwrap();
    let len = bytes.len();
    bytes.extend_from_slice(&encode_value(&val!(2)).unwrap());

    let (first, used) = decode_value(&bytes).unwrap();
    assert_eq!(first, val!("a"));
    assert_eq!(used, len);

    let (second, _) = decode_value(&bytes[used..]).unwrap();
    assert_eq!(second, val!(2));
}
