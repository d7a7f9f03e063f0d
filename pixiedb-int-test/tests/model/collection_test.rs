use pixiedb::collection::{Collection, Document};
use pixiedb::errors::ErrorKind;
use pixiedb::{map, val};
use pixiedb_int_test::test_util::users_with_logs;

#[test]
fn test_users_and_logs_round_trip() {
    let users = users_with_logs();
    let bytes = users.to_bytes().unwrap();
    let (decoded, used) = Collection::from_bytes_with_offset(&bytes).unwrap();
    assert_eq!(used, bytes.len());
    assert_eq!(decoded.len(), 2);

    let alice = decoded
        .find_first(|d| d.get("name") == Some(&val!("Alice")))
        .unwrap();
    let logs = alice.sub_collection("logs").unwrap();
    assert_eq!(logs.name(), "logs");

    let expected: Vec<&pixiedb::common::Value> = users.documents()[0]
        .sub_collection("logs")
        .unwrap()
        .documents()
        .iter()
        .map(|d| d.value())
        .collect();
    let actual: Vec<&pixiedb::common::Value> = logs.documents().iter().map(|d| d.value()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_queries_see_insertion_order() {
    let mut events = Collection::new("events");
    for i in 0..10 {
        events.add_document(Document::new(map! { "seq": i, "even": (i % 2 == 0) }));
    }

    let even: Vec<i64> = events
        .documents_matching(|d| d.get("even") == Some(&val!(true)))
        .iter()
        .filter_map(|d| d.get("seq").and_then(|v| v.as_i64()))
        .collect();
    assert_eq!(even, vec![0, 2, 4, 6, 8]);

    assert!(events.has_matching(|d| d.get("seq") == Some(&val!(9))));
    assert!(!events.has_matching(|d| d.get("seq") == Some(&val!(10))));
}

#[test]
fn test_document_by_id_after_decode_uses_new_ids() {
    let users = users_with_logs();
    let first_id = users.documents()[0].id().to_string();
    assert!(users.document_by_id(&first_id).is_some());

    let (decoded, _) = Collection::from_bytes_with_offset(&users.to_bytes().unwrap()).unwrap();
    assert!(decoded.document_by_id(&first_id).is_none());
    let new_id = decoded.documents()[0].id().to_string();
    assert!(decoded.document_by_id(&new_id).is_some());
}

#[test]
fn test_document_count_beyond_input_is_truncated() {
    let mut bytes = u32::MAX.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0, 0]);
    let err = Collection::from_bytes_with_offset(&bytes).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TruncatedInput);
}

#[test]
fn test_to_list_renders_every_document() {
    let users = users_with_logs();
    let list = users.to_list();
    let items = list.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].get("data"), Some(&map! { "name": "Alice" }));
    assert!(users.to_string().starts_with("Collection(name=\"users\""));
}
