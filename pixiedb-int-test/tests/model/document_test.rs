use pixiedb::collection::{Collection, Document};
use pixiedb::errors::ErrorKind;
use pixiedb::{map, val};
use pixiedb_int_test::test_util::{nested_document, nesting_depth};

#[test]
fn test_sub_collections_survive_round_trip() {
    let doc = Document::new(map! { "name": "Alice" })
        .with_sub_collection(Collection::new("logs").with_document(Document::new(map! { "n": 1 })))
        .with_sub_collection(Collection::new("tags").with_document(Document::new(val!("admin"))));

    let (decoded, used) = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    assert_eq!(used, doc.to_bytes().unwrap().len());
    assert_eq!(decoded.value(), doc.value());

    let names: Vec<&str> = decoded.sub_collections().map(|c| c.name()).collect();
    assert_eq!(names, vec!["logs", "tags"]);
    for collection in decoded.sub_collections() {
        assert_eq!(collection.parent_id(), Some(decoded.id()));
    }
    assert_eq!(
        decoded.sub_collection("tags").unwrap().documents()[0].value(),
        &val!("admin")
    );
}

#[test]
fn test_deep_nesting_round_trips() {
    let doc = nested_document(5);
    assert_eq!(nesting_depth(&doc), 5);

    let (decoded, _) = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    assert_eq!(nesting_depth(&decoded), 5);
}

#[test]
fn test_nesting_beyond_limit_is_rejected_on_encode() {
    let err = nested_document(200).to_bytes().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::EncodingError);

    let doc = nested_document(128);
    let (decoded, _) = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    assert_eq!(nesting_depth(&decoded), 128);
}

#[test]
fn test_hand_built_deep_nesting_is_rejected_on_decode() {
    // empty-map document with no sub-collections
    let mut bytes = vec![8, 0, 0, 0, 0, 0, 0, 0, 0];
    for _ in 0..129 {
        let mut outer = vec![8, 0, 0, 0, 0];
        outer.extend_from_slice(&1u32.to_le_bytes());
        outer.extend_from_slice(&1u32.to_le_bytes());
        outer.push(b'n');
        outer.extend_from_slice(&1u32.to_le_bytes());
        outer.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        outer.extend_from_slice(&bytes);
        bytes = outer;
    }
    let err = Document::from_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::MalformedInput);
}

#[test]
fn test_identity_is_fresh_after_decode() {
    let doc = Document::with_id("fixed", map! { "a": 1 });
    let (decoded, _) = Document::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    assert_ne!(decoded.id(), "fixed");
}

#[test]
fn test_mutating_a_sub_collection_in_place() {
    let mut doc = Document::new(map! {}).with_sub_collection(Collection::new("logs"));
    doc.sub_collection_mut("logs")
        .unwrap()
        .add_document(Document::new(map! { "action": "login" }));
    doc.set_value(map! { "name": "Carol" });

    assert_eq!(doc.sub_collection("logs").unwrap().len(), 1);
    assert_eq!(doc.get("name"), Some(&val!("Carol")));
}

#[test]
fn test_display_hides_empty_branches() {
    let doc = Document::with_id("d", map! { "name": "Alice" }).with_sub_collection(
        Collection::new("logs").with_document(Document::new(map! { "action": "login" })),
    );
    let text = doc.to_string();
    assert!(text.contains("\"logs\""));
    assert!(text.contains("\"action\": \"login\""));

    let bare = Document::with_id("e", map! { "name": "Bob" })
        .with_sub_collection(Collection::new("logs"));
    assert!(!bare.to_string().contains("logs"));
}
