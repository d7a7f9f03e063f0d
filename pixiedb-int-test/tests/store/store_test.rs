use pixiedb::collection::{Collection, Document};
use pixiedb::errors::ErrorKind;
use pixiedb::store::{FileHeader, PixieStore};
use pixiedb::{map, val};
use pixiedb_int_test::test_util::{
    cleanup, create_test_context, nested_document, run_test, users_with_logs,
};

#[test]
fn test_save_and_reload_users_with_logs() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = users_with_logs();
            let path = store.save(&users)?;
            assert_eq!(path, ctx.file(&format!("{}_users.bin", users.id())));

            let loaded = store.load_from_file(&path)?;
            assert_eq!(loaded.id(), users.id());
            assert_eq!(loaded.name(), "users");
            assert!(loaded.is_root());

            let alice = loaded
                .find_first(|d| d.get("name") == Some(&val!("Alice")))
                .expect("Alice is saved");
            let logs = alice.sub_collection("logs").expect("logs are saved");
            let actions: Vec<_> = logs.documents().iter().filter_map(|d| d.get("action")).collect();
            assert_eq!(actions, vec![&val!("login"), &val!("logout")]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_names_with_underscores() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let audit = Collection::with_id("audit_log_2024", "a_b_c")
                .with_document(Document::new(map! { "ok": true }));
            store.save(&audit)?;

            let loaded = store.get_by_id("audit_log_2024", "a_b_c")?;
            assert_eq!(loaded.name(), "audit_log_2024");
            assert_eq!(loaded.id(), "a_b_c");

            // "log_2024" is a suffix of the file name but not the collection's name
            let report = store.find_all_by_name("log_2024")?;
            assert!(report.collections().is_empty());
            assert!(report.is_clean());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_save_overwrites_previous_version() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let mut settings = Collection::with_id("settings", "s1");
            settings.add_document(Document::new(map! { "theme": "dark" }));
            store.save(&settings)?;

            settings.add_document(Document::new(map! { "lang": "en" }));
            store.save(&settings)?;

            let loaded = store.get_by_id("settings", "s1")?;
            assert_eq!(loaded.len(), 2);
            assert_eq!(store.find_all_by_name("settings")?.collections().len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sub_collection_cannot_be_saved() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = users_with_logs();
            let logs = users.documents()[0].sub_collection("logs").expect("logs attached");

            let err = store.save(logs).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::OwnershipViolation);
            assert_eq!(std::fs::read_dir(ctx.path())?.count(), 0);

            // a decoded copy of the same data is a root and can be saved
            let (copy, _) = Collection::from_bytes_with_offset(&logs.to_bytes()?)?;
            assert!(copy.is_root());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_get_by_id_not_found() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            store.save(&Collection::with_id("users", "present"))?;

            let err = store.get_by_id("users", "absent").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);

            let err = store.get_by_id("groups", "present").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_stores_are_independent() {
    run_test(
        create_test_context,
        |ctx| {
            let first = PixieStore::new(ctx.file("first"));
            let second = PixieStore::new(ctx.file("second"));
            first.save(&Collection::with_id("users", "u1"))?;

            assert_eq!(first.find_all_by_name("users")?.collections().len(), 1);
            assert!(second.find_all_by_name("users")?.collections().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_file_starts_with_header() {
    run_test(
        create_test_context,
        |ctx| {
            let users = users_with_logs();
            let path = ctx.store().save(&users)?;
            let bytes = std::fs::read(path)?;

            let (header, used) = FileHeader::decode(&bytes)?;
            assert_eq!(&bytes[..4], b"PXDB");
            assert_eq!(header.collection_id(), users.id());
            assert_eq!(header.collection_name(), "users");

            let (body, consumed) = Collection::from_bytes_with_offset(&bytes[used..])?;
            assert_eq!(used + consumed, bytes.len());
            assert_eq!(body.len(), 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_too_deep_tree_is_not_saved() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let deep = Collection::with_id("deep", "d1").with_document(nested_document(130));

            let err = store.save(&deep).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
            assert_eq!(std::fs::read_dir(ctx.path())?.count(), 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_get_by_id_reports_why_the_file_did_not_load() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let path = store.save(&users_with_logs())?;
            let id = store.load_from_file(&path)?.id().to_string();

            let bytes = std::fs::read(&path)?;
            std::fs::write(&path, &bytes[..bytes.len() - 2])?;

            let err = store.get_by_id("users", &id).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::TruncatedInput);
            assert!(err.cause().is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_file_name_clash_keeps_existing_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let users = Collection::with_id("users", "x_app")
                .with_document(Document::new(map! { "name": "Alice" }));
            store.save(&users)?;

            let err = store.save(&Collection::with_id("app_users", "x")).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

            let kept = store.get_by_id("users", "x_app")?;
            assert_eq!(kept.len(), 1);
            assert!(store.find_all_by_name("app_users")?.collections().is_empty());
            Ok(())
        },
        cleanup,
    )
}
