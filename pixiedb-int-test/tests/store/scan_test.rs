use pixiedb::collection::{Collection, Document};
use pixiedb::errors::ErrorKind;
use pixiedb::map;
use pixiedb::store::FileHeader;
use pixiedb_int_test::test_util::{cleanup, create_test_context, run_test};
use std::fs;

#[test]
fn test_one_valid_and_one_truncated_file() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            let good = Collection::with_id("users", "good")
                .with_document(Document::new(map! { "name": "Alice" }));
            let bad = Collection::with_id("users", "bad")
                .with_document(Document::new(map! { "name": "Bob" }));
            store.save(&good)?;
            let bad_path = store.save(&bad)?;

            let bytes = fs::read(&bad_path)?;
            fs::write(&bad_path, &bytes[..bytes.len() - 4])?;

            let report = store.find_all_by_name("users")?;
            assert_eq!(report.collections().len(), 1);
            assert_eq!(report.collections()[0].id(), "good");
            assert_eq!(report.failure_count(), 1);
            assert_eq!(report.failures()[0].path(), bad_path.as_path());
            assert_eq!(report.failures()[0].error().kind(), &ErrorKind::TruncatedInput);

            // the corrupt file does not hide the good one from get_by_id
            assert_eq!(store.get_by_id("users", "good")?.len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_foreign_and_unsupported_files() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            store.save(&Collection::with_id("users", "ok"))?;

            fs::write(ctx.file("junk_users.bin"), b"not a pixiedb file")?;

            let mut future = FileHeader::new("future", "users").encode()?;
            future[4] = 99;
            future.extend_from_slice(&0u32.to_le_bytes());
            fs::write(ctx.file("future_users.bin"), future)?;

            fs::write(ctx.file("notes_users.txt"), b"ignored")?;
            fs::create_dir(ctx.file("dir_users.bin"))?;

            let report = store.find_all_by_name("users")?;
            assert_eq!(report.collections().len(), 1);
            assert_eq!(report.failure_count(), 2);

            let kinds: Vec<&ErrorKind> = report.failures().iter().map(|f| f.error().kind()).collect();
            assert_eq!(
                kinds,
                vec![&ErrorKind::UnsupportedFormatVersion, &ErrorKind::MalformedInput]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_scan_results_are_sorted_by_file_name() {
    run_test(
        create_test_context,
        |ctx| {
            let store = ctx.store();
            for id in ["c", "a", "b"] {
                store.save(&Collection::with_id("users", id))?;
            }

            let ids: Vec<String> = store
                .find_all_by_name("users")?
                .into_collections()
                .iter()
                .map(|c| c.id().to_string())
                .collect();
            assert_eq!(ids, vec!["a", "b", "c"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_scan_name() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.store().find_all_by_name("../users").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        cleanup,
    )
}
