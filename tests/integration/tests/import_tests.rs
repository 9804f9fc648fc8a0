//! Importer tests: crawl results written through the repository traits
//!
//! Run with: cargo test -p integration-tests --test import_tests

use centcom_sync::{ImportMode, SyncError};
use integration_tests::{alpha, ban, engine, ids, importer, InMemoryBanStore, RawBan, ScriptedParser};

fn page(ids: &[u32]) -> Vec<RawBan> {
    ids.iter().copied().map(RawBan::new).collect()
}

#[tokio::test]
async fn test_incremental_import_inserts_new_bans() {
    let store = InMemoryBanStore::new();
    store.seed([ban(&alpha(), 7)]);

    let engine = engine(ScriptedParser::new(vec![page(&[10, 9]), page(&[8, 7])]), &store);
    let summary = importer(&store).import(&engine, ImportMode::Incremental).await.unwrap();

    assert_eq!(summary.mode, ImportMode::Incremental);
    assert_eq!(summary.fetched, 4);
    assert_eq!(summary.inserted, 3);
    assert_eq!((summary.updated, summary.removed), (0, 0));
    assert_eq!(ids(&store.bans()), vec!["7", "10", "9", "8"]);
}

#[tokio::test]
async fn test_repeated_incremental_import_is_idempotent() {
    let store = InMemoryBanStore::new();
    let importer = importer(&store);

    let first = engine(ScriptedParser::new(vec![page(&[3, 2, 1])]), &store);
    assert_eq!(importer.import(&first, ImportMode::Incremental).await.unwrap().inserted, 3);

    let second = engine(ScriptedParser::new(vec![page(&[3, 2, 1])]), &store);
    let summary = importer.import(&second, ImportMode::Incremental).await.unwrap();
    assert_eq!(summary.fetched, 0);
    assert_eq!(summary.inserted, 0);
    assert_eq!(second.parser().calls(), vec![1]);
    assert_eq!(store.bans().len(), 3);
}

#[tokio::test]
async fn test_import_registers_sources_first() {
    let store = InMemoryBanStore::new();
    assert!(store.sources().is_empty());

    let engine = engine(ScriptedParser::with_sub_sources(vec![page(&[1])]), &store);
    importer(&store).import(&engine, ImportMode::Incremental).await.unwrap();

    let names: Vec<String> = store.sources().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["alpha".to_string(), "alpha-lrp".to_string()]);
}

#[tokio::test]
async fn test_complete_import_reconciles() {
    let store = InMemoryBanStore::new();
    let lifted = RawBan::new(2).to_ban(&alpha()).unwrap();
    store.seed([ban(&alpha(), 1), lifted, ban(&alpha(), 5)]);

    // 2 changes content, 5 is gone remotely, 3 is new
    let pages = vec![vec![RawBan::new(3), RawBan::new(2).with_reason("appealed"), RawBan::new(1)]];
    let engine = engine(ScriptedParser::new(pages), &store);
    let summary = importer(&store).import(&engine, ImportMode::Complete).await.unwrap();

    assert_eq!(summary.mode, ImportMode::Complete);
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.removed, 1);

    let mut stored = store.bans();
    stored.sort_by_key(|b| b.ban_id.clone());
    assert_eq!(ids(&stored), vec!["1", "2", "3"]);
    assert_eq!(stored[1].reason, "appealed");
}

#[tokio::test]
async fn test_complete_import_keeps_row_ids_on_update() {
    let store = InMemoryBanStore::new();
    store.seed([ban(&alpha(), 1)]);
    let original = store.rows()[0].id;

    let pages = vec![vec![RawBan::new(1).with_reason("edited")]];
    let engine = engine(ScriptedParser::new(pages), &store);
    importer(&store).import(&engine, ImportMode::Complete).await.unwrap();

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, original);
    assert_eq!(rows[0].ban.reason, "edited");
}

#[tokio::test]
async fn test_complete_import_unchanged_is_noop() {
    let store = InMemoryBanStore::new();
    store.seed([ban(&alpha(), 2), ban(&alpha(), 1)]);

    let engine = engine(ScriptedParser::new(vec![page(&[2, 1])]), &store);
    let summary = importer(&store).import(&engine, ImportMode::Complete).await.unwrap();

    assert_eq!((summary.inserted, summary.updated, summary.removed), (0, 0, 0));
    assert_eq!(store.bans().len(), 2);
}

#[tokio::test]
async fn test_complete_import_of_empty_fetch_keeps_stored_bans() {
    let store = InMemoryBanStore::new();
    store.seed((1..=50).map(|id| ban(&alpha(), id)));

    let engine = engine(ScriptedParser::new(Vec::new()), &store);
    let summary = importer(&store).import(&engine, ImportMode::Complete).await.unwrap();

    assert_eq!(summary.fetched, 0);
    assert_eq!(summary.removed, 0);
    assert_eq!(store.bans().len(), 50);
}

#[tokio::test]
async fn test_complete_import_with_skipped_records_withholds_removals() {
    let store = InMemoryBanStore::new();
    store.seed([ban(&alpha(), 2), ban(&alpha(), 1)]);

    // 2 fails to normalize; it must not read as dropped by the source
    let pages = vec![vec![RawBan::new(3), RawBan::malformed(2), RawBan::new(1)]];
    let engine = engine(ScriptedParser::new(pages), &store);
    let summary = importer(&store).import(&engine, ImportMode::Complete).await.unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.removed, 0);

    let mut stored = ids(&store.bans());
    stored.sort();
    assert_eq!(stored, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_incremental_falls_back_without_ids() {
    let store = InMemoryBanStore::new();
    let stale = RawBan::unkeyed("stale", 1).to_ban(&alpha()).unwrap();
    store.seed([stale]);

    let pages = vec![vec![RawBan::unkeyed("alice", 3), RawBan::unkeyed("bob", 2)]];
    let engine = engine(ScriptedParser::new(pages).without_ban_ids(), &store);
    let summary = importer(&store).import(&engine, ImportMode::Incremental).await.unwrap();

    assert_eq!(summary.mode, ImportMode::Complete);
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.removed, 1);

    let mut ckeys: Vec<String> = store.bans().iter().map(|b| b.ckey.to_string()).collect();
    ckeys.sort();
    assert_eq!(ckeys, vec!["alice".to_string(), "bob".to_string()]);
}

#[tokio::test]
async fn test_has_bans() {
    let store = InMemoryBanStore::new();
    let importer = importer(&store);
    let engine = engine(ScriptedParser::new(vec![page(&[1])]), &store);

    assert!(!importer.has_bans(&engine).await.unwrap());
    importer.import(&engine, ImportMode::Complete).await.unwrap();
    assert!(importer.has_bans(&engine).await.unwrap());
}

#[tokio::test]
async fn test_fetch_failure_writes_nothing() {
    let store = InMemoryBanStore::new();
    store.seed([ban(&alpha(), 1)]);

    let parser = ScriptedParser::new(vec![page(&[3]), page(&[2])]).failing_on(2);
    let engine = engine(parser, &store);
    let err = importer(&store).import(&engine, ImportMode::Complete).await.unwrap_err();

    assert!(matches!(err, SyncError::Fetch(_)));
    assert_eq!(ids(&store.bans()), vec!["1"]);
}
