use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::*;
use crate::store::local::{MemoryLocalStore, CONTENT_KEY, USER_DATA_KEY};
use crate::store::remote::MemoryRemoteStore;

fn titled(title: &str) -> ContentDocument {
    let mut doc = default_document();
    doc.navigation.title = title.to_string();
    doc
}

fn local_engine() -> (ContentEngine, Arc<MemoryLocalStore>) {
    let store = Arc::new(MemoryLocalStore::new());
    (ContentEngine::new(store.clone(), EngineConfig::default()), store)
}

fn remote_engine() -> (ContentEngine, Arc<MemoryLocalStore>, Arc<MemoryRemoteStore>) {
    let store = Arc::new(MemoryLocalStore::new());
    let remote = Arc::new(MemoryRemoteStore::new());
    let engine = ContentEngine::new(store.clone(), EngineConfig::default()).with_remote(remote.clone());
    (engine, store, remote)
}

fn remote_document(remote: &MemoryRemoteStore) -> Option<ContentDocument> {
    remote
        .row(CONTENT_ROW_ID)
        .map(|row| ContentDocument::from_value(row.content).unwrap())
}

// ---------------------------------------------------------------------------
// load_local
// ---------------------------------------------------------------------------

#[test]
fn empty_environment_loads_default() {
    let (engine, _) = local_engine();
    assert!(is_default(&engine.load_local()));
    assert_eq!(engine.data_source(), DataSource::Default);
}

#[test]
fn known_user_without_cache_is_restored_from_history() {
    let store = Arc::new(MemoryLocalStore::new());
    let history = History::new(store.clone(), 3);
    history.push(&titled("snapshot"), HistorySource::ManualSave).unwrap();
    store.set(USER_DATA_KEY, "true").unwrap();

    let engine = ContentEngine::new(store, EngineConfig::default());
    assert_eq!(engine.load_local(), titled("snapshot"));
    assert_eq!(engine.data_source(), DataSource::Unknown);
}

#[test]
fn first_run_ignores_history_without_flag() {
    let store = Arc::new(MemoryLocalStore::new());
    History::new(store.clone(), 3)
        .push(&titled("stray"), HistorySource::ManualSave)
        .unwrap();

    let engine = ContentEngine::new(store, EngineConfig::default());
    assert!(is_default(&engine.load_local()));
}

#[test]
fn corrupt_cache_falls_back_to_history_for_known_user() {
    let store = Arc::new(MemoryLocalStore::new());
    History::new(store.clone(), 3)
        .push(&titled("snapshot"), HistorySource::ManualSave)
        .unwrap();
    store.set(USER_DATA_KEY, "true").unwrap();
    store.set(CONTENT_KEY, "{{{").unwrap();

    let engine = ContentEngine::new(store, EngineConfig::default());
    assert_eq!(engine.load_local(), titled("snapshot"));
    assert_eq!(engine.data_source(), DataSource::Unknown);
}

#[test]
fn corrupt_cache_on_first_run_reports_default_source() {
    let (engine, store) = local_engine();
    store.set(CONTENT_KEY, "not a document").unwrap();

    assert!(is_default(&engine.load_local()));
    assert_eq!(engine.data_source(), DataSource::Default);
}

// ---------------------------------------------------------------------------
// save
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_then_load_without_remote_round_trips() {
    let (engine, _) = local_engine();
    let doc = titled("edited");

    let outcome = engine.save(&doc).await;
    assert_eq!(outcome, SaveOutcome::saved(SAVED_LOCAL_ONLY));
    assert_eq!(engine.load().await, doc);
    assert_eq!(engine.data_source(), DataSource::LocalStorage);
}

#[tokio::test]
async fn flag_survives_saving_the_default_again() {
    let (engine, store) = local_engine();

    engine.save(&titled("real")).await;
    assert!(engine.has_user_data());

    engine.save(&default_document()).await;
    assert!(engine.has_user_data());
    assert_eq!(store.get(USER_DATA_KEY).unwrap().as_deref(), Some("true"));
    assert_eq!(engine.get_history().len(), 1, "default saves are not snapshotted");
}

#[tokio::test]
async fn saving_the_default_does_not_set_flag() {
    let (engine, _) = local_engine();
    engine.save(&default_document()).await;
    assert!(!engine.has_user_data());
    assert!(engine.get_history().is_empty());
}

#[tokio::test]
async fn history_keeps_three_newest_saves() {
    let (engine, _) = local_engine();
    for title in ["d1", "d2", "d3", "d4"] {
        engine.save(&titled(title)).await;
    }

    let history = engine.get_history();
    let titles: Vec<&str> = history
        .iter()
        .map(|e| e.content.navigation.title.as_str())
        .collect();
    assert_eq!(titles, ["d4", "d3", "d2"]);
    assert!(history.iter().all(|e| e.source == HistorySource::ManualSave));

    assert_eq!(engine.restore_from_history(2), Some(titled("d2")));
    assert_eq!(engine.restore_from_history(3), None);
}

#[tokio::test]
async fn restore_from_history_does_not_save() {
    let (engine, _) = local_engine();
    engine.save(&titled("old")).await;
    engine.save(&titled("new")).await;

    let restored = engine.restore_from_history(1).unwrap();
    assert_eq!(restored, titled("old"));
    assert_eq!(engine.load_local(), titled("new"));
}

#[tokio::test]
async fn local_write_failure_skips_remote() {
    let store = Arc::new(MemoryLocalStore::with_quota(64));
    let remote = Arc::new(MemoryRemoteStore::new());
    let engine = ContentEngine::new(store, EngineConfig::default()).with_remote(remote.clone());
    let mut events = engine.events().subscribe();

    let outcome = engine.save(&titled("too big")).await;
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("quota"));
    assert_eq!(remote.upsert_count(), 0);

    match events.recv().await.unwrap() {
        ContentEvent::Saved(published) => assert!(!published.success),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn save_writes_through_to_remote() {
    let (engine, _, remote) = remote_engine();
    let doc = titled("synced");

    let outcome = engine.save(&doc).await;
    assert_eq!(outcome, SaveOutcome::saved(SAVED));
    assert_eq!(remote_document(&remote), Some(doc));
}

#[tokio::test]
async fn remote_failure_on_save_is_partial_success() {
    let (engine, _, remote) = remote_engine();
    remote.set_fail_upsert(true);

    let outcome = engine.save(&titled("local only")).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some(SAVED_REMOTE_FAILED));
    assert!(outcome.error.is_some());
    assert_eq!(engine.load_local(), titled("local only"));
}

// ---------------------------------------------------------------------------
// load with a remote store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remote_document_is_adopted_and_cached() {
    let (engine, _, remote) = remote_engine();
    remote.insert_row(CONTENT_ROW_ID, serde_json::to_value(titled("remote")).unwrap());

    assert_eq!(engine.load().await, titled("remote"));
    assert!(engine.has_user_data());
    assert_eq!(engine.load_local(), titled("remote"));
    assert_eq!(engine.get_history()[0].source, HistorySource::Remote);
    assert_eq!(engine.data_source(), DataSource::Remote);
}

#[tokio::test]
async fn repeated_loads_are_stable() {
    let (engine, _, remote) = remote_engine();
    remote.insert_row(CONTENT_ROW_ID, serde_json::to_value(titled("remote")).unwrap());

    let first = engine.load().await;
    let second = engine.load().await;
    let third = engine.load().await;

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(engine.get_history().len(), 1);
}

#[tokio::test]
async fn remote_content_stored_as_string_is_decoded() {
    let (engine, _, remote) = remote_engine();
    let raw = serde_json::to_string(&titled("stringly")).unwrap();
    remote.insert_row(CONTENT_ROW_ID, json!(raw));

    assert_eq!(engine.load().await, titled("stringly"));
}

#[tokio::test]
async fn fetch_failure_falls_back_to_local() {
    let (engine, _, remote) = remote_engine();
    engine.save(&titled("cached")).await;
    remote.set_fail_fetch(true);

    assert_eq!(engine.load().await, titled("cached"));
}

#[tokio::test]
async fn unreadable_remote_content_falls_back_to_local() {
    let (engine, _, remote) = remote_engine();
    engine.save(&titled("cached")).await;
    remote.insert_row(CONTENT_ROW_ID, json!({ "blocks": "nope" }));

    assert_eq!(engine.load().await, titled("cached"));
}

#[tokio::test]
async fn blank_remote_does_not_override_known_user_data() {
    let (engine, _, remote) = remote_engine();
    engine.save(&titled("precious")).await;
    remote.insert_row(CONTENT_ROW_ID, json!({}));

    assert_eq!(engine.load().await, titled("precious"));
    assert_eq!(remote_document(&remote), Some(titled("precious")));
}

#[tokio::test]
async fn default_remote_does_not_override_known_user_data() {
    let (engine, _, remote) = remote_engine();
    engine.save(&titled("precious")).await;
    remote.insert_row(CONTENT_ROW_ID, serde_json::to_value(default_document()).unwrap());

    assert_eq!(engine.load().await, titled("precious"));
    assert_eq!(remote_document(&remote), Some(titled("precious")));
}

#[tokio::test]
async fn default_remote_on_first_run_is_returned() {
    let (engine, store, remote) = remote_engine();
    remote.insert_row(CONTENT_ROW_ID, serde_json::to_value(default_document()).unwrap());

    assert!(is_default(&engine.load().await));
    assert!(!engine.has_user_data());
    assert!(store.is_empty());
    assert_eq!(remote.upsert_count(), 0);
}

#[tokio::test]
async fn missing_row_is_repaired_for_known_user() {
    let (engine, _, remote) = remote_engine();
    remote.set_fail_upsert(true);
    engine.save(&titled("offline edit")).await;
    remote.set_fail_upsert(false);

    assert_eq!(remote.row(CONTENT_ROW_ID), None);
    assert_eq!(engine.load().await, titled("offline edit"));
    assert_eq!(remote_document(&remote), Some(titled("offline edit")));
}

#[tokio::test]
async fn missing_row_on_first_run_is_left_alone() {
    let (engine, _, remote) = remote_engine();

    assert!(is_default(&engine.load().await));
    assert_eq!(remote.upsert_count(), 0);
}

/// A known install whose cache is gone but whose history survived.
fn engine_with_history_only(
    cache: Option<&str>,
) -> (ContentEngine, Arc<MemoryLocalStore>, Arc<MemoryRemoteStore>) {
    let store = Arc::new(MemoryLocalStore::new());
    let history = History::new(store.clone(), 3);
    history.push(&titled("older"), HistorySource::ManualSave).unwrap();
    history.push(&titled("newest"), HistorySource::ManualSave).unwrap();
    store.set(USER_DATA_KEY, "true").unwrap();
    if let Some(raw) = cache {
        store.set(CONTENT_KEY, raw).unwrap();
    }

    let remote = Arc::new(MemoryRemoteStore::new());
    let engine = ContentEngine::new(store.clone(), EngineConfig::default()).with_remote(remote.clone());
    (engine, store, remote)
}

#[tokio::test]
async fn default_remote_and_corrupt_cache_recover_from_history() {
    let (engine, _, remote) = engine_with_history_only(Some("{{{"));
    remote.insert_row(CONTENT_ROW_ID, serde_json::to_value(default_document()).unwrap());

    assert_eq!(engine.load().await, titled("newest"));
    assert_eq!(remote_document(&remote), Some(titled("newest")));
    assert_eq!(remote.upsert_count(), 1);
}

#[tokio::test]
async fn blank_remote_and_missing_cache_recover_from_history() {
    let (engine, _, remote) = engine_with_history_only(None);
    remote.insert_row(CONTENT_ROW_ID, json!(null));

    assert_eq!(engine.load().await, titled("newest"));
    assert_eq!(remote_document(&remote), Some(titled("newest")));
}

#[tokio::test]
async fn missing_row_and_missing_cache_recover_from_history() {
    let (engine, _, remote) = engine_with_history_only(None);

    assert_eq!(engine.load().await, titled("newest"));
    assert_eq!(remote_document(&remote), Some(titled("newest")));
    assert_eq!(remote.upsert_count(), 1);
}

#[tokio::test]
async fn load_publishes_its_source() {
    let (engine, _) = local_engine();
    let mut events = engine.events().subscribe();

    engine.load().await;
    assert_eq!(
        events.recv().await.unwrap(),
        ContentEvent::Loaded {
            source: DataSource::Default
        }
    );
}

// ---------------------------------------------------------------------------
// save_debounced
// ---------------------------------------------------------------------------

fn debounced_engine() -> (Arc<ContentEngine>, Arc<MemoryRemoteStore>) {
    let store = Arc::new(MemoryLocalStore::new());
    let remote = Arc::new(MemoryRemoteStore::new());
    let engine = ContentEngine::new(store, EngineConfig::default()).with_remote(remote.clone());
    (Arc::new(engine), remote)
}

#[tokio::test(start_paused = true)]
async fn rapid_saves_coalesce_into_the_last_one() {
    let (engine, remote) = debounced_engine();

    let handles: Vec<DebouncedSave> = (1..=5)
        .map(|i| engine.save_debounced(titled(&format!("d{i}"))))
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.outcome().await);
    }

    assert!(outcomes[..4].iter().all(Option::is_none));
    assert_eq!(outcomes[4], Some(SaveOutcome::saved(SAVED)));
    assert_eq!(remote.upsert_count(), 1);
    assert_eq!(remote_document(&remote), Some(titled("d5")));
    assert_eq!(engine.get_history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn superseded_save_has_no_side_effects() {
    let (engine, remote) = debounced_engine();

    let first = engine.save_debounced(titled("first"));
    tokio::time::sleep(Duration::from_millis(600)).await;
    let second = engine.save_debounced(titled("second"));

    // Past the first save's deadline but inside the second's window.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(remote.upsert_count(), 0);
    assert!(!engine.has_user_data());
    assert!(engine.has_pending_save());

    assert_eq!(first.outcome().await, None);
    assert!(second.outcome().await.unwrap().success);
    assert_eq!(remote_document(&remote), Some(titled("second")));
}

#[tokio::test(start_paused = true)]
async fn saves_outside_the_window_both_run() {
    let (engine, remote) = debounced_engine();

    let first = engine.save_debounced(titled("first"));
    assert!(first.outcome().await.is_some());

    let second = engine.save_debounced(titled("second"));
    assert!(second.outcome().await.is_some());

    assert_eq!(remote.upsert_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn flush_runs_pending_save_immediately() {
    let (engine, remote) = debounced_engine();
    let handle = engine.save_debounced(titled("flushed"));

    let outcome = engine.flush_pending().await;
    assert_eq!(outcome, Some(SaveOutcome::saved(SAVED)));
    assert_eq!(handle.outcome().await, outcome);
    assert!(!engine.has_pending_save());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(remote.upsert_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_pending_save() {
    let (engine, remote) = debounced_engine();
    let handle = engine.save_debounced(titled("dropped"));

    assert!(engine.cancel_pending());
    assert!(!engine.cancel_pending());
    assert_eq!(handle.outcome().await, None);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(remote.upsert_count(), 0);
}
