#![cfg(target_arch = "wasm32")]

use formdrill_core::{KeyValueStore, MISTAKES_KEY_V1, PracticeMode, SessionConfig, SessionEngine};
use formdrill_web::storage::BrowserStore;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn raw_blobs_round_trip_through_local_storage() {
    let store = BrowserStore;
    store.set("formdrill_test_key", r#"{"totalRounds":3}"#).unwrap();
    assert_eq!(
        store.get("formdrill_test_key").unwrap().as_deref(),
        Some(r#"{"totalRounds":3}"#)
    );
    assert!(store.get("formdrill_test_missing").unwrap().is_none());
}

#[wasm_bindgen_test]
fn engine_over_local_storage_persists_mistakes() {
    let store = BrowserStore;
    store.set(MISTAKES_KEY_V1, "[]").unwrap();

    let mut engine = SessionEngine::new(store, SessionConfig::default(), 1);
    engine.mark_mistake();

    let config = SessionConfig {
        mode: PracticeMode::RepeatMistakes,
        ..SessionConfig::default()
    };
    let resumed = SessionEngine::new(BrowserStore, config, 2);
    assert_eq!(resumed.mistake_count(), 1);
    assert!(resumed.selection().replayed);
}
