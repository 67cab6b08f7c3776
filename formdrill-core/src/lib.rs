//! Formdrill Session Engine
//!
//! Platform-agnostic core logic for the Formdrill perspective-drawing
//! trainer: the practice state machine, statistics and mistake-bank
//! persistence, and the static shape catalog, without UI or platform-specific
//! dependencies. Rendering and DOM binding live in platform adapters such as
//! `formdrill-web`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

pub mod blueprint;
pub mod catalog;
pub mod config;
pub mod mistakes;
pub mod numbers;
pub mod orientation;
pub mod session;
pub mod stats;
pub mod time;

// Re-export commonly used types
pub use blueprint::{BuildFn, Part, PartList, Primitive, ShapeBlueprint};
pub use catalog::{BUILTIN_SHAPES, ShapeCatalog, ShapeDescriptor};
pub use config::{
    MISTAKES_KEY_V1, ParsePracticeModeError, ParseTierSelectorError, PracticeMode, STATS_KEY_V1,
    SessionConfig, StorageKeys, TierSelector,
};
pub use mistakes::{MistakeBank, MistakeEntry};
pub use orientation::Orientation;
pub use session::{Notice, Phase, SessionEngine, ShapeSelection};
pub use stats::{
    SessionCounters, SessionStats, apply_completed_round, load_stats, sanitize_stats, save_stats,
};
pub use time::{MAX_TICK_SECONDS, cycle_time, format_clock, format_short_duration};

/// Minimal key-value persistence capability.
///
/// Platform-specific adapters implement this over whatever storage the host
/// provides (browser localStorage in `formdrill-web`). Reads and writes are
/// synchronous; the core degrades to defaults on failed reads and treats its
/// own writes as best-effort.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// In-memory [`KeyValueStore`] for tests and headless sessions.
///
/// Clones share the same backing map, mirroring how independent handles to a
/// browser's localStorage observe each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob currently stored under `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Pre-seed a blob, bypassing the capability interface.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_persists_and_a_fresh_engine_reloads() {
        let store = MemoryStore::new();
        let config = SessionConfig {
            duration_seconds: 0.05,
            ..SessionConfig::default()
        };

        let mut session = SessionEngine::new(store.clone(), config.clone(), 0xABCD);
        session.start();
        session.tick(0.05);
        session.mark_mistake();
        assert_eq!(session.stats().total_rounds, 1);

        let reloaded = SessionEngine::new(store, config, 0xABCD);
        assert_eq!(reloaded.stats().total_rounds, 1);
        assert_eq!(reloaded.mistake_count(), 1);
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let alias = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(alias.get("k").unwrap().as_deref(), Some("v"));
    }
}
