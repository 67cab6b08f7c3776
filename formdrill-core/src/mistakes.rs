//! Missed-pose records and their round-robin replay cursor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::KeyValueStore;
use crate::orientation::Orientation;

/// One previously-missed pose: the shape and the exact orientation the user
/// was tested on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeEntry {
    pub shape_id: String,
    pub tier: u8,
    pub orientation: Orientation,
}

/// Ordered bank of missed poses with an in-memory replay cursor.
///
/// The entry list persists as a JSON array in insertion order; the cursor
/// restarts at 0 on every load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MistakeBank {
    entries: Vec<MistakeEntry>,
    cursor: usize,
}

impl MistakeBank {
    /// Load the bank, silently dropping malformed entries. Absent or
    /// unparseable blobs yield an empty bank.
    pub fn load<S: KeyValueStore>(store: &S, key: &str) -> Self {
        let Ok(Some(raw)) = store.get(key) else {
            return Self::default();
        };
        let Ok(Value::Array(items)) = serde_json::from_str(&raw) else {
            return Self::default();
        };
        let entries = items.iter().filter_map(parse_entry).collect();
        Self { entries, cursor: 0 }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded entries in replay order.
    #[must_use]
    pub fn entries(&self) -> &[MistakeEntry] {
        &self.entries
    }

    /// Append a record and persist the whole bank immediately.
    ///
    /// # Errors
    ///
    /// Returns the storage error when the write fails; the in-memory entry is
    /// kept either way.
    pub fn append<S: KeyValueStore>(
        &mut self,
        store: &S,
        key: &str,
        entry: MistakeEntry,
    ) -> Result<(), S::Error> {
        self.entries.push(entry);
        self.persist(store, key)
    }

    /// Drop every record, rewind the cursor, and persist immediately.
    ///
    /// # Errors
    ///
    /// Returns the storage error when the write fails.
    pub fn clear<S: KeyValueStore>(&mut self, store: &S, key: &str) -> Result<(), S::Error> {
        self.entries.clear();
        self.cursor = 0;
        self.persist(store, key)
    }

    /// Next entry in round-robin replay order, `None` on an empty bank.
    ///
    /// Repeated shape ids are replayed as often as they were recorded; the
    /// cursor wraps modulo the bank length.
    pub fn next_for_replay(&mut self) -> Option<MistakeEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.entries.len();
        Some(entry)
    }

    fn persist<S: KeyValueStore>(&self, store: &S, key: &str) -> Result<(), S::Error> {
        let blob = serde_json::to_string(&self.entries).unwrap_or_default();
        store.set(key, &blob)
    }
}

/// Accept only entries with a textual shape id and an orientation that is
/// exactly four numbers; anything else is dropped, not repaired.
#[allow(clippy::cast_possible_truncation)]
fn parse_entry(value: &Value) -> Option<MistakeEntry> {
    let shape_id = value.get("shapeId")?.as_str()?;
    let components = value.get("orientation")?.as_array()?;
    if components.len() != 4 {
        return None;
    }
    let mut pose = [0.0_f32; 4];
    for (slot, component) in pose.iter_mut().zip(components) {
        *slot = component.as_f64()? as f32;
    }
    let tier = value.get("tier").and_then(Value::as_u64).unwrap_or(0) as u8;
    Some(MistakeEntry {
        shape_id: shape_id.to_string(),
        tier,
        orientation: Orientation(pose),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    const KEY: &str = "mistakes";

    fn entry(shape_id: &str) -> MistakeEntry {
        MistakeEntry {
            shape_id: shape_id.to_string(),
            tier: 1,
            orientation: Orientation::IDENTITY,
        }
    }

    #[test]
    fn load_returns_empty_bank_for_missing_or_garbage_blobs() {
        let store = MemoryStore::new();
        assert!(MistakeBank::load(&store, KEY).is_empty());
        store.seed(KEY, "{not json");
        assert!(MistakeBank::load(&store, KEY).is_empty());
        store.seed(KEY, r#"{"shapeId":"cube"}"#);
        assert!(MistakeBank::load(&store, KEY).is_empty());
    }

    #[test]
    fn load_keeps_the_valid_subset() {
        let store = MemoryStore::new();
        store.seed(
            KEY,
            r#"[
                {"shapeId":"cube","tier":1,"orientation":[0,0,0,1]},
                {"shapeId":42,"tier":1,"orientation":[0,0,0,1]},
                {"shapeId":"torus","tier":1,"orientation":[0,0,0]},
                {"shapeId":"cone","tier":1,"orientation":[0,0,"x",1]},
                {"shapeId":"sphere","tier":2,"orientation":[0.5,0.5,0.5,0.5]}
            ]"#,
        );
        let bank = MistakeBank::load(&store, KEY);
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.entries()[0].shape_id, "cube");
        assert_eq!(bank.entries()[1].shape_id, "sphere");
        assert_eq!(bank.entries()[1].tier, 2);
    }

    #[test]
    fn append_persists_immediately() {
        let store = MemoryStore::new();
        let mut bank = MistakeBank::default();
        bank.append(&store, KEY, entry("cube")).unwrap();
        bank.append(&store, KEY, entry("torus")).unwrap();

        let reloaded = MistakeBank::load(&store, KEY);
        assert_eq!(reloaded.entries(), bank.entries());
    }

    #[test]
    fn clear_empties_bank_and_storage() {
        let store = MemoryStore::new();
        let mut bank = MistakeBank::default();
        bank.append(&store, KEY, entry("cube")).unwrap();
        bank.next_for_replay();
        bank.clear(&store, KEY).unwrap();

        assert!(bank.is_empty());
        assert_eq!(store.raw(KEY).as_deref(), Some("[]"));
        assert!(bank.next_for_replay().is_none());
    }

    #[test]
    fn replay_is_round_robin_over_insertion_order() {
        let store = MemoryStore::new();
        let mut bank = MistakeBank::default();
        for id in ["cube", "torus", "cube"] {
            bank.append(&store, KEY, entry(id)).unwrap();
        }

        let visited: Vec<_> = (0..4)
            .map(|_| bank.next_for_replay().unwrap().shape_id)
            .collect();
        assert_eq!(visited, ["cube", "torus", "cube", "cube"]);
    }

    #[test]
    fn cursor_restarts_after_reload() {
        let store = MemoryStore::new();
        let mut bank = MistakeBank::default();
        bank.append(&store, KEY, entry("cube")).unwrap();
        bank.append(&store, KEY, entry("torus")).unwrap();
        bank.next_for_replay();

        let mut reloaded = MistakeBank::load(&store, KEY);
        assert_eq!(reloaded.next_for_replay().unwrap().shape_id, "cube");
    }
}
