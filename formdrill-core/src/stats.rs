//! Aggregate statistics persistence and round accounting.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::KeyValueStore;
use crate::numbers::floor_f64_to_u32;

/// Lifetime totals persisted across sessions.
///
/// `best_streak` is non-decreasing; `total_rounds` and `total_time` only grow
/// within a process lifetime except through an explicit user reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_rounds: u32,
    pub total_time: f64,
    pub best_streak: u32,
}

/// Per-session counters, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionCounters {
    pub session_rounds: u32,
    pub session_streak: u32,
}

/// Account one naturally completed round of the given nominal duration.
pub fn apply_completed_round(
    stats: &mut SessionStats,
    counters: &mut SessionCounters,
    round_duration_seconds: f64,
) {
    counters.session_rounds += 1;
    counters.session_streak += 1;
    stats.total_rounds += 1;
    stats.total_time += round_duration_seconds;
    stats.best_streak = stats.best_streak.max(counters.session_streak);
}

/// Load stats from storage, degrading to zeroed defaults on any failure.
pub fn load_stats<S: KeyValueStore>(store: &S, key: &str) -> SessionStats {
    let Ok(Some(raw)) = store.get(key) else {
        return SessionStats::default();
    };
    serde_json::from_str::<Value>(&raw)
        .map(|value| sanitize_stats(&value))
        .unwrap_or_default()
}

/// Coerce a parsed blob field by field, substituting 0 for anything that is
/// not a number or numeric string.
#[must_use]
pub fn sanitize_stats(value: &Value) -> SessionStats {
    SessionStats {
        total_rounds: floor_f64_to_u32(coerce_number(value.get("totalRounds"))),
        total_time: coerce_number(value.get("totalTime")).max(0.0),
        best_streak: floor_f64_to_u32(coerce_number(value.get("bestStreak"))),
    }
}

fn coerce_number(value: Option<&Value>) -> f64 {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if coerced.is_finite() { coerced } else { 0.0 }
}

/// Serialize and write the stats blob as a single atomic value.
///
/// # Errors
///
/// Returns the storage error when the write fails.
pub fn save_stats<S: KeyValueStore>(
    store: &S,
    key: &str,
    stats: &SessionStats,
) -> Result<(), S::Error> {
    let blob = serde_json::to_string(stats).unwrap_or_default();
    store.set(key, &blob)
}
