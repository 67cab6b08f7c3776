//! Practice session state machine.
//!
//! Orchestrates the countdown, round/streak accounting, the shape-selection
//! policy (tier filter x practice mode x keep-angle), and mistake
//! recording/replay. UI and rendering collaborate from the outside: UI events
//! call the methods here, and every pick is surfaced as a [`ShapeSelection`]
//! for the renderer to visualize.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::KeyValueStore;
use crate::catalog::{ShapeCatalog, ShapeDescriptor};
use crate::config::{PracticeMode, SessionConfig, StorageKeys, TierSelector};
use crate::mistakes::{MistakeBank, MistakeEntry};
use crate::orientation::Orientation;
use crate::stats::{self, SessionCounters, SessionStats};
use crate::time::cycle_time;

/// Lifecycle of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

/// Transient, user-visible conditions raised by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Repeat-mistakes was requested with nothing recorded; the engine
    /// reverted to normal practice.
    MistakeBankEmpty,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MistakeBankEmpty => {
                write!(f, "No mistakes recorded yet; switching back to normal practice.")
            }
        }
    }
}

/// A chosen shape plus the pose to present it in.
#[derive(Debug, Clone, Copy)]
pub struct ShapeSelection {
    pub shape: &'static ShapeDescriptor,
    pub orientation: Orientation,
    /// True when the pose came from the mistake bank.
    pub replayed: bool,
}

/// The practice session engine.
///
/// Generic over the key-value persistence capability. Storage writes made on
/// the engine's own behalf are best-effort: a failed write costs only
/// aggregate statistics, never the round in progress.
#[derive(Debug)]
pub struct SessionEngine<S: KeyValueStore> {
    store: S,
    keys: StorageKeys,
    catalog: ShapeCatalog,
    config: SessionConfig,
    phase: Phase,
    remaining_seconds: f64,
    stats: SessionStats,
    counters: SessionCounters,
    bank: MistakeBank,
    current: ShapeSelection,
    notices: Vec<Notice>,
    rng: ChaCha20Rng,
}

impl<S: KeyValueStore> SessionEngine<S> {
    /// Build an engine over `store` with the default storage keys.
    pub fn new(store: S, config: SessionConfig, seed: u64) -> Self {
        Self::with_keys(store, StorageKeys::default(), config, seed)
    }

    /// Build an engine with explicit storage keys over the built-in catalog.
    pub fn with_keys(store: S, keys: StorageKeys, config: SessionConfig, seed: u64) -> Self {
        Self::with_catalog(store, keys, ShapeCatalog::builtin(), config, seed)
    }

    /// Build an engine over a custom shape registry, loading persisted stats
    /// and mistakes and selecting the first shape.
    pub fn with_catalog(
        store: S,
        keys: StorageKeys,
        catalog: ShapeCatalog,
        config: SessionConfig,
        seed: u64,
    ) -> Self {
        let stats = stats::load_stats(&store, &keys.stats);
        let bank = MistakeBank::load(&store, &keys.mistakes);
        let remaining = cycle_time(config.duration_seconds, config.auto_switch_seconds);
        let mut engine = Self {
            store,
            keys,
            catalog,
            config,
            phase: Phase::Idle,
            remaining_seconds: remaining,
            stats,
            counters: SessionCounters::default(),
            bank,
            current: ShapeSelection {
                shape: catalog.fallback(),
                orientation: Orientation::IDENTITY,
                replayed: false,
            },
            notices: Vec::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        };
        // The opening pick never keeps a shape: there is nothing to keep yet.
        engine.current = engine.select_next(false);
        engine
    }

    /// `Idle|Paused -> Running`; no-op while already running.
    ///
    /// The caller owns the wall clock and must restart its delta reference
    /// when this returns, so the first tick does not observe paused time.
    pub fn start(&mut self) {
        if self.phase != Phase::Running {
            self.phase = Phase::Running;
        }
    }

    /// `Running -> Paused`; no-op otherwise.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running)
    }

    /// Advance the countdown while running. Returns the new selection when
    /// the countdown crosses zero and a round completes.
    ///
    /// `delta_seconds` must be clamped to [`crate::time::MAX_TICK_SECONDS`]
    /// by the caller; the engine assumes at most one crossing per call.
    pub fn tick(&mut self, delta_seconds: f64) -> Option<ShapeSelection> {
        if self.phase != Phase::Running {
            return None;
        }
        self.remaining_seconds -= delta_seconds;
        if self.remaining_seconds <= 0.0 {
            return Some(self.advance(true));
        }
        None
    }

    /// Manual skip: replace the shape without crediting a round, then break
    /// the session streak. Session rounds are untouched.
    pub fn skip(&mut self) -> ShapeSelection {
        let selection = self.advance(false);
        self.counters.session_streak = 0;
        selection
    }

    /// Record the active pose in the mistake bank (persists immediately).
    pub fn mark_mistake(&mut self) {
        let entry = MistakeEntry {
            shape_id: self.current.shape.id.to_string(),
            tier: self.current.shape.tier,
            orientation: self.current.orientation,
        };
        let _ = self.bank.append(&self.store, &self.keys.mistakes, entry);
    }

    /// Forget every recorded mistake.
    pub fn clear_mistakes(&mut self) {
        let _ = self.bank.clear(&self.store, &self.keys.mistakes);
    }

    /// Zero the persisted totals and the session counters.
    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
        self.counters = SessionCounters::default();
        let _ = stats::save_stats(&self.store, &self.keys.stats, &self.stats);
    }

    /// Apply a mode-change event.
    ///
    /// Tier, practice-mode, and keep-angle changes take effect on the next
    /// advance, except switching into repeat-mistakes with an empty bank,
    /// which reverts to normal immediately with a notice. Timing changes
    /// reset the countdown to the new cycle length.
    pub fn apply_config(&mut self, mut config: SessionConfig) {
        if config.mode == PracticeMode::RepeatMistakes && self.bank.is_empty() {
            self.notices.push(Notice::MistakeBankEmpty);
            config.mode = PracticeMode::Normal;
        }
        let timing_changed = (config.duration_seconds - self.config.duration_seconds).abs()
            > f64::EPSILON
            || (config.auto_switch_seconds - self.config.auto_switch_seconds).abs() > f64::EPSILON;
        self.config = config;
        if timing_changed {
            self.remaining_seconds =
                cycle_time(self.config.duration_seconds, self.config.auto_switch_seconds);
        }
    }

    fn advance(&mut self, as_round: bool) -> ShapeSelection {
        if as_round {
            stats::apply_completed_round(
                &mut self.stats,
                &mut self.counters,
                self.config.duration_seconds,
            );
            let _ = stats::save_stats(&self.store, &self.keys.stats, &self.stats);
        }
        self.current = self.select_next(self.config.keep_angle);
        self.remaining_seconds =
            cycle_time(self.config.duration_seconds, self.config.auto_switch_seconds);
        self.current
    }

    /// Selection policy: mistake replay first, then the tier pool.
    fn select_next(&mut self, keep_allowed: bool) -> ShapeSelection {
        if self.config.mode == PracticeMode::RepeatMistakes {
            if let Some(entry) = self.bank.next_for_replay() {
                // Replay the exact recorded pose; keep-angle does not apply.
                let shape = self
                    .catalog
                    .by_id(&entry.shape_id)
                    .unwrap_or_else(|| self.catalog.fallback());
                return ShapeSelection {
                    shape,
                    orientation: entry.orientation,
                    replayed: true,
                };
            }
            self.notices.push(Notice::MistakeBankEmpty);
            self.config.mode = PracticeMode::Normal;
        }

        let pool = self.pool();
        assert!(
            !pool.is_empty(),
            "shape catalog has no shapes for {:?}",
            self.config.tier
        );
        let shape = if keep_allowed && pool.iter().any(|c| c.id == self.current.shape.id) {
            self.current.shape
        } else {
            pool[self.rng.gen_range(0..pool.len())]
        };
        ShapeSelection {
            shape,
            orientation: Orientation::random(&mut self.rng),
            replayed: false,
        }
    }

    fn pool(&self) -> Vec<&'static ShapeDescriptor> {
        match self.config.tier {
            TierSelector::Tier(tier) => self.catalog.by_tier(tier),
            TierSelector::Mixed => self.catalog.mixed(),
        }
    }

    /// The active shape and pose.
    #[must_use]
    pub const fn selection(&self) -> &ShapeSelection {
        &self.current
    }

    #[must_use]
    pub const fn remaining_seconds(&self) -> f64 {
        self.remaining_seconds
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub const fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    /// Number of recorded mistakes.
    #[must_use]
    pub fn mistake_count(&self) -> usize {
        self.bank.len()
    }

    /// Drain queued transient notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
