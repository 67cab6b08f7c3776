//! Session configuration and storage key material.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default storage key for aggregate session statistics.
pub const STATS_KEY_V1: &str = "shape_trainer_stats_v1";
/// Default storage key for the mistake bank.
pub const MISTAKES_KEY_V1: &str = "shape_trainer_mistakes_v1";

/// Storage key names, configurable so app instances do not collide.
///
/// The stored schema is versioned by key suffix; an incompatible change uses
/// a new key instead of mutating the stored shape in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub stats: String,
    pub mistakes: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            stats: STATS_KEY_V1.to_string(),
            mistakes: MISTAKES_KEY_V1.to_string(),
        }
    }
}

/// How the next shape is chosen on advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeMode {
    /// Random pick from the tier pool.
    Normal,
    /// Round-robin replay of recorded mistakes.
    RepeatMistakes,
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PracticeMode::Normal => write!(f, "Normal"),
            PracticeMode::RepeatMistakes => write!(f, "Repeat Mistakes"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unrecognized practice mode: {0}")]
pub struct ParsePracticeModeError(String);

impl FromStr for PracticeMode {
    type Err = ParsePracticeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "repeat-mistakes" => Ok(Self::RepeatMistakes),
            other => Err(ParsePracticeModeError(other.to_string())),
        }
    }
}

/// Difficulty filter for the selection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierSelector {
    Tier(u8),
    Mixed,
}

impl fmt::Display for TierSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierSelector::Tier(tier) => write!(f, "Tier {tier}"),
            TierSelector::Mixed => write!(f, "Mixed"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unrecognized tier selector: {0}")]
pub struct ParseTierSelectorError(String);

impl FromStr for TierSelector {
    type Err = ParseTierSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "mixed" {
            return Ok(Self::Mixed);
        }
        match s.parse::<u8>() {
            Ok(tier) if tier >= 1 => Ok(Self::Tier(tier)),
            _ => Err(ParseTierSelectorError(s.to_string())),
        }
    }
}

/// Mode axes and timing knobs, passed to the engine as a whole on every
/// mode-change event so the state machine stays decoupled from any UI toolkit.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub duration_seconds: f64,
    /// Faster shape-switch cadence; 0 disables it.
    pub auto_switch_seconds: f64,
    pub tier: TierSelector,
    pub mode: PracticeMode,
    /// Re-pose the current shape instead of replacing it, when the pool
    /// still contains it.
    pub keep_angle: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 60.0,
            auto_switch_seconds: 0.0,
            tier: TierSelector::Mixed,
            mode: PracticeMode::Normal,
            keep_angle: false,
        }
    }
}
