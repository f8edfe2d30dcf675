use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable rules of a [`GameSession`](super::GameSession).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use tetrust_engine::{Randomizer, SessionConfig};
///
/// let config: SessionConfig =
///     serde_json::from_str(r#"{ "randomizer": "uniform", "preview_count": 3 }"#).unwrap();
/// assert_eq!(config.randomizer, Randomizer::Uniform);
/// assert_eq!(config.preview_count, 3);
/// assert!(config.hold_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub scoring: ScoringRules,
    pub gravity: GravityCurve,
    pub randomizer: Randomizer,
    pub hold_enabled: bool,
    /// Number of upcoming pieces exposed to renderers (at most [`MAX_PREVIEW`]).
    pub preview_count: usize,
}

/// Upper bound for [`SessionConfig::preview_count`].
pub const MAX_PREVIEW: usize = 7;

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringRules::default(),
            gravity: GravityCurve::default(),
            randomizer: Randomizer::default(),
            hold_enabled: true,
            preview_count: 1,
        }
    }
}

/// Point awards and level pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringRules {
    /// Base points indexed by lines cleared in one lock (0 to 4).
    ///
    /// The award is multiplied by the level at the time of the clear.
    pub line_clear: [u64; 5],
    pub soft_drop_per_cell: u64,
    pub hard_drop_per_cell: u64,
    pub lines_per_level: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            line_clear: [0, 100, 300, 500, 800],
            soft_drop_per_cell: 1,
            hard_drop_per_cell: 2,
            lines_per_level: 10,
        }
    }
}

impl ScoringRules {
    /// Points for clearing `lines` rows with a single lock at `level`.
    ///
    /// Clears of more than four rows (only reachable on hand-built boards)
    /// score as a four-row clear. The result saturates at `u64::MAX`.
    #[must_use]
    pub fn line_clear_points(&self, lines: usize, level: u32) -> u64 {
        let index = lines.min(self.line_clear.len() - 1);
        self.line_clear[index].saturating_mul(u64::from(level))
    }

    /// Level reached after `total_lines` cleared rows, starting from 1.
    #[must_use]
    pub fn level_for(&self, total_lines: usize) -> u32 {
        let per_level = usize::try_from(self.lines_per_level.max(1)).unwrap_or(usize::MAX);
        u32::try_from(total_lines / per_level)
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }
}

/// Automatic drop interval as a function of the level.
///
/// `interval(level) = max(min_ms, initial_ms - (level - 1) * step_ms)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GravityCurve {
    pub initial_ms: u64,
    pub step_ms: u64,
    pub min_ms: u64,
}

impl Default for GravityCurve {
    fn default() -> Self {
        Self {
            initial_ms: 1000,
            step_ms: 50,
            min_ms: 100,
        }
    }
}

impl GravityCurve {
    #[must_use]
    pub fn interval(&self, level: u32) -> Duration {
        let speedup = u64::from(level.saturating_sub(1)).saturating_mul(self.step_ms);
        let millis = self.initial_ms.saturating_sub(speedup).max(self.min_ms);
        Duration::from_millis(millis)
    }
}

/// How upcoming piece kinds are drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Randomizer {
    /// Each kind exactly once per shuffled batch of seven.
    #[default]
    SevenBag,
    /// Independent uniform draws.
    Uniform,
}
