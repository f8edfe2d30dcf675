use std::time::Duration;

use crate::core::PieceKind;

use super::config::ScoringRules;

/// Game statistics tracking score, level, lines cleared, and piece count.
///
/// # Scoring
///
/// Line clears are scored once per lock, from the number of rows that lock
/// removed, multiplied by the level *before* the clear is counted. Clearing
/// one row and then three rows therefore scores differently from clearing
/// four rows at once. There are no combo, back-to-back or T-spin bonuses;
/// the combo counter is informational only.
///
/// # Example
///
/// ```
/// use tetrust_engine::{GameStats, PieceKind, ScoringRules};
///
/// let rules = ScoringRules::default();
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(PieceKind::I, 4, &rules); // Tetris at level 1
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    level: u32,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
    piece_counter: [usize; PieceKind::LEN],
    combo: usize,
    max_combo: usize,
    play_time: Duration,
}

/// What a single lock contributed to the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceDropResult {
    pub cleared_lines: usize,
    pub points: u64,
    /// The new level, if this lock raised it.
    pub level_up: Option<u32>,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
            piece_counter: [0; PieceKind::LEN],
            combo: 0,
            max_combo: 0,
            play_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// - `[0]`: locks that cleared nothing
    /// - `[1]`..`[3]`: singles, doubles, triples
    /// - `[4]`: tetrises
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    #[must_use]
    pub const fn piece_count(&self, kind: PieceKind) -> usize {
        self.piece_counter[kind as usize]
    }

    /// Consecutive locks that each cleared at least one row.
    #[must_use]
    pub const fn combo(&self) -> usize {
        self.combo
    }

    #[must_use]
    pub const fn max_combo(&self) -> usize {
        self.max_combo
    }

    /// Time spent in the playing state.
    #[must_use]
    pub const fn play_time(&self) -> Duration {
        self.play_time
    }

    /// Records one lock of a `kind` piece that removed `cleared_lines` rows.
    pub fn complete_piece_drop(
        &mut self,
        kind: PieceKind,
        cleared_lines: usize,
        rules: &ScoringRules,
    ) -> PieceDropResult {
        self.completed_pieces += 1;
        self.piece_counter[kind as usize] += 1;
        let bucket = cleared_lines.min(self.line_cleared_counter.len() - 1);
        self.line_cleared_counter[bucket] += 1;

        if cleared_lines == 0 {
            self.combo = 0;
            return PieceDropResult {
                cleared_lines,
                points: 0,
                level_up: None,
            };
        }

        let points = rules.line_clear_points(cleared_lines, self.level);
        self.score = self.score.saturating_add(points);
        self.total_cleared_lines += cleared_lines;
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);

        let level = rules.level_for(self.total_cleared_lines);
        let level_up = (level > self.level).then_some(level);
        self.level = level;

        PieceDropResult {
            cleared_lines,
            points,
            level_up,
        }
    }

    /// Adds soft or hard drop points.
    pub fn add_drop_bonus(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_play_time(&mut self, elapsed: Duration) {
        self.play_time += elapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.total_cleared_lines(), 0);
        assert_eq!(stats.completed_pieces(), 0);
    }

    #[test]
    fn test_tetris_scores_800_times_level() {
        let rules = ScoringRules::default();
        let mut stats = GameStats::new();
        // Raise to level 2 first: 10 lines as singles at level 1.
        for _ in 0..10 {
            stats.complete_piece_drop(PieceKind::I, 1, &rules);
        }
        assert_eq!(stats.level(), 2);
        let before = stats.score();

        let result = stats.complete_piece_drop(PieceKind::I, 4, &rules);
        assert_eq!(result.points, 800 * 2);
        assert_eq!(stats.score() - before, 1600);
    }

    #[test]
    fn test_scoring_is_per_lock_event() {
        let rules = ScoringRules::default();

        let mut split = GameStats::new();
        split.complete_piece_drop(PieceKind::J, 1, &rules);
        split.complete_piece_drop(PieceKind::L, 3, &rules);

        let mut single = GameStats::new();
        single.complete_piece_drop(PieceKind::I, 4, &rules);

        assert_eq!(split.score(), 100 + 500);
        assert_eq!(single.score(), 800);
        assert_eq!(split.total_cleared_lines(), single.total_cleared_lines());
        assert_ne!(split.score(), single.score());
    }

    #[test]
    fn test_level_uses_level_before_clear() {
        let rules = ScoringRules::default();
        let mut stats = GameStats::new();
        for _ in 0..2 {
            stats.complete_piece_drop(PieceKind::I, 4, &rules);
        }
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.score(), 1600);

        // 8 -> 12 lines: awarded at level 1, then level becomes 2.
        let result = stats.complete_piece_drop(PieceKind::I, 4, &rules);
        assert_eq!(result.points, 800);
        assert_eq!(result.level_up, Some(2));
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_counters_and_combo() {
        let rules = ScoringRules::default();
        let mut stats = GameStats::new();
        stats.complete_piece_drop(PieceKind::T, 1, &rules);
        stats.complete_piece_drop(PieceKind::T, 2, &rules);
        stats.complete_piece_drop(PieceKind::O, 0, &rules);
        stats.complete_piece_drop(PieceKind::S, 1, &rules);

        assert_eq!(stats.completed_pieces(), 4);
        assert_eq!(stats.piece_count(PieceKind::T), 2);
        assert_eq!(stats.piece_count(PieceKind::Z), 0);
        assert_eq!(stats.line_cleared_counter(), &[1, 2, 1, 0, 0]);
        assert_eq!(stats.combo(), 1);
        assert_eq!(stats.max_combo(), 2);
    }

    #[test]
    fn test_drop_bonus_and_play_time() {
        let mut stats = GameStats::new();
        stats.add_drop_bonus(2 * 17);
        stats.add_play_time(Duration::from_millis(250));
        stats.add_play_time(Duration::from_millis(750));
        assert_eq!(stats.score(), 34);
        assert_eq!(stats.play_time(), Duration::from_secs(1));
        assert_eq!(stats.level(), 1);
    }

    #[test]
    fn test_score_saturates() {
        let rules = ScoringRules {
            line_clear: [0, u64::MAX, u64::MAX, u64::MAX, u64::MAX],
            ..ScoringRules::default()
        };
        let mut stats = GameStats::new();
        stats.add_drop_bonus(u64::MAX - 1);
        stats.add_drop_bonus(2);
        assert_eq!(stats.score(), u64::MAX);

        let result = stats.complete_piece_drop(PieceKind::I, 1, &rules);
        assert_eq!(result.points, u64::MAX);
        assert_eq!(stats.score(), u64::MAX);
    }
}
