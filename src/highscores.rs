//! Best-runs board
//!
//! Runs are ranked by score, then by the level reached, then by how long the
//! player lasted. Equal runs keep the older one ahead. Storage is handled by
//! a [`HighScoreStore`](crate::persistence::HighScoreStore).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Runs kept on the board
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Player level reached
    pub level: u32,
    pub survived_secs: f64,
    /// Unix time (ms) the run ended
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// `Less` when `self` belongs above `other`
    pub fn rank_against(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.level.cmp(&self.level))
            .then_with(|| other.survived_secs.total_cmp(&self.survived_secs))
            .then_with(|| self.timestamp.total_cmp(&other.timestamp))
    }
}

/// Best runs, ordered by [`HighScoreEntry::rank_against`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Board index `run` would take, if it makes the board at all
    pub fn placement(&self, run: &HighScoreEntry) -> Option<usize> {
        if run.score == 0 {
            return None;
        }
        let index = self
            .entries
            .partition_point(|kept| kept.rank_against(run) != Ordering::Greater);
        (index < MAX_HIGH_SCORES).then_some(index)
    }

    /// Put a finished run on the board; returns its 1-based rank
    pub fn record(&mut self, run: HighScoreEntry) -> Option<usize> {
        let index = self.placement(&run)?;
        self.entries.insert(index, run);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    /// Restore board order after loading entries from storage
    pub fn normalize(&mut self) {
        self.entries.retain(|run| run.score > 0);
        self.entries.sort_by(HighScoreEntry::rank_against);
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    pub fn best(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }

    /// Best score so far, 0 on an empty board
    pub fn high_score(&self) -> u64 {
        self.best().map_or(0, |run| run.score)
    }
}

/// Format survived time as `m:ss`
pub fn format_survived(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(score: u64, level: u32, survived_secs: f64) -> HighScoreEntry {
        HighScoreEntry {
            score,
            level,
            survived_secs,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_score_decides_first() {
        let mut board = HighScores::default();
        assert_eq!(board.record(run(100, 9, 600.0)), Some(1));
        assert_eq!(board.record(run(300, 2, 60.0)), Some(1));
        assert_eq!(board.record(run(200, 5, 120.0)), Some(2));
        let order: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![300, 200, 100]);
        assert_eq!(board.high_score(), 300);
    }

    #[test]
    fn test_ties_broken_by_level_then_survival() {
        let mut board = HighScores::default();
        board.record(run(500, 4, 200.0));
        assert_eq!(board.record(run(500, 6, 100.0)), Some(1));
        assert_eq!(board.record(run(500, 4, 250.0)), Some(2));
        let levels: Vec<(u32, f64)> = board.entries.iter().map(|e| (e.level, e.survived_secs)).collect();
        assert_eq!(levels, vec![(6, 100.0), (4, 250.0), (4, 200.0)]);
    }

    #[test]
    fn test_identical_run_goes_below_the_earlier_one() {
        let mut board = HighScores::default();
        let mut first = run(50, 2, 30.0);
        first.timestamp = 1.0;
        board.record(first);
        let mut second = run(50, 2, 30.0);
        second.timestamp = 2.0;
        assert_eq!(board.record(second), Some(2));
        assert_eq!(board.entries[0].timestamp, 1.0);
    }

    #[test]
    fn test_empty_run_never_ranks() {
        let mut board = HighScores::default();
        assert_eq!(board.record(run(0, 7, 400.0)), None);
        assert_eq!(board.high_score(), 0);
        assert!(board.best().is_none());
    }

    #[test]
    fn test_full_board_drops_the_weakest() {
        let mut board = HighScores::default();
        for s in 1..=MAX_HIGH_SCORES as u64 {
            board.record(run(s * 10, 1, 10.0));
        }
        assert_eq!(board.placement(&run(10, 1, 5.0)), None);
        // Same score, deeper run: beats the current last place
        assert_eq!(board.placement(&run(10, 2, 5.0)), Some(9));
        assert_eq!(board.record(run(55, 1, 10.0)), Some(6));
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_normalize_reorders_stored_board() {
        let mut board = HighScores {
            entries: vec![run(10, 1, 5.0), run(0, 1, 1.0), run(90, 3, 50.0)],
        };
        board.normalize();
        let order: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![90, 10]);
    }

    #[test]
    fn test_format_survived() {
        assert_eq!(format_survived(185.7), "3:05");
        assert_eq!(format_survived(-1.0), "0:00");
    }

    proptest! {
        #[test]
        fn board_stays_ranked_and_capped(
            runs in prop::collection::vec((0u64..1000, 1u32..20, 0.0f64..900.0), 0..40)
        ) {
            let mut board = HighScores::default();
            for (score, level, secs) in runs {
                board.record(run(score, level, secs));
            }
            prop_assert!(board.entries.len() <= MAX_HIGH_SCORES);
            for pair in board.entries.windows(2) {
                prop_assert_ne!(pair[0].rank_against(&pair[1]), Ordering::Greater);
            }
        }
    }
}
