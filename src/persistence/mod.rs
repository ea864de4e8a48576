//! High score persistence
//!
//! Backends:
//! - `MemoryStore`: in-process, for tests and headless runs
//! - `JsonFileStore`: JSON file with tmp-then-rename writes (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Failures are reported, never fatal: callers log them and carry on.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod web;

use thiserror::Error;

use crate::highscores::HighScores;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable: {0}")]
    Unavailable(&'static str),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt high score data: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait HighScoreStore {
    /// Read the leaderboard; a missing record is an empty board
    fn load(&mut self) -> Result<HighScores, PersistenceError>;
    fn save(&mut self, scores: &HighScores) -> Result<(), PersistenceError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub scores: HighScores,
    /// Number of successful saves
    pub saves: u32,
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<HighScores, PersistenceError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), PersistenceError> {
        self.scores = scores.clone();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScoreEntry;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert!(store.load().unwrap().entries.is_empty());

        let mut scores = HighScores::default();
        scores.record(HighScoreEntry {
            score: 1500,
            level: 7,
            survived_secs: 240.0,
            timestamp: 1.0,
        });
        store.save(&scores).unwrap();
        assert_eq!(store.load().unwrap().high_score(), 1500);
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn test_error_messages() {
        let err = PersistenceError::Unavailable("no window");
        assert_eq!(err.to_string(), "storage unavailable: no window");
    }
}
