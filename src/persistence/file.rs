//! JSON file backend (native only)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{HighScoreStore, PersistenceError};
use crate::highscores::HighScores;

/// Leaderboard stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<HighScores, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => {
                let scores: HighScores = serde_json::from_str(&json)?;
                log::info!("Loaded {} high scores from {}", scores.entries.len(), self.path.display());
                Ok(scores)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HighScores::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        // tmp -> save, so a crash mid-write keeps the old board
        let tmp = self.tmp_path();
        fs::write(&tmp, serde_json::to_string_pretty(scores)?)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}
