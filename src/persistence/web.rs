//! Browser LocalStorage backend (wasm32 only)

use super::{HighScoreStore, PersistenceError};
use crate::highscores::HighScores;

/// LocalStorage key for the leaderboard
const STORAGE_KEY: &str = "dracula_survivors_highscores";

#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .ok_or(PersistenceError::Unavailable("no window"))?
            .local_storage()
            .ok()
            .flatten()
            .ok_or(PersistenceError::Unavailable("LocalStorage disabled"))
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> Result<HighScores, PersistenceError> {
        let storage = Self::storage()?;
        match storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => {
                let scores: HighScores = serde_json::from_str(&json)?;
                log::info!("Loaded {} high scores", scores.entries.len());
                Ok(scores)
            }
            Ok(None) => Ok(HighScores::default()),
            Err(_) => Err(PersistenceError::Unavailable("LocalStorage read failed")),
        }
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), PersistenceError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(scores)?;
        storage
            .set_item(STORAGE_KEY, &json)
            .map_err(|_| PersistenceError::Unavailable("LocalStorage write failed"))?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}
