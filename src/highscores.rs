//! Best-score persistence
//!
//! A single integer kept in a small JSON file. Without a path the store
//! lives in memory only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighscoreFile {
    best: u32,
}

#[derive(Debug, Clone, Default)]
pub struct HighscoreStore {
    path: Option<PathBuf>,
    best: u32,
}

impl HighscoreStore {
    /// Store that forgets everything on exit
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`; a missing file means no score yet
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let best = match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str::<HighscoreFile>(&json)?.best,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(Error::io(path, e)),
        };
        log::info!("Highscore {} ({})", best, path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            best,
        })
    }

    pub fn get(&self) -> u32 {
        self.best
    }

    /// Keep the larger of the stored and given score. Returns the best score
    /// after the update.
    pub fn save_if_higher(&mut self, score: u32) -> Result<u32> {
        if score <= self.best {
            return Ok(self.best);
        }
        self.best = score;

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            let json = serde_json::to_string(&HighscoreFile { best: score })?;
            std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
            log::info!("New highscore {} saved", score);
        }
        Ok(self.best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("starfall-test-{}", std::process::id()));
        dir.join(name)
    }

    #[test]
    fn test_in_memory_keeps_max() {
        let mut store = HighscoreStore::in_memory();
        assert_eq!(store.get(), 0);
        assert_eq!(store.save_if_higher(10).unwrap(), 10);
        assert_eq!(store.save_if_higher(4).unwrap(), 10);
        assert_eq!(store.get(), 10);
    }

    #[test]
    fn test_file_round_trip() {
        let path = temp_path("roundtrip.json");
        let _ = std::fs::remove_file(&path);

        let mut store = HighscoreStore::load(&path).unwrap();
        assert_eq!(store.get(), 0);
        store.save_if_higher(57).unwrap();

        let reopened = HighscoreStore::load(&path).unwrap();
        assert_eq!(reopened.get(), 57);

        // A lower score never touches the file
        let mut store = reopened;
        assert_eq!(store.save_if_higher(3).unwrap(), 57);
        assert_eq!(HighscoreStore::load(&path).unwrap().get(), 57);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(HighscoreStore::load(&path), Err(Error::Json(_))));
        let _ = std::fs::remove_file(&path);
    }
}
