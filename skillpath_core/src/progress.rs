//! User progress loading with file locking.
//!
//! Progress is read-only to the skill evaluator. It is read from a JSON
//! object of exercise id to record, and written only when seeding a data
//! directory.

use crate::products::{read_locked, write_atomic};
use crate::{Error, Result, UserProgress};
use std::path::Path;

impl UserProgress {
    /// Load progress under a shared lock
    ///
    /// A missing file is empty progress. An unreadable or unparseable file
    /// logs a warning and is also treated as empty progress.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No progress file found at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let parsed = read_locked(path).and_then(|contents| {
            serde_json::from_str::<UserProgress>(&contents).map_err(Error::from)
        });

        match parsed {
            Ok(progress) => {
                tracing::debug!(
                    "Loaded {} progress records from {:?}",
                    progress.records.len(),
                    path
                );
                Ok(progress)
            }
            Err(e) => {
                tracing::warn!("Ignoring progress file {:?}: {}", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save progress atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        write_atomic(path, contents.as_bytes())?;
        tracing::debug!("Saved progress to {:?}", path);
        Ok(())
    }
}
