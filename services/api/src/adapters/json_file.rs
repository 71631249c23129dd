//! services/api/src/adapters/json_file.rs
//!
//! A flat-file implementation of the `ProgressStore` port. The whole profile and
//! history live in one pretty-printed JSON document:
//!
//! ```json
//! { "weight": 110.5, "level": 1, "xp": 0,
//!   "daily_quests": { "cardio": false, ... },
//!   "history": [ { "date": "2024-01-01", "weight": 110.5, "level": 1, "xp": 100,
//!                  "daily_quests": { "cardio": true, ... } } ] }
//! ```

use async_trait::async_trait;
use quest_tracker_core::domain::{DailyQuestFlags, DailyRecord, ProfileState, ProgressSnapshot};
use quest_tracker_core::ports::{PortError, PortResult, ProgressStore};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk layout of the data file.
#[derive(Serialize, Deserialize)]
struct DataFile {
    weight: f64,
    level: u32,
    xp: u32,
    /// Blank quest template; kept so older files still read the same.
    #[serde(default)]
    daily_quests: DailyQuestFlags,
    #[serde(default)]
    history: Vec<DailyRecord>,
}

impl DataFile {
    fn from_domain(snapshot: &ProgressSnapshot) -> Self {
        Self {
            weight: snapshot.profile.weight,
            level: snapshot.profile.level,
            xp: snapshot.profile.xp,
            daily_quests: DailyQuestFlags::default(),
            history: snapshot.history.clone(),
        }
    }

    fn to_domain(self) -> ProgressSnapshot {
        ProgressSnapshot {
            profile: ProfileState {
                weight: self.weight,
                level: self.level.max(1),
                xp: self.xp,
            },
            history: self.history,
        }
    }
}

/// Stores the snapshot in a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileAdapter {
    path: PathBuf,
    initial_weight: f64,
}

impl JsonFileAdapter {
    pub fn new(path: impl Into<PathBuf>, initial_weight: f64) -> Self {
        Self {
            path: path.into(),
            initial_weight,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the data file with a fresh profile if it does not exist yet.
    pub async fn ensure_initialized(&self) -> PortResult<()> {
        if tokio::fs::try_exists(&self.path).await.map_err(io_error)? {
            return Ok(());
        }
        info!("Creating data file at {}", self.path.display());
        self.save(&self.fresh_snapshot()).await
    }

    fn fresh_snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            profile: ProfileState::with_weight(self.initial_weight),
            history: Vec::new(),
        }
    }
}

fn io_error(e: std::io::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

#[async_trait]
impl ProgressStore for JsonFileAdapter {
    async fn load(&self) -> PortResult<ProgressSnapshot> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(self.fresh_snapshot()),
            Err(e) => return Err(io_error(e)),
        };
        let file: DataFile = serde_json::from_str(&raw).map_err(|e| {
            PortError::Unexpected(format!("Corrupt data file {}: {}", self.path.display(), e))
        })?;
        Ok(file.to_domain())
    }

    async fn save(&self, snapshot: &ProgressSnapshot) -> PortResult<()> {
        let json = serde_json::to_string_pretty(&DataFile::from_domain(snapshot))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Write next to the target and rename so a crash never leaves half a file.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json).await.map_err(io_error)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_error)?;
        Ok(())
    }
}
