//! services/api/src/adapters/memory.rs
//!
//! An in-process `ProgressStore`. Nothing survives a restart.

use async_trait::async_trait;
use quest_tracker_core::domain::ProgressSnapshot;
use quest_tracker_core::ports::{PortResult, ProgressStore};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryAdapter {
    snapshot: RwLock<ProgressSnapshot>,
}

impl MemoryAdapter {
    pub fn new(snapshot: ProgressSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }
}

#[async_trait]
impl ProgressStore for MemoryAdapter {
    async fn load(&self) -> PortResult<ProgressSnapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &ProgressSnapshot) -> PortResult<()> {
        *self.snapshot.write().await = snapshot.clone();
        Ok(())
    }
}
