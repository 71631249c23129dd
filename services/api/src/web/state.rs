//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use quest_tracker_core::ports::ProgressStore;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProgressStore>,
    pub config: Arc<Config>,
    /// Held across load, compute and save so only one mutation is in flight.
    write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProgressStore>, config: Arc<Config>) -> Self {
        Self {
            store,
            config,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Waits for exclusive write access to the store.
    pub async fn begin_write(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}
