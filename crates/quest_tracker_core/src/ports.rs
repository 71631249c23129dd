//! crates/quest_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core is driven through.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! engine independent of where the profile and its history are stored.

use crate::domain::ProgressSnapshot;
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, file system).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Loads and saves the whole profile and its history.
///
/// Implementations serialize their own writes; the core assumes a single
/// in-flight mutation at a time.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Returns the current snapshot. A store that has never been written to
    /// returns a default profile with an empty history.
    async fn load(&self) -> PortResult<ProgressSnapshot>;

    async fn save(&self, snapshot: &ProgressSnapshot) -> PortResult<()>;
}
