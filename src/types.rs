//! Crate-wide error type and result alias

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RollbookError>;

/// Error types for rollbook operations
///
/// No variant is fatal: authorization errors are no-ops surfaced to the
/// caller, remote errors degrade to local-only persistence, and cache
/// errors leave the in-memory state authoritative for the session.
#[derive(Debug, Error)]
pub enum RollbookError {
    /// Mutation attempted without admin rights
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// No person with the given id in the roster
    #[error("No person with id {0}")]
    NotFound(u32),

    /// Remote store unreachable or returned an error
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Local cache read/write failure
    #[error("Local cache error: {0}")]
    Cache(String),

    /// Malformed row from the remote store
    #[error("Row decode error: {0}")]
    Decode(String),
}
