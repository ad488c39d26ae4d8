use std::io;

use thiserror::Error;

use scenesync_shared::SceneCacheError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A socket or channel failed in the middle of an export
    #[error("Transport failure: {reason}")]
    TransportFailure { reason: String },

    #[error("Failed to connect to {address}: {reason}")]
    ConnectFailed { address: String, reason: String },

    #[error("Failed to write scene cache: {reason}")]
    CacheWrite { reason: String },

    /// The export worker thread could not be started or has exited
    #[error("Export worker is unavailable")]
    WorkerUnavailable,
}

impl From<io::Error> for SyncError {
    fn from(err: io::Error) -> Self {
        SyncError::TransportFailure {
            reason: err.to_string(),
        }
    }
}

impl From<SceneCacheError> for SyncError {
    fn from(err: SceneCacheError) -> Self {
        SyncError::CacheWrite {
            reason: err.to_string(),
        }
    }
}
