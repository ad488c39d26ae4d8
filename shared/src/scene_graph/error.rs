use thiserror::Error;

use scenesync_serde::SerdeErr;

/// Why a scene failed its integrity check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptReason {
    #[error("computed hash {0:#018x} does not match")]
    HashMismatch(u64),

    #[error("payload unreadable: {0}")]
    Unreadable(SerdeErr),
}

/// Errors that can occur while reading a serialized Scene
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The payload did not validate against its leading hash. The message
    /// carrying it should be dropped; the session can continue.
    #[error("Corrupt scene (stored hash {expected:#018x}): {reason}")]
    CorruptScene {
        expected: u64,
        reason: CorruptReason,
    },

    /// The stream ended before the validation hash could be read
    #[error("Failed to read scene header: {0}")]
    Serde(#[from] SerdeErr),
}

impl SceneError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, SceneError::CorruptScene { .. })
    }
}

/// A per-entity extraction invariant was violated. Only the offending entity
/// is affected: it is emptied and the rest of the scene still exports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyMismatch {
    #[error("{path}: face counts sum to {counts_total} but there are {indices} indices")]
    IndexCountMismatch {
        path: String,
        counts_total: usize,
        indices: usize,
    },

    #[error("{path}: index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        path: String,
        index: i32,
        vertex_count: usize,
    },

    #[error("{path}: {attribute} has {actual} elements, expected {expected}")]
    AttributeLengthMismatch {
        path: String,
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{path}: vertex count changed from {before} to {after}")]
    VertexCountChanged {
        path: String,
        before: usize,
        after: usize,
    },

    #[error("{path}: entity kind changed between samples")]
    KindChanged { path: String },
}
