use std::io;

use thiserror::Error;

use scenesync_serde::SerdeErr;

use crate::scene_graph::error::SceneError;

/// Errors that can occur while decoding a wire message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Unknown message kind received (SECURITY: potentially malformed or malicious frame)
    #[error("Unknown message kind {tag}")]
    UnknownMessageKind { tag: u8 },

    #[error("Protocol version mismatch: expected {expected}, received {actual}")]
    ProtocolVersionMismatch { expected: u32, actual: u32 },

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Serde error: {0}")]
    Serde(#[from] SerdeErr),
}

impl MessageError {
    /// True when a Set message carried a scene that failed validation
    pub fn is_corrupt_scene(&self) -> bool {
        matches!(self, MessageError::Scene(err) if err.is_corrupt())
    }
}

/// Errors that can occur while reading length-prefixed frames
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("Frame of {size} bytes exceeds the {max} byte limit")]
    FrameTooLarge { size: u64, max: u64 },

    #[error("Stream closed in the middle of a frame")]
    Truncated,

    #[error("I/O error ({kind:?}): {message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl From<io::Error> for FrameError {
    fn from(err: io::Error) -> Self {
        FrameError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
