use std::io;

use thiserror::Error;

use crate::{
    compression::error::{DecoderError, EncoderError},
    scene_graph::error::SceneError,
};

/// Errors that can occur while writing or reading a scene cache file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneCacheError {
    #[error("I/O error ({kind:?}): {message}")]
    Io { kind: io::ErrorKind, message: String },

    /// The file does not start with the scene cache magic
    #[error("Not a scene cache file (magic {found:?})")]
    BadMagic { found: [u8; 4] },

    #[error("Unsupported scene cache version {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Unknown record encoding {tag}")]
    UnknownEncoding { tag: u8 },

    /// A record header whose sizes cannot describe a record of this file
    #[error("Corrupt record header at byte {offset}")]
    CorruptRecord { offset: u64 },

    #[error("Record index {index} out of range (file holds {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Scene cache holds no records")]
    Empty,

    #[error("Encoder error: {0}")]
    Encoder(#[from] EncoderError),

    #[error("Decoder error: {0}")]
    Decoder(#[from] DecoderError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

impl From<io::Error> for SceneCacheError {
    fn from(err: io::Error) -> Self {
        SceneCacheError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
