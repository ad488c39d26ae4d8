use thiserror::Error;

use super::compression_config::SceneCacheEncoding;

/// Errors that can occur while compressing scene records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    /// Failed to create compressor with the specified configuration
    #[error("Failed to create compressor with compression level {level}")]
    CompressorCreationFailed { level: i32 },

    /// Compression operation failed
    #[error("Failed to compress payload of {payload_size} bytes")]
    CompressionFailed { payload_size: usize },
}

/// Errors that can occur while decompressing scene records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoderError {
    /// Failed to create decompressor
    #[error("Failed to create decompressor")]
    DecompressorCreationFailed,

    /// The encoding is not compiled into this build
    #[error("Encoding {encoding:?} is not supported by this build")]
    UnsupportedEncoding { encoding: SceneCacheEncoding },

    /// Decompression operation failed (SECURITY: potentially malformed file)
    #[error("Failed to decompress payload of {payload_size} bytes (possible malformed data)")]
    DecompressionFailed { payload_size: usize },

    /// The decoded payload did not have the size recorded alongside it
    #[error("Decoded {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}
