use std::io;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    #[error("Failed to bind {address}: {reason}")]
    BindFailed { address: String, reason: String },

    #[error("I/O error ({kind:?}): {message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl From<io::Error> for ServerError {
    fn from(err: io::Error) -> Self {
        ServerError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
