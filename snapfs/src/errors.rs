use thiserror::Error;

use crate::B3Digest;

/// Errors related to communication with the repository.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("tree {0} not found")]
    TreeNotFound(B3Digest),

    #[error("snapshot {0} not found")]
    SnapshotNotFound(B3Digest),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal storage error: {0}")]
    StorageError(String),
}

impl From<sled::Error> for Error {
    fn from(value: sled::Error) -> Self {
        Error::StorageError(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::StorageError(format!("unable to decode: {}", value))
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        if value.kind() == std::io::ErrorKind::InvalidInput {
            Error::InvalidRequest(value.to_string())
        } else {
            Error::StorageError(value.to_string())
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::TreeNotFound(_) | Error::SnapshotNotFound(_) => {
                Self::new(std::io::ErrorKind::NotFound, value.to_string())
            }
            Error::InvalidRequest(msg) => Self::new(std::io::ErrorKind::InvalidInput, msg),
            Error::StorageError(msg) => Self::new(std::io::ErrorKind::Other, msg),
        }
    }
}
