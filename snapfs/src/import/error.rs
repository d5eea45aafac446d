use std::path::PathBuf;

/// Represents all error types emitted by [super::ingest_path].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to walk {0}: {1}")]
    Walk(PathBuf, walkdir::Error),

    #[error("unable to stat {0}: {1}")]
    UnableToStat(PathBuf, std::io::Error),

    #[error("unable to read {0}: {1}")]
    UnableToRead(PathBuf, std::io::Error),

    #[error("unable to read extended attributes of {0}: {1}")]
    UnableToReadXattrs(PathBuf, std::io::Error),

    #[error("invalid encoding encountered for entry {0:?}")]
    InvalidEncoding(PathBuf),

    #[error("{0} is neither a regular file, directory nor symlink")]
    UnsupportedRoot(PathBuf),

    #[error("failed to upload tree for {0}: {1}")]
    UploadTree(PathBuf, crate::Error),

    #[error("failed to store snapshot: {0}")]
    StoreSnapshot(crate::Error),
}
