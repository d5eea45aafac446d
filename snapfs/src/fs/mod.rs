//! Presents snapshots stored in a [Repository] as a browsable, read-only
//! directory hierarchy.
//!
//! This is the part of a filesystem implementation that doesn't depend on a
//! specific protocol: a FUSE (or similar) server dispatches its lookup,
//! readdir, getattr and xattr requests to the handles in here.
//!
//! Everything is loaded lazily. A [Dir] holds the descriptors of its direct
//! children only, and resolving a child directory loads its tree from the
//! [Repository] again, every time. Handles are immutable after construction,
//! and can be shared across threads without locking.
//!
//! [Repository]: crate::repository::Repository
mod dir;
mod file;
mod file_attr;
mod inodes;
mod symlink;
mod xattrs;


use thiserror::Error;

pub use self::dir::{replace_special_nodes, Dir};
pub use self::file::File;
pub use self::file_attr::{DirEntry, DirEntryType, FileAttr};
pub use self::inodes::{assign_inode, inode_for, inode_from_digest, InodeSource};
pub use self::symlink::Symlink;

#[cfg(target_os = "macos")]
const NOXATTR: libc::c_int = libc::ENOATTR;
#[cfg(not(target_os = "macos"))]
const NOXATTR: libc::c_int = libc::ENODATA;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("{0}: not found")]
    NotFound(String),

    #[error("{0}: parent is not a directory")]
    NotADirectory(String),

    #[error("no such attribute: {0}")]
    NoSuchAttribute(String),

    #[error("backing store error: {0}")]
    BackingStore(#[from] crate::Error),
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::NotFound(_) => std::io::Error::from_raw_os_error(libc::ENOENT),
            Error::NotADirectory(_) => std::io::Error::from_raw_os_error(libc::ENOTDIR),
            Error::NoSuchAttribute(_) => std::io::Error::from_raw_os_error(NOXATTR),
            Error::BackingStore(_) => std::io::Error::from_raw_os_error(libc::EIO),
        }
    }
}

/// The result of a lookup: a directory, file or symlink handle.
#[derive(Debug, Clone)]
pub enum Entry {
    Directory(Dir),
    File(File),
    Symlink(Symlink),
}

impl Entry {
    pub fn inode(&self) -> u64 {
        match self {
            Entry::Directory(dir) => dir.inode(),
            Entry::File(file) => file.inode(),
            Entry::Symlink(symlink) => symlink.inode(),
        }
    }

    pub fn attr(&self) -> FileAttr {
        match self {
            Entry::Directory(dir) => dir.attr(),
            Entry::File(file) => file.attr(),
            Entry::Symlink(symlink) => symlink.attr(),
        }
    }

    pub fn listxattr(&self) -> Vec<&str> {
        match self {
            Entry::Directory(dir) => dir.listxattr(),
            Entry::File(file) => file.listxattr(),
            Entry::Symlink(symlink) => symlink.listxattr(),
        }
    }

    pub fn getxattr(&self, name: &str) -> Result<&[u8], Error> {
        match self {
            Entry::Directory(dir) => dir.getxattr(name),
            Entry::File(file) => file.getxattr(name),
            Entry::Symlink(symlink) => symlink.getxattr(name),
        }
    }
}
