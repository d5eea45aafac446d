#![allow(clippy::unnecessary_cast)] // libc::S_IF* are u32 on Linux and u16 on MacOS

use std::time::SystemTime;

use crate::nodes::{NodeDescriptor, NodeType};

/// Attributes of a node, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttr {
    pub ino: u64,
    /// File type and permission bits.
    pub mode: u32,
    pub nlink: u32,
    /// None if the owner is masked, see [FileAttr::uid_or].
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub size: u64,
    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,
}

impl FileAttr {
    /// The owner, or the passed default if it was masked.
    pub fn uid_or(&self, default: u32) -> u32 {
        self.uid.unwrap_or(default)
    }

    /// The group, or the passed default if it was masked.
    pub fn gid_or(&self, default: u32) -> u32 {
        self.gid.unwrap_or(default)
    }
}

/// Builds the [FileAttr] for a descriptor.
/// `type_bits` is one of the `libc::S_IF*` constants, and is or'ed with the
/// permission bits of the descriptor. If `owner_is_root` is set, uid and gid
/// are left unset, so numeric ids of whoever created the snapshot don't leak.
pub(crate) fn gen_file_attr(
    descriptor: &NodeDescriptor,
    ino: u64,
    type_bits: u32,
    nlink: u32,
    owner_is_root: bool,
) -> FileAttr {
    FileAttr {
        ino,
        mode: type_bits | (descriptor.mode & 0o7777),
        nlink,
        uid: (!owner_is_root).then_some(descriptor.uid),
        gid: (!owner_is_root).then_some(descriptor.gid),
        size: descriptor.size,
        atime: descriptor.atime,
        mtime: descriptor.mtime,
        ctime: descriptor.ctime,
    }
}

/// The type of a directory entry, as reported by [super::Dir::readdir].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirEntryType {
    Directory,
    Regular,
    Symlink,
    Unknown,
}

impl DirEntryType {
    /// The `libc::S_IF*` constant for this type, 0 for [DirEntryType::Unknown].
    pub fn type_bits(&self) -> u32 {
        match self {
            DirEntryType::Directory => libc::S_IFDIR as u32,
            DirEntryType::Regular => libc::S_IFREG as u32,
            DirEntryType::Symlink => libc::S_IFLNK as u32,
            DirEntryType::Unknown => 0,
        }
    }
}

impl From<NodeType> for DirEntryType {
    fn from(value: NodeType) -> Self {
        match value {
            NodeType::Dir => DirEntryType::Directory,
            NodeType::File => DirEntryType::Regular,
            NodeType::Symlink => DirEntryType::Symlink,
            NodeType::Unrecognized => DirEntryType::Unknown,
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub ino: u64,
    pub kind: DirEntryType,
    pub name: String,
}
