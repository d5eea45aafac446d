//! Inode assignment for nodes presented in a filesystem.
//!
//! Identities are derived, not allocated: there is no table, so the same
//! input yields the same inode on every call and in every process. This also
//! means uniqueness is best-effort. A stored inode number from one directory
//! may coincide with the digest prefix of an unrelated entry, and inode
//! numbers recorded on the imported filesystem are only unique within it.
use crate::nodes::NodeDescriptor;
use crate::B3Digest;

/// What an inode is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InodeSource {
    /// An inode number stored alongside the node.
    Numeric(u64),
    /// A content address, for snapshot roots and nodes without a stored
    /// inode number.
    Digest(B3Digest),
}

impl InodeSource {
    /// The stored inode number of the descriptor if there is one, its
    /// identity digest otherwise.
    pub fn of(descriptor: &NodeDescriptor) -> Self {
        match descriptor.inode {
            Some(ino) => InodeSource::Numeric(ino),
            None => InodeSource::Digest(descriptor.identity_digest()),
        }
    }
}

/// Maps an [InodeSource] to the inode reported to clients.
pub fn assign_inode(source: &InodeSource) -> u64 {
    match source {
        InodeSource::Numeric(ino) => *ino,
        InodeSource::Digest(digest) => inode_from_digest(digest),
    }
}

/// Interprets the first 8 bytes of a digest as big-endian integer.
pub fn inode_from_digest(digest: &B3Digest) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest.as_slice()[..8]);
    u64::from_be_bytes(buf)
}

/// Shorthand for `assign_inode(&InodeSource::of(descriptor))`.
pub fn inode_for(descriptor: &NodeDescriptor) -> u64 {
    assign_inode(&InodeSource::of(descriptor))
}
