//! This holds types describing nodes in the snapshot model.
mod tree;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::B3Digest;
pub use tree::Tree;

/// The type of a [NodeDescriptor].
///
/// Repositories only ever write the three known types. Anything else read
/// back ends up as [NodeType::Unrecognized], which listing reports as an
/// unknown entry and lookup treats as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum NodeType {
    Dir,
    File,
    Symlink,
    Unrecognized,
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "dir" => NodeType::Dir,
            "file" => NodeType::File,
            "symlink" => NodeType::Symlink,
            _ => NodeType::Unrecognized,
        }
    }
}

/// A single extended attribute, as recorded at import time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedAttribute {
    pub name: String,
    pub value: bytes::Bytes,
}

/// Metadata of one entry inside a [Tree].
///
/// A descriptor with [NodeType::Dir] refers to its contents by `subtree`,
/// the digest of another [Tree]. Directories are never nested by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Permission bits (`0o7777`). Type bits are derived from `node_type`.
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,

    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,

    /// The file content size, or the target length for symlinks.
    #[serde(default)]
    pub size: u64,

    /// The blake3 digest of the file contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<B3Digest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,

    /// The digest of the [Tree] holding the children of a directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtree: Option<B3Digest>,

    /// The inode number the entry had on the filesystem it was imported from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inode: Option<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extended_attributes: Vec<ExtendedAttribute>,
}

impl NodeDescriptor {
    /// Creates a descriptor with the given name and type, owned by root,
    /// without permission bits and with all timestamps at the unix epoch.
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            mode: 0,
            uid: 0,
            gid: 0,
            atime: UNIX_EPOCH,
            mtime: UNIX_EPOCH,
            ctime: UNIX_EPOCH,
            size: 0,
            content: None,
            link_target: None,
            subtree: None,
            inode: None,
            extended_attributes: vec![],
        }
    }

    pub fn dir(name: impl Into<String>, subtree: B3Digest) -> Self {
        Self {
            mode: 0o755,
            subtree: Some(subtree),
            ..Self::new(name, NodeType::Dir)
        }
    }

    pub fn file(name: impl Into<String>, content: B3Digest, size: u64) -> Self {
        Self {
            mode: 0o644,
            size,
            content: Some(content),
            ..Self::new(name, NodeType::File)
        }
    }

    pub fn symlink(name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            mode: 0o777,
            size: target.len() as u64,
            link_target: Some(target),
            ..Self::new(name, NodeType::Symlink)
        }
    }

    /// Returns the value of the extended attribute with exactly that name.
    pub fn get_extended_attribute(&self, name: &str) -> Option<&[u8]> {
        self.extended_attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_ref())
    }

    /// A digest identifying this entry by its type, name and content
    /// references. Used for inode assignment of entries that carry no
    /// inode number of their own.
    pub fn identity_digest(&self) -> B3Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(match self.node_type {
            NodeType::Dir => b"dir\0",
            NodeType::File => b"file",
            NodeType::Symlink => b"link",
            NodeType::Unrecognized => b"unkn",
        });
        hasher.update(self.name.as_bytes());
        hasher.update(b"\0");
        for digest in [&self.subtree, &self.content].into_iter().flatten() {
            hasher.update(digest.as_slice());
        }
        if let Some(target) = &self.link_target {
            hasher.update(target.as_bytes());
        }
        hasher.finalize().into()
    }
}
