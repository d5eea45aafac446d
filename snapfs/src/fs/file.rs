#![allow(clippy::unnecessary_cast)] // libc::S_IF* are u32 on Linux and u16 on MacOS

use super::file_attr::{gen_file_attr, FileAttr};
use super::inodes::inode_for;
use super::{xattrs, Error};
use crate::nodes::NodeDescriptor;
use crate::B3Digest;

/// A regular file in a snapshot.
/// This only exposes metadata, reading contents is up to the caller, using
/// [File::content].
#[derive(Debug, Clone)]
pub struct File {
    descriptor: NodeDescriptor,
    inode: u64,
    owner_is_root: bool,
}

impl File {
    pub fn new(descriptor: NodeDescriptor, owner_is_root: bool) -> Self {
        Self {
            inode: inode_for(&descriptor),
            descriptor,
            owner_is_root,
        }
    }

    pub fn inode(&self) -> u64 {
        self.inode
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// The digest of the file contents.
    pub fn content(&self) -> Option<&B3Digest> {
        self.descriptor.content.as_ref()
    }

    pub fn attr(&self) -> FileAttr {
        gen_file_attr(
            &self.descriptor,
            self.inode,
            libc::S_IFREG as u32,
            1,
            self.owner_is_root,
        )
    }

    pub fn listxattr(&self) -> Vec<&str> {
        xattrs::list(&self.descriptor)
    }

    pub fn getxattr(&self, name: &str) -> Result<&[u8], Error> {
        xattrs::get(&self.descriptor, name)
    }
}
