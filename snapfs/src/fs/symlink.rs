#![allow(clippy::unnecessary_cast)] // libc::S_IF* are u32 on Linux and u16 on MacOS

use super::file_attr::{gen_file_attr, FileAttr};
use super::inodes::inode_for;
use super::{xattrs, Error};
use crate::nodes::NodeDescriptor;

/// A symbolic link in a snapshot.
#[derive(Debug, Clone)]
pub struct Symlink {
    descriptor: NodeDescriptor,
    inode: u64,
    owner_is_root: bool,
}

impl Symlink {
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

    /// Returns the link target.
    pub fn readlink(&self) -> Result<&str, Error> {
        self.descriptor
            .link_target
            .as_deref()
            .ok_or_else(|| Error::NotFound(self.descriptor.name.clone()))
    }

    /// Symlinks always report 0777, their size is the length of the target.
    pub fn attr(&self) -> FileAttr {
        let mut attr = gen_file_attr(
            &self.descriptor,
            self.inode,
            libc::S_IFLNK as u32,
            1,
            self.owner_is_root,
        );
        attr.mode = libc::S_IFLNK as u32 | 0o777;
        if let Some(target) = &self.descriptor.link_target {
            attr.size = target.len() as u64;
        }
        attr
    }

    pub fn listxattr(&self) -> Vec<&str> {
        xattrs::list(&self.descriptor)
    }

    pub fn getxattr(&self, name: &str) -> Result<&[u8], Error> {
        xattrs::get(&self.descriptor, name)
    }
}
