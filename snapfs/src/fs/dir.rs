#![allow(clippy::unnecessary_cast)] // libc::S_IF* are u32 on Linux and u16 on MacOS

use std::collections::BTreeMap;
use std::sync::Arc;

use nix::unistd::{getegid, geteuid};
use tracing::{debug, instrument, warn};

use super::file_attr::{gen_file_attr, DirEntry, FileAttr};
use super::inodes::{inode_for, inode_from_digest};
use super::{xattrs, Entry, Error, File, Symlink};
use crate::nodes::{NodeDescriptor, NodeType};
use crate::repository::Repository;
use crate::snapshot::SnapshotWithId;

/// A directory in a snapshot, with all its children loaded.
///
/// Children are loaded from the [Repository] when the Dir is constructed, and
/// the Dir never changes afterwards. Subdirectories are only referenced by
/// their tree digest: every [Dir::lookup] builds a new Dir from the
/// repository, there's no cache.
#[derive(Clone)]
pub struct Dir {
    repository: Arc<dyn Repository>,

    /// The descriptor of this directory itself. Synthesized for snapshot roots.
    descriptor: NodeDescriptor,

    /// Maps child names to their descriptors.
    children: BTreeMap<String, NodeDescriptor>,

    inode: u64,

    /// Whether to omit uid and gid from reported attributes.
    owner_is_root: bool,
}

impl std::fmt::Debug for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dir")
            .field("name", &self.descriptor.name)
            .field("inode", &self.inode)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

/// Returns the contents of nodes named "." or "/" pointing to a tree, or the
/// node itself otherwise.
///
/// Snapshots may wrap their actual root in such a node, which clients should
/// never see. Only a single level is replaced.
pub async fn replace_special_nodes(
    repository: &dyn Repository,
    node: NodeDescriptor,
) -> Result<Vec<NodeDescriptor>, Error> {
    match node.subtree {
        Some(ref subtree)
            if node.node_type == NodeType::Dir && (node.name == "." || node.name == "/") =>
        {
            Ok(repository.load_tree(subtree).await?.nodes)
        }
        _ => Ok(vec![node]),
    }
}

impl Dir {
    /// Loads the directory described by `descriptor`.
    /// Duplicate names in the tree are not rejected, the last one wins.
    #[instrument(skip_all, fields(dir.name = %descriptor.name, dir.subtree = ?descriptor.subtree), err)]
    pub async fn new(
        repository: Arc<dyn Repository>,
        descriptor: NodeDescriptor,
        owner_is_root: bool,
    ) -> Result<Self, Error> {
        debug!("new dir");

        let subtree = descriptor.subtree.as_ref().ok_or_else(|| {
            warn!("directory has no subtree");
            Error::NotFound(descriptor.name.clone())
        })?;

        let tree = repository.load_tree(subtree).await?;
        let children = tree
            .nodes
            .into_iter()
            .map(|node| (node.name.clone(), node))
            .collect();

        Ok(Self {
            inode: inode_for(&descriptor),
            repository,
            descriptor,
            children,
            owner_is_root,
        })
    }

    /// Loads the root directory of a snapshot.
    /// "." and "/" nodes in the root tree are replaced by their contents.
    /// As snapshots carry no metadata of their own, it's owned by the current
    /// (effective) user and group, read-only, and all its timestamps are the
    /// snapshot time.
    #[instrument(skip_all, fields(snapshot.id = %snapshot.id, snapshot.tree = %snapshot.tree), err)]
    pub async fn from_snapshot(
        repository: Arc<dyn Repository>,
        snapshot: &SnapshotWithId,
        owner_is_root: bool,
    ) -> Result<Self, Error> {
        debug!("new dir for snapshot");

        let tree = repository.load_tree(&snapshot.tree).await?;

        let mut children = BTreeMap::new();
        for node in tree.nodes {
            for node in replace_special_nodes(repository.as_ref(), node).await? {
                children.insert(node.name.clone(), node);
            }
        }

        let descriptor = NodeDescriptor {
            mode: 0o555,
            uid: geteuid().as_raw(),
            gid: getegid().as_raw(),
            atime: snapshot.time,
            mtime: snapshot.time,
            ctime: snapshot.time,
            subtree: Some(snapshot.tree.clone()),
            ..NodeDescriptor::new("", NodeType::Dir)
        };

        Ok(Self {
            repository,
            descriptor,
            children,
            inode: inode_from_digest(&snapshot.id),
            owner_is_root,
        })
    }

    pub fn inode(&self) -> u64 {
        self.inode
    }

    /// The name this directory was looked up by, empty for snapshot roots.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// A directory has 2 hardlinks, plus one for each directory it contains.
    fn nlink(&self) -> u32 {
        let subdirs = self
            .children
            .values()
            .filter(|node| node.node_type == NodeType::Dir)
            .count();

        2 + subdirs as u32
    }

    pub fn attr(&self) -> FileAttr {
        gen_file_attr(
            &self.descriptor,
            self.inode,
            libc::S_IFDIR as u32,
            self.nlink(),
            self.owner_is_root,
        )
    }

    /// Lists all children, ordered by name.
    pub fn readdir(&self) -> Vec<DirEntry> {
        self.children
            .values()
            .map(|node| DirEntry {
                ino: inode_for(node),
                kind: node.node_type.into(),
                name: node.name.clone(),
            })
            .collect()
    }

    /// Resolves a child by its name.
    /// Subdirectories are loaded from the repository.
    #[instrument(skip(self), fields(dir.inode = self.inode))]
    pub async fn lookup(&self, name: &str) -> Result<Entry, Error> {
        let node = match self.children.get(name) {
            Some(node) => node,
            None => {
                debug!("not found");
                return Err(Error::NotFound(name.to_string()));
            }
        };

        match node.node_type {
            NodeType::Dir => Ok(Entry::Directory(
                Dir::new(self.repository.clone(), node.clone(), self.owner_is_root).await?,
            )),
            NodeType::File => Ok(Entry::File(File::new(node.clone(), self.owner_is_root))),
            NodeType::Symlink => Ok(Entry::Symlink(Symlink::new(
                node.clone(),
                self.owner_is_root,
            ))),
            NodeType::Unrecognized => {
                warn!("node has unknown type");
                Err(Error::NotFound(name.to_string()))
            }
        }
    }

    /// Resolves a slash-separated path relative to this directory, one
    /// [Dir::lookup] per component. Empty components are skipped, so an
    /// empty path resolves to this directory.
    #[instrument(skip(self), fields(dir.inode = self.inode))]
    pub async fn walk(&self, path: &str) -> Result<Entry, Error> {
        let mut entry = Entry::Directory(self.clone());

        for component in path.split('/').filter(|c| !c.is_empty()) {
            entry = match entry {
                Entry::Directory(dir) => dir.lookup(component).await?,
                Entry::File(_) | Entry::Symlink(_) => {
                    return Err(Error::NotADirectory(component.to_string()))
                }
            };
        }

        Ok(entry)
    }

    /// Lists the names of the extended attributes of this directory.
    pub fn listxattr(&self) -> Vec<&str> {
        xattrs::list(&self.descriptor)
    }

    pub fn getxattr(&self, name: &str) -> Result<&[u8], Error> {
        xattrs::get(&self.descriptor, name)
    }
}
