//! Imports a path of the local filesystem into a [Repository], producing a
//! new snapshot.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::nodes::{NodeDescriptor, NodeType, Tree};
use crate::repository::Repository;
use crate::snapshot::{Snapshot, SnapshotWithId};

mod error;
mod fs;

pub use error::Error;

/// Ingests the contents at the given path into the repository, and stores a
/// snapshot pointing to it.
///
/// Trees are uploaded bottom-up, so a tree is only stored once all trees it
/// refers to are. If `path` is a directory, the snapshot's root tree wraps it
/// in a single node named ".", which gets replaced by its contents when the
/// snapshot is presented. Symlinks are not followed, and file types other
/// than regular files, directories and symlinks are skipped.
#[instrument(skip(repository, path, tags), fields(path = %path.as_ref().display()), err)]
pub async fn ingest_path<P>(
    repository: &dyn Repository,
    path: P,
    tags: Vec<String>,
) -> Result<SnapshotWithId, Error>
where
    P: AsRef<Path>,
{
    let root = path.as_ref();

    // Children of directories not yet uploaded, keyed by the directory path.
    let mut pending: HashMap<PathBuf, Vec<NodeDescriptor>> = HashMap::new();
    let mut root_node = None;

    for entry in WalkDir::new(root).follow_links(false).contents_first(true) {
        let entry = entry.map_err(|e| Error::Walk(root.to_path_buf(), e))?;
        let entry_path = entry.path();

        let metadata = std::fs::symlink_metadata(entry_path)
            .map_err(|e| Error::UnableToStat(entry_path.to_path_buf(), e))?;

        let Some(mut node) = fs::descriptor_at_path(entry_path, entry.file_name(), &metadata)?
        else {
            continue;
        };

        if node.node_type == NodeType::Dir {
            let mut children = pending.remove(entry_path).unwrap_or_default();
            children.sort_by(|a, b| a.name.cmp(&b.name));

            let digest = repository
                .put_tree(Tree::new(children))
                .await
                .map_err(|e| Error::UploadTree(entry_path.to_path_buf(), e))?;
            debug!(path = ?entry_path, tree.digest = %digest, "uploaded tree");

            node.subtree = Some(digest);
        }

        if entry.depth() == 0 {
            root_node = Some(node);
        } else if let Some(parent) = entry_path.parent() {
            pending.entry(parent.to_path_buf()).or_default().push(node);
        }
    }

    // The walk yields the root last, unless it was skipped.
    let Some(mut root_node) = root_node else {
        return Err(Error::UnsupportedRoot(root.to_path_buf()));
    };

    if root_node.node_type == NodeType::Dir {
        root_node.name = ".".to_string();
    }

    let tree = repository
        .put_tree(Tree::new(vec![root_node]))
        .await
        .map_err(|e| Error::UploadTree(root.to_path_buf(), e))?;

    let snapshot = Snapshot {
        hostname: hostname(),
        paths: vec![root.display().to_string()],
        tags,
        ..Snapshot::new(SystemTime::now(), tree)
    };

    repository
        .put_snapshot(snapshot)
        .await
        .map_err(Error::StoreSnapshot)
}

fn hostname() -> String {
    match nix::unistd::gethostname() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            warn!(err = %e, "unable to determine hostname");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::StreamExt;
    use tempfile::TempDir;

    use super::{ingest_path, Error};
    use crate::fixtures::{HELLOWORLD_BLOB_CONTENTS, HELLOWORLD_BLOB_DIGEST};
    use crate::fs::{Dir, Entry};
    use crate::nodes::NodeType;
    use crate::repository::{MemoryRepository, Repository};

    fn populate(dir: &TempDir) {
        std::fs::write(dir.path().join("a.txt"), HELLOWORLD_BLOB_CONTENTS).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("b"), b"").unwrap();
        std::os::unix::fs::symlink("a.txt", dir.path().join("link")).unwrap();
    }

    #[tokio::test]
    async fn import_directory() {
        let tmpdir = TempDir::new().unwrap();
        populate(&tmpdir);

        let repository: Arc<dyn Repository> = Arc::new(MemoryRepository::default());
        let snapshot = ingest_path(repository.as_ref(), tmpdir.path(), vec!["t".into()])
            .await
            .expect("must succeed");

        assert_eq!(vec!["t".to_string()], snapshot.tags);
        assert_eq!(vec![tmpdir.path().display().to_string()], snapshot.paths);

        // the root is wrapped in a "." node
        let root_tree = repository.load_tree(&snapshot.tree).await.unwrap();
        assert_eq!(1, root_tree.nodes.len());
        assert_eq!(".", root_tree.nodes[0].name);
        assert_eq!(NodeType::Dir, root_tree.nodes[0].node_type);

        let root = Dir::from_snapshot(repository.clone(), &snapshot, false)
            .await
            .unwrap();
        let names: Vec<_> = root.readdir().into_iter().map(|e| e.name).collect();
        assert_eq!(vec!["a.txt", "link", "sub"], names);

        match root.lookup("a.txt").await.unwrap() {
            Entry::File(file) => {
                assert_eq!(Some(&*HELLOWORLD_BLOB_DIGEST), file.content());
                assert_eq!(HELLOWORLD_BLOB_CONTENTS.len() as u64, file.attr().size);
            }
            e => panic!("expected file, got {:?}", e),
        }

        match root.lookup("link").await.unwrap() {
            Entry::Symlink(symlink) => assert_eq!("a.txt", symlink.readlink().unwrap()),
            e => panic!("expected symlink, got {:?}", e),
        }

        match root.walk("sub/b").await.unwrap() {
            Entry::File(file) => assert_eq!(0, file.attr().size),
            e => panic!("expected file, got {:?}", e),
        }

        let listed: Vec<_> = repository.list_snapshots().collect().await;
        assert_eq!(1, listed.len());
        assert_eq!(&snapshot, listed[0].as_ref().unwrap());
    }

    #[tokio::test]
    async fn import_single_file() {
        let tmpdir = TempDir::new().unwrap();
        let path = tmpdir.path().join("hello");
        std::fs::write(&path, HELLOWORLD_BLOB_CONTENTS).unwrap();

        let repository = MemoryRepository::default();
        let snapshot = ingest_path(&repository, &path, vec![]).await.unwrap();

        let root_tree = repository.load_tree(&snapshot.tree).await.unwrap();
        assert_eq!(1, root_tree.nodes.len());
        assert_eq!("hello", root_tree.nodes[0].name);
        assert_eq!(Some(HELLOWORLD_BLOB_DIGEST.clone()), root_tree.nodes[0].content);
    }

    #[tokio::test]
    async fn import_keeps_metadata() {
        use std::os::unix::fs::{MetadataExt, PermissionsExt};

        let tmpdir = TempDir::new().unwrap();
        let path = tmpdir.path().join("script");
        std::fs::write(&path, b"#!/bin/sh").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o750)).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();

        let repository = MemoryRepository::default();
        let snapshot = ingest_path(&repository, &path, vec![]).await.unwrap();
        let node = &repository.load_tree(&snapshot.tree).await.unwrap().nodes[0];

        assert_eq!(0o750, node.mode);
        assert_eq!(metadata.uid(), node.uid);
        assert_eq!(metadata.gid(), node.gid);
        assert_eq!(Some(metadata.ino()), node.inode);
        assert_eq!(metadata.modified().unwrap(), node.mtime);
    }

    #[tokio::test]
    async fn import_xattrs() {
        let tmpdir = TempDir::new().unwrap();
        let path = tmpdir.path().join("f");
        std::fs::write(&path, b"").unwrap();

        // tmpfs or the sandbox might not support user xattrs.
        if xattr::set(&path, "user.comment", b"hi").is_err() {
            return;
        }

        let repository = MemoryRepository::default();
        let snapshot = ingest_path(&repository, &path, vec![]).await.unwrap();
        let node = &repository.load_tree(&snapshot.tree).await.unwrap().nodes[0];

        assert_eq!(Some(&b"hi"[..]), node.get_extended_attribute("user.comment"));
    }

    #[tokio::test]
    async fn import_nonexistent() {
        let tmpdir = TempDir::new().unwrap();

        let repository = MemoryRepository::default();
        let err = ingest_path(&repository, tmpdir.path().join("missing"), vec![])
            .await
            .expect_err("must fail");
        assert!(matches!(err, Error::Walk(..)));
    }
}
