use crate::nodes::Tree;
use crate::snapshot::{Snapshot, SnapshotWithId};
use crate::{B3Digest, Error};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::path::Path;
use tracing::{instrument, warn};

use super::{verify_digest, Repository};

const TREES: &str = "trees";
const SNAPSHOTS: &str = "snapshots";

/// Stores trees and snapshots in two sled trees, keyed by their digest and
/// holding their serialized form.
#[derive(Clone)]
pub struct SledRepository {
    trees: sled::Tree,
    snapshots: sled::Tree,
}

impl SledRepository {
    pub fn new<P: AsRef<Path>>(p: P) -> Result<Self, sled::Error> {
        let config = sled::Config::default()
            .use_compression(false) // is a required parameter
            .path(p);

        Self::from_db(config.open()?)
    }

    pub fn new_temporary() -> Result<Self, sled::Error> {
        let config = sled::Config::default().temporary(true);

        Self::from_db(config.open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self, sled::Error> {
        Ok(Self {
            trees: db.open_tree(TREES)?,
            snapshots: db.open_tree(SNAPSHOTS)?,
        })
    }
}

fn decode_snapshot(key: &[u8], data: &[u8]) -> Result<SnapshotWithId, Error> {
    let id = B3Digest::try_from(key)
        .map_err(|e| Error::StorageError(format!("invalid snapshot key: {}", e)))?;
    let snapshot: Snapshot = serde_json::from_slice(data)?;
    verify_digest(&id, B3Digest::of(data))?;

    Ok(SnapshotWithId { id, snapshot })
}

#[async_trait]
impl Repository for SledRepository {
    #[instrument(skip(self, digest), fields(tree.digest = %digest))]
    async fn get_tree(&self, digest: &B3Digest) -> Result<Option<Tree>, Error> {
        match self.trees.get(digest.as_slice())? {
            // The tree was not found, return
            None => Ok(None),

            // The tree was found, try to parse the data as Tree
            Some(data) => {
                // Validate the retrieved data indeed has the digest we expect
                // it to have, to detect corruptions.
                verify_digest(digest, B3Digest::of(&data))?;

                match serde_json::from_slice(&data) {
                    Ok(tree) => Ok(Some(tree)),
                    Err(e) => {
                        warn!("unable to parse tree {}: {}", digest, e);
                        Err(e.into())
                    }
                }
            }
        }
    }

    #[instrument(skip_all, fields(tree.len = tree.nodes.len()))]
    async fn put_tree(&self, tree: Tree) -> Result<B3Digest, Error> {
        let data = tree.encode()?;
        let digest = B3Digest::of(&data);
        self.trees.insert(digest.as_slice(), data)?;

        Ok(digest)
    }

    #[instrument(skip(self, id), fields(snapshot.id = %id))]
    async fn get_snapshot(&self, id: &B3Digest) -> Result<Option<SnapshotWithId>, Error> {
        match self.snapshots.get(id.as_slice())? {
            None => Ok(None),
            Some(data) => decode_snapshot(id.as_slice(), &data).map(Some),
        }
    }

    #[instrument(skip_all, fields(snapshot.tree = %snapshot.tree))]
    async fn put_snapshot(&self, snapshot: Snapshot) -> Result<SnapshotWithId, Error> {
        let data = snapshot.encode()?;
        let id = B3Digest::of(&data);
        self.snapshots.insert(id.as_slice(), data)?;

        Ok(SnapshotWithId { id, snapshot })
    }

    #[instrument(skip_all)]
    fn list_snapshots(&self) -> BoxStream<'static, Result<SnapshotWithId, Error>> {
        let snapshots: Vec<_> = self
            .snapshots
            .iter()
            .map(|item| {
                let (key, data) = item?;
                decode_snapshot(&key, &data)
            })
            .collect();

        Box::pin(futures::stream::iter(snapshots))
    }
}
