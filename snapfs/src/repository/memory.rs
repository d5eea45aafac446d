use crate::nodes::Tree;
use crate::snapshot::{Snapshot, SnapshotWithId};
use crate::{B3Digest, Error};
use async_trait::async_trait;
use futures::stream::BoxStream;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use super::{verify_digest, Repository};

#[derive(Clone, Default)]
pub struct MemoryRepository {
    trees: Arc<RwLock<HashMap<B3Digest, Tree>>>,
    snapshots: Arc<RwLock<HashMap<B3Digest, Snapshot>>>,
}

#[async_trait]
impl Repository for MemoryRepository {
    #[instrument(skip(self, digest), fields(tree.digest = %digest))]
    async fn get_tree(&self, digest: &B3Digest) -> Result<Option<Tree>, Error> {
        let trees = self.trees.read();

        match trees.get(digest) {
            // The tree was not found, return
            None => Ok(None),

            Some(tree) => {
                verify_digest(digest, tree.digest()?)?;
                Ok(Some(tree.clone()))
            }
        }
    }

    #[instrument(skip_all, fields(tree.len = tree.nodes.len()))]
    async fn put_tree(&self, tree: Tree) -> Result<B3Digest, Error> {
        let digest = tree.digest()?;
        self.trees.write().insert(digest.clone(), tree);

        Ok(digest)
    }

    #[instrument(skip(self, id), fields(snapshot.id = %id))]
    async fn get_snapshot(&self, id: &B3Digest) -> Result<Option<SnapshotWithId>, Error> {
        Ok(self
            .snapshots
            .read()
            .get(id)
            .map(|snapshot| SnapshotWithId {
                id: id.clone(),
                snapshot: snapshot.clone(),
            }))
    }

    #[instrument(skip_all, fields(snapshot.tree = %snapshot.tree))]
    async fn put_snapshot(&self, snapshot: Snapshot) -> Result<SnapshotWithId, Error> {
        let id = snapshot.id()?;
        self.snapshots.write().insert(id.clone(), snapshot.clone());

        Ok(SnapshotWithId { id, snapshot })
    }

    #[instrument(skip_all)]
    fn list_snapshots(&self) -> BoxStream<'static, Result<SnapshotWithId, Error>> {
        let snapshots: Vec<_> = self
            .snapshots
            .read()
            .iter()
            .map(|(id, snapshot)| {
                Ok(SnapshotWithId {
                    id: id.clone(),
                    snapshot: snapshot.clone(),
                })
            })
            .collect();

        Box::pin(futures::stream::iter(snapshots))
    }
}
