use crate::nodes::Tree;
use crate::snapshot::{Snapshot, SnapshotWithId};
use crate::{B3Digest, Error};

use async_trait::async_trait;
use futures::stream::BoxStream;

mod from_addr;
mod memory;
mod sled;

pub use self::from_addr::from_addr;
pub use self::memory::MemoryRepository;
pub use self::sled::SledRepository;

/// The base trait all repositories need to implement.
/// This is a simple get and put of [Tree] and [Snapshot], keyed by their
/// digest.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Looks up a single Tree by its digest.
    /// The returned Tree *must* hash to the requested digest.
    /// In case the tree is not found, Ok(None) is returned.
    async fn get_tree(&self, digest: &B3Digest) -> Result<Option<Tree>, Error>;

    /// Uploads a single Tree, and returns the calculated digest, or an error.
    async fn put_tree(&self, tree: Tree) -> Result<B3Digest, Error>;

    /// Looks up a single Snapshot by its ID.
    async fn get_snapshot(&self, id: &B3Digest) -> Result<Option<SnapshotWithId>, Error>;

    /// Stores a Snapshot, returning it alongside its ID.
    async fn put_snapshot(&self, snapshot: Snapshot) -> Result<SnapshotWithId, Error>;

    /// Lists all snapshots in the repository, in no particular order.
    fn list_snapshots(&self) -> BoxStream<'static, Result<SnapshotWithId, Error>>;

    /// Like [Repository::get_tree], but a missing tree is an error.
    async fn load_tree(&self, digest: &B3Digest) -> Result<Tree, Error> {
        self.get_tree(digest)
            .await?
            .ok_or_else(|| Error::TreeNotFound(digest.clone()))
    }
}

/// Checks data read back from a repository hashes to the digest it was
/// requested by, to detect corruptions.
fn verify_digest(requested: &B3Digest, actual: B3Digest) -> Result<(), Error> {
    if actual != *requested {
        return Err(Error::StorageError(format!(
            "requested {}, but got {}",
            requested, actual
        )));
    }
    Ok(())
}
