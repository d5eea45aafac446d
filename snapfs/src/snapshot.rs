use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::B3Digest;

/// A Snapshot records the root [crate::nodes::Tree] of one import, along with
/// when and where it was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: SystemTime,
    /// The digest of the root tree.
    pub tree: B3Digest,
    pub hostname: String,
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Snapshot {
    pub fn new(time: SystemTime, tree: B3Digest) -> Self {
        Self {
            time,
            tree,
            hostname: String::new(),
            paths: vec![],
            tags: vec![],
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// The snapshot ID, the blake3 hash of its serialized form.
    pub fn id(&self) -> Result<B3Digest, serde_json::Error> {
        Ok(B3Digest::of(&self.encode()?))
    }
}

/// A [Snapshot] alongside its ID, as handed out by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotWithId {
    pub id: B3Digest,
    pub snapshot: Snapshot,
}

impl std::ops::Deref for SnapshotWithId {
    type Target = Snapshot;

    fn deref(&self) -> &Self::Target {
        &self.snapshot
    }
}
