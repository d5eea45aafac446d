use serde::{Deserialize, Serialize};

use super::NodeDescriptor;
use crate::B3Digest;

/// A Tree is the listing of one directory level, an ordered list of
/// [NodeDescriptor].
///
/// Trees are content-addressed: their digest is the blake3 hash of their JSON
/// serialization. The import sorts nodes by name, but nothing here enforces
/// order or name uniqueness.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<NodeDescriptor>,
}

impl Tree {
    pub fn new(nodes: Vec<NodeDescriptor>) -> Self {
        Tree { nodes }
    }

    /// Serializes the tree into the form its digest is calculated over.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Calculates the digest of a Tree, which is the blake3 hash of its
    /// serialized form.
    pub fn digest(&self) -> Result<B3Digest, serde_json::Error> {
        Ok(B3Digest::of(&self.encode()?))
    }
}

#[cfg(test)]
mod test {
    use super::Tree;
    use crate::fixtures::{TREE_COMPLICATED, TREE_WITH_KEEP};
    use crate::nodes::NodeDescriptor;

    #[test]
    fn digest_is_stable() {
        assert_eq!(
            TREE_WITH_KEEP.digest().unwrap(),
            TREE_WITH_KEEP.clone().digest().unwrap()
        );
        assert_ne!(
            TREE_WITH_KEEP.digest().unwrap(),
            TREE_COMPLICATED.digest().unwrap()
        );
    }

    #[test]
    fn decode_encoded() {
        let encoded = TREE_COMPLICATED.encode().unwrap();
        let decoded: Tree = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(*TREE_COMPLICATED, decoded);
    }

    #[test]
    fn empty_tree_digest_differs_from_tree_with_entry() {
        let empty = Tree::default();
        let non_empty = Tree::new(vec![NodeDescriptor::symlink("a", "b")]);
        assert_ne!(empty.digest().unwrap(), non_empty.digest().unwrap());
    }
}
