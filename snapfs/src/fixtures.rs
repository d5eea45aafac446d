use crate::{
    nodes::{ExtendedAttribute, NodeDescriptor, NodeType, Tree},
    B3Digest,
};
use lazy_static::lazy_static;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const HELLOWORLD_BLOB_CONTENTS: &[u8] = b"Hello World!";
pub const EMPTY_BLOB_CONTENTS: &[u8] = b"";

lazy_static! {
    pub static ref DUMMY_DIGEST: B3Digest = (&[0u8; 32]).into();
    pub static ref DUMMY_DIGEST_2: B3Digest = {
        let mut u = [0u8; 32];
        u[0] = 0x10;
        (&u).into()
    };

    pub static ref HELLOWORLD_BLOB_DIGEST: B3Digest = B3Digest::of(HELLOWORLD_BLOB_CONTENTS);
    pub static ref EMPTY_BLOB_DIGEST: B3Digest = B3Digest::of(EMPTY_BLOB_CONTENTS);

    pub static ref SNAPSHOT_TIME: SystemTime = UNIX_EPOCH + Duration::from_secs(1_700_000_000);

    // Trees
    pub static ref TREE_EMPTY: Tree = Tree::default();
    pub static ref TREE_WITH_KEEP: Tree = Tree::new(vec![
        NodeDescriptor::file(".keep", EMPTY_BLOB_DIGEST.clone(), 0),
    ]);
    pub static ref TREE_COMPLICATED: Tree = Tree::new(vec![
        NodeDescriptor::file(".keep", EMPTY_BLOB_DIGEST.clone(), 0),
        NodeDescriptor::symlink("aa", "/nix/store/somewhereelse"),
        NodeDescriptor {
            uid: 1000,
            gid: 100,
            mode: 0o750,
            inode: Some(4242),
            mtime: UNIX_EPOCH + Duration::from_secs(1_600_000_000),
            extended_attributes: vec![ExtendedAttribute {
                name: "user.comment".into(),
                value: "kept".into(),
            }],
            ..NodeDescriptor::dir("keep", TREE_WITH_KEEP.digest().unwrap())
        },
    ]);

    /// `a.txt` and the subdirectory `sub`.
    pub static ref TREE_A_SUB: Tree = Tree::new(vec![
        NodeDescriptor::file("a.txt", HELLOWORLD_BLOB_DIGEST.clone(), HELLOWORLD_BLOB_CONTENTS.len() as u64),
        NodeDescriptor::dir("sub", TREE_EMPTY.digest().unwrap()),
    ]);
    /// A snapshot root wrapping [TREE_A_SUB] in a "." node.
    pub static ref TREE_DOT_WRAPPER: Tree = Tree::new(vec![
        NodeDescriptor::dir(".", TREE_A_SUB.digest().unwrap()),
    ]);
    /// A snapshot root wrapping [TREE_A_SUB] in a "/" node, next to a regular entry.
    pub static ref TREE_SLASH_WRAPPER: Tree = Tree::new(vec![
        NodeDescriptor::dir("/", TREE_A_SUB.digest().unwrap()),
        NodeDescriptor::symlink("link", "a.txt"),
    ]);
    /// A "." node that is a file, not a directory, so it doesn't get flattened.
    pub static ref TREE_DOT_FILE: Tree = Tree::new(vec![
        NodeDescriptor::file(".", EMPTY_BLOB_DIGEST.clone(), 0),
    ]);
    /// A tree containing an entry of a type unknown to us.
    pub static ref TREE_UNRECOGNIZED: Tree = Tree::new(vec![
        NodeDescriptor::new("dev", NodeType::Unrecognized),
        NodeDescriptor::dir("d", TREE_EMPTY.digest().unwrap()),
    ]);
    /// Two entries sharing the name "dup", the directory comes last.
    pub static ref TREE_DUPLICATE_NAMES: Tree = Tree::new(vec![
        NodeDescriptor::file("dup", EMPTY_BLOB_DIGEST.clone(), 0),
        NodeDescriptor::dir("dup", TREE_EMPTY.digest().unwrap()),
    ]);
}
