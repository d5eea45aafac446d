mod digests;
mod errors;

pub mod fs;
pub mod import;
pub mod nodes;
pub mod repository;
pub mod snapshot;

pub use digests::{B3Digest, B3_LEN};
pub use errors::Error;

#[cfg(test)]
mod fixtures;

// Used by the #[template] in repository::tests.
#[cfg(test)]
#[allow(clippy::single_component_path_imports)]
use rstest_reuse;
