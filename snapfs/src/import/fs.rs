//! Converts entries of a real filesystem to [NodeDescriptor]s.
use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

use super::Error;
use crate::nodes::{ExtendedAttribute, NodeDescriptor, NodeType};
use crate::B3Digest;

/// Converts a timestamp as found in [Metadata] to a [SystemTime].
/// Timestamps before the epoch are clamped to it, as they can't be serialized.
fn to_system_time(secs: i64, nsecs: i64) -> SystemTime {
    if secs < 0 || nsecs < 0 {
        return UNIX_EPOCH;
    }
    UNIX_EPOCH + Duration::new(secs as u64, nsecs as u32)
}

/// Builds the descriptor for the entry at `path`, without its children.
/// Returns None for file types that can't be represented (devices, sockets,
/// fifos).
pub(super) fn descriptor_at_path(
    path: &Path,
    name: &std::ffi::OsStr,
    metadata: &Metadata,
) -> Result<Option<NodeDescriptor>, Error> {
    let name = name
        .to_str()
        .ok_or_else(|| Error::InvalidEncoding(path.to_path_buf()))?;

    let file_type = metadata.file_type();
    let mut node = if file_type.is_dir() {
        NodeDescriptor::new(name, NodeType::Dir)
    } else if file_type.is_symlink() {
        let target = std::fs::read_link(path)
            .map_err(|e| Error::UnableToRead(path.to_path_buf(), e))?;
        let target = target
            .to_str()
            .ok_or_else(|| Error::InvalidEncoding(path.to_path_buf()))?;

        NodeDescriptor::symlink(name, target)
    } else if file_type.is_file() {
        NodeDescriptor::file(name, hash_file(path)?, metadata.size())
    } else {
        warn!(path = ?path, "skipping unsupported file type");
        return Ok(None);
    };

    node.mode = metadata.mode() & 0o7777;
    node.uid = metadata.uid();
    node.gid = metadata.gid();
    node.atime = to_system_time(metadata.atime(), metadata.atime_nsec());
    node.mtime = to_system_time(metadata.mtime(), metadata.mtime_nsec());
    node.ctime = to_system_time(metadata.ctime(), metadata.ctime_nsec());
    node.inode = Some(metadata.ino());
    node.extended_attributes = read_xattrs(path)?;

    Ok(Some(node))
}

/// Hashes the contents of the file at `path`.
fn hash_file(path: &Path) -> Result<B3Digest, Error> {
    let file = std::fs::File::open(path).map_err(|e| Error::UnableToRead(path.to_path_buf(), e))?;

    let mut hasher = blake3::Hasher::new();
    hasher
        .update_reader(file)
        .map_err(|e| Error::UnableToRead(path.to_path_buf(), e))?;

    Ok(hasher.finalize().into())
}

/// Reads all extended attributes of the entry at `path`, without following
/// symlinks. Filesystems without xattr support yield none.
fn read_xattrs(path: &Path) -> Result<Vec<ExtendedAttribute>, Error> {
    let names = match xattr::list(path) {
        Ok(names) => names,
        Err(e) if is_unsupported(&e) => return Ok(vec![]),
        Err(e) => return Err(Error::UnableToReadXattrs(path.to_path_buf(), e)),
    };

    let mut attrs = vec![];
    for name in names {
        let Some(name_str) = name.to_str() else {
            warn!(path = ?path, name = ?name, "skipping xattr with invalid name");
            continue;
        };

        // the attribute might have disappeared in between.
        if let Some(value) =
            xattr::get(path, &name).map_err(|e| Error::UnableToReadXattrs(path.to_path_buf(), e))?
        {
            attrs.push(ExtendedAttribute {
                name: name_str.to_string(),
                value: value.into(),
            });
        }
    }

    Ok(attrs)
}

fn is_unsupported(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::Unsupported || e.raw_os_error() == Some(libc::ENOTSUP)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::to_system_time;

    #[test]
    fn system_time_conversion() {
        assert_eq!(
            UNIX_EPOCH + Duration::new(1_700_000_000, 5),
            to_system_time(1_700_000_000, 5)
        );
        assert_eq!(UNIX_EPOCH, to_system_time(-1, 0));
    }
}
