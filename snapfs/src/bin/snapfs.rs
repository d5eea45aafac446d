use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use tracing::{info, Level};

use snapfs::fs::{Dir, Entry, FileAttr};
use snapfs::repository::{self, Repository};
use snapfs::{B3Digest, Error};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long)]
    log_level: Option<Level>,

    #[arg(long, env, default_value = "sled:///var/lib/snapfs/repository.sled")]
    repository_addr: String,

    /// Report all entries as owned by root, instead of their recorded owner.
    #[arg(long)]
    owner_is_root: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Imports a path into the repository, as a new snapshot.
    Import {
        #[clap(value_name = "PATH")]
        path: PathBuf,

        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Lists all snapshots in the repository.
    Snapshots,
    /// Lists a directory inside a snapshot.
    Ls {
        snapshot: B3Digest,
        #[clap(default_value = "")]
        path: String,
    },
    /// Shows the attributes of an entry inside a snapshot.
    Stat {
        snapshot: B3Digest,
        #[clap(default_value = "")]
        path: String,
    },
    /// Prints the target of a symlink inside a snapshot.
    Readlink { snapshot: B3Digest, path: String },
    /// Lists the extended attributes of an entry inside a snapshot, or prints
    /// the value of a single one.
    Getfattr {
        snapshot: B3Digest,
        path: String,

        #[arg(long, short = 'n')]
        name: Option<String>,
    },
}

/// Loads the root directory of the snapshot with the given ID.
async fn open_snapshot(
    repository: Arc<dyn Repository>,
    id: &B3Digest,
    owner_is_root: bool,
) -> Result<Dir, Box<dyn std::error::Error>> {
    let snapshot = repository
        .get_snapshot(id)
        .await?
        .ok_or_else(|| Error::SnapshotNotFound(id.clone()))?;

    Ok(Dir::from_snapshot(repository, &snapshot, owner_is_root).await?)
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn print_attr(name: &str, attr: &FileAttr) {
    println!("  File: {}", name);
    println!("  Size: {}\tInode: {}\tLinks: {}", attr.size, attr.ino, attr.nlink);
    println!(
        "Access: ({:o})\tUid: {}\tGid: {}",
        attr.mode,
        attr.uid_or(0),
        attr.gid_or(0)
    );
    println!("Access: {}", unix_secs(attr.atime));
    println!("Modify: {}", unix_secs(attr.mtime));
    println!("Change: {}", unix_secs(attr.ctime));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    snapfs_tracing::TracingBuilder::default()
        .level(cli.log_level.unwrap_or(Level::INFO))
        .build()?;

    let repository = repository::from_addr(&cli.repository_addr)?;

    match cli.command {
        Commands::Import { path, tags } => {
            let snapshot = snapfs::import::ingest_path(repository.as_ref(), &path, tags).await?;

            info!(path = %path.display(), snapshot.id = %snapshot.id, "imported");
            println!("{}", snapshot.id);
        }
        Commands::Snapshots => {
            let mut snapshots: Vec<_> = repository.list_snapshots().try_collect().await?;
            snapshots.sort_by_key(|s| s.time);

            for s in snapshots {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    s.id,
                    unix_secs(s.time),
                    s.hostname,
                    s.paths.join(","),
                    s.tags.join(",")
                );
            }
        }
        Commands::Ls { snapshot, path } => {
            let root = open_snapshot(repository, &snapshot, cli.owner_is_root).await?;

            match root.walk(&path).await? {
                Entry::Directory(dir) => {
                    for entry in dir.readdir() {
                        println!("{}\t{:?}\t{}", entry.ino, entry.kind, entry.name);
                    }
                }
                entry => println!("{}\t{}", entry.inode(), path),
            }
        }
        Commands::Stat { snapshot, path } => {
            let root = open_snapshot(repository, &snapshot, cli.owner_is_root).await?;
            let entry = root.walk(&path).await?;

            print_attr(&path, &entry.attr());
        }
        Commands::Readlink { snapshot, path } => {
            let root = open_snapshot(repository, &snapshot, cli.owner_is_root).await?;

            match root.walk(&path).await? {
                Entry::Symlink(symlink) => println!("{}", symlink.readlink()?),
                _ => return Err(format!("{} is not a symlink", path).into()),
            }
        }
        Commands::Getfattr {
            snapshot,
            path,
            name,
        } => {
            let root = open_snapshot(repository, &snapshot, cli.owner_is_root).await?;
            let entry = root.walk(&path).await?;

            match name {
                Some(name) => {
                    let value = entry.getxattr(&name)?;
                    println!("{}={}", name, String::from_utf8_lossy(value));
                }
                None => {
                    for name in entry.listxattr() {
                        println!("{}", name);
                    }
                }
            }
        }
    }

    Ok(())
}
