use std::fs::Metadata;
use std::io;

use async_trait::async_trait;
use tokio::fs;

use super::Namespace;
use crate::path::{PathKind, PathStat, Side};

/// The caller's filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalNamespace;

impl LocalNamespace {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Namespace for LocalNamespace {
    fn side(&self) -> Side {
        Side::Local
    }

    async fn stat(&self, path: &str) -> io::Result<Option<PathStat>> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(Some(stat_from_metadata(&meta, Side::Local))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create_container(&self, path: &str) -> io::Result<()> {
        match fs::create_dir(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                if fs::metadata(path).await?.is_dir() {
                    Ok(())
                } else {
                    Err(err)
                }
            }
            Err(err) => Err(err),
        }
    }
}

/// Maps filesystem metadata onto a status answer for `side`.
pub(crate) fn stat_from_metadata(meta: &Metadata, side: Side) -> PathStat {
    let kind = if meta.is_dir() {
        PathKind::container_on(side)
    } else {
        PathKind::leaf_on(side)
    };
    PathStat {
        kind,
        size: if meta.is_dir() {
            0
        } else {
            i64::try_from(meta.len()).unwrap_or(i64::MAX)
        },
        mode: file_mode(meta),
        object_id: inode(meta),
        checksum: None,
    }
}

#[cfg(unix)]
fn file_mode(meta: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn file_mode(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

#[cfg(unix)]
fn inode(meta: &Metadata) -> Option<String> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.ino().to_string())
}

#[cfg(not(unix))]
fn inode(_meta: &Metadata) -> Option<String> {
    None
}
