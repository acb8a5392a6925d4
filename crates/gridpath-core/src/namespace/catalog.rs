use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::local::stat_from_metadata;
use super::Namespace;
use crate::config::GridConfig;
use crate::path::{PathStat, Side};
use crate::pathname;

/// Remote namespace whose zones are served from local directories.
///
/// `/zone/a/b` lives at `<zone dir>/a/b`; `/` is a virtual container holding
/// the configured zones. Objects are regular files, containers directories.
#[derive(Debug, Clone, Default)]
pub struct DirectoryCatalog {
    zones: BTreeMap<String, PathBuf>,
}

impl DirectoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from every configured zone that names a directory.
    pub fn from_config(config: &GridConfig) -> Self {
        let zones = config
            .zones
            .iter()
            .filter_map(|(name, zone)| zone.path.clone().map(|dir| (name.clone(), dir)))
            .collect();
        Self { zones }
    }

    pub fn with_zone(mut self, name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.zones.insert(name.into(), dir.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Local location of a remote path, `None` for the root and for paths
    /// outside every configured zone.
    pub fn backing_path(&self, path: &str) -> Option<PathBuf> {
        let normalized = pathname::normalize(path);
        let mut components = normalized.split('/').filter(|c| !c.is_empty());
        let zone = components.next()?;
        let mut local = self.zones.get(zone)?.clone();
        for component in components {
            local.push(component);
        }
        Some(local)
    }

    fn is_root(path: &str) -> bool {
        pathname::normalize(path) == "/"
    }
}

#[async_trait]
impl Namespace for DirectoryCatalog {
    fn side(&self) -> Side {
        Side::Remote
    }

    async fn stat(&self, path: &str) -> io::Result<Option<PathStat>> {
        if Self::is_root(path) {
            return Ok(Some(PathStat::container(Side::Remote)));
        }
        let Some(local) = self.backing_path(path) else {
            log::debug!("catalog: {path} is outside every configured zone");
            return Ok(None);
        };
        match fs::metadata(&local).await {
            Ok(meta) => Ok(Some(stat_from_metadata(&meta, Side::Remote))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create_container(&self, path: &str) -> io::Result<()> {
        if Self::is_root(path) {
            return Ok(());
        }
        let local = self.backing_path(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no zone configured for {path}"),
            )
        })?;
        match fs::create_dir(&local).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                if fs::metadata(&local).await?.is_dir() {
                    Ok(())
                } else {
                    Err(err)
                }
            }
            Err(err) => Err(err),
        }
    }
}
