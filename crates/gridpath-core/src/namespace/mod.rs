//! Status and mutation capabilities the resolver consumes.

pub mod catalog;
pub mod local;
pub mod memory;

pub use catalog::DirectoryCatalog;
pub use local::LocalNamespace;
pub use memory::InMemoryNamespace;

use std::io;

use async_trait::async_trait;

use crate::path::{PathStat, Side};

#[async_trait]
pub trait Namespace: Send + Sync {
    /// Which side of a transfer this namespace serves.
    fn side(&self) -> Side;

    /// Looks up `path`. `Ok(None)` means the path does not exist; any other
    /// failure is reported as an error.
    async fn stat(&self, path: &str) -> io::Result<Option<PathStat>>;

    /// Creates a single container at `path`. Succeeds without change when a
    /// container already exists there. Never creates missing ancestors.
    async fn create_container(&self, path: &str) -> io::Result<()>;
}

/// The pair of namespaces one resolution runs against.
#[derive(Clone, Copy)]
pub struct Namespaces<'a> {
    pub local: &'a dyn Namespace,
    pub remote: &'a dyn Namespace,
}

impl<'a> Namespaces<'a> {
    pub fn new(local: &'a dyn Namespace, remote: &'a dyn Namespace) -> Self {
        Self { local, remote }
    }

    pub fn for_side(&self, side: Side) -> &'a dyn Namespace {
        match side {
            Side::Local => self.local,
            Side::Remote => self.remote,
        }
    }
}
