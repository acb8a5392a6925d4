use std::collections::{BTreeMap, BTreeSet};
use std::io;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::Namespace;
use crate::path::{PathKind, PathStat, Side};
use crate::pathname;

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<String, PathStat>,
    failing_stats: BTreeSet<String>,
    failing_creates: BTreeSet<String>,
    created: Vec<String>,
    stat_calls: usize,
}

/// Map-backed namespace for tests and embedding.
///
/// The root always exists. Fixtures added with `with_container` and
/// `with_object` bring their ancestors with them; `create_container` does not.
#[derive(Debug)]
pub struct InMemoryNamespace {
    side: Side,
    state: Mutex<State>,
}

impl InMemoryNamespace {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            state: Mutex::new(State::default()),
        }
    }

    pub fn remote() -> Self {
        Self::new(Side::Remote)
    }

    pub fn local() -> Self {
        Self::new(Side::Local)
    }

    pub fn with_container(self, path: &str) -> Self {
        self.insert_with_ancestors(path, PathStat::container(self.side));
        self
    }

    pub fn with_object(self, path: &str, size: i64) -> Self {
        self.insert_with_ancestors(path, PathStat::leaf(self.side, size));
        self
    }

    /// Makes every later `stat` of `path` fail with an I/O error.
    pub fn with_failing_stat(self, path: &str) -> Self {
        self.state.lock().failing_stats.insert(pathname::normalize(path));
        self
    }

    /// Makes every later `create_container` of `path` fail.
    pub fn with_failing_create(self, path: &str) -> Self {
        self.state.lock().failing_creates.insert(pathname::normalize(path));
        self
    }

    pub fn exists(&self, path: &str) -> bool {
        let key = pathname::normalize(path);
        key == "/" || self.state.lock().entries.contains_key(&key)
    }

    pub fn kind_of(&self, path: &str) -> Option<PathKind> {
        let key = pathname::normalize(path);
        if key == "/" {
            return Some(PathKind::container_on(self.side));
        }
        self.state.lock().entries.get(&key).map(|stat| stat.kind)
    }

    /// Containers created through `create_container`, in call order.
    pub fn created(&self) -> Vec<String> {
        self.state.lock().created.clone()
    }

    pub fn stat_calls(&self) -> usize {
        self.state.lock().stat_calls
    }

    fn insert_with_ancestors(&self, path: &str, stat: PathStat) {
        let key = pathname::normalize(path);
        let mut state = self.state.lock();
        let mut ancestor = pathname::parent(&key);
        while let Some(dir) = ancestor {
            if dir != "/" {
                state
                    .entries
                    .entry(dir.to_string())
                    .or_insert_with(|| PathStat::container(self.side));
            }
            ancestor = pathname::parent(dir);
        }
        if key != "/" {
            state.entries.insert(key, stat);
        }
    }
}

#[async_trait]
impl Namespace for InMemoryNamespace {
    fn side(&self) -> Side {
        self.side
    }

    async fn stat(&self, path: &str) -> io::Result<Option<PathStat>> {
        let key = pathname::normalize(path);
        let mut state = self.state.lock();
        state.stat_calls += 1;
        if state.failing_stats.contains(&key) {
            return Err(io::Error::other(format!("injected stat failure for {key}")));
        }
        if key == "/" {
            return Ok(Some(PathStat::container(self.side)));
        }
        Ok(state.entries.get(&key).cloned())
    }

    async fn create_container(&self, path: &str) -> io::Result<()> {
        let key = pathname::normalize(path);
        if key == "/" {
            return Ok(());
        }
        let mut state = self.state.lock();
        if state.failing_creates.contains(&key) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected create failure for {key}"),
            ));
        }
        if let Some(existing) = state.entries.get(&key) {
            return if existing.kind.is_container() {
                Ok(())
            } else {
                Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{key} exists and is not a container"),
                ))
            };
        }
        let parent_is_container = match pathname::parent(&key) {
            Some("/") | None => true,
            Some(parent) => state
                .entries
                .get(parent)
                .map(|stat| stat.kind.is_container())
                .unwrap_or(false),
        };
        if !parent_is_container {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent of {key} is not a container"),
            ));
        }
        state.entries.insert(key.clone(), PathStat::container(self.side));
        state.created.push(key);
        Ok(())
    }
}
