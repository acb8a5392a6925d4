use serde::Serialize;

use crate::errors::{ResolveError, ResolveResult};

/// Which namespace a path lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Local,
    Remote,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Local => "local",
            Side::Remote => "remote",
        }
    }
}

/// What a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathKind {
    #[default]
    Unknown,
    Object,
    Container,
    UnknownLocalFile,
    LocalFile,
    LocalDirectory,
    NoInput,
}

impl PathKind {
    pub fn is_container(self) -> bool {
        matches!(self, PathKind::Container | PathKind::LocalDirectory)
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, PathKind::Object | PathKind::LocalFile)
    }

    /// Namespace implied by the kind, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            PathKind::Object | PathKind::Container | PathKind::Unknown => Some(Side::Remote),
            PathKind::LocalFile | PathKind::LocalDirectory | PathKind::UnknownLocalFile => {
                Some(Side::Local)
            }
            PathKind::NoInput => None,
        }
    }

    pub fn container_on(side: Side) -> Self {
        match side {
            Side::Local => PathKind::LocalDirectory,
            Side::Remote => PathKind::Container,
        }
    }

    pub fn leaf_on(side: Side) -> Self {
        match side {
            Side::Local => PathKind::LocalFile,
            Side::Remote => PathKind::Object,
        }
    }

    pub fn unknown_on(side: Side) -> Self {
        match side {
            Side::Local => PathKind::UnknownLocalFile,
            Side::Remote => PathKind::Unknown,
        }
    }

    /// Kind of the target produced for a source of this kind written into
    /// `side`. Containers stay containers, everything else becomes a leaf.
    pub fn target_on(self, side: Side) -> Self {
        if self.is_container() {
            PathKind::container_on(side)
        } else {
            PathKind::leaf_on(side)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PathKind::Unknown => "unknown",
            PathKind::Object => "object",
            PathKind::Container => "container",
            PathKind::UnknownLocalFile => "unknown-local-file",
            PathKind::LocalFile => "local-file",
            PathKind::LocalDirectory => "local-directory",
            PathKind::NoInput => "no-input",
        }
    }
}

/// Outcome of a status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExistenceState {
    #[default]
    Unknown,
    NotExist,
    Exist,
}

impl ExistenceState {
    pub fn as_str(self) -> &'static str {
        match self {
            ExistenceState::Unknown => "unknown",
            ExistenceState::NotExist => "not-exist",
            ExistenceState::Exist => "exist",
        }
    }
}

/// Metadata reported by a namespace for an existing path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStat {
    pub kind: PathKind,
    pub size: i64,
    pub mode: u32,
    pub object_id: Option<String>,
    pub checksum: Option<String>,
}

impl PathStat {
    pub fn container(side: Side) -> Self {
        Self {
            kind: PathKind::container_on(side),
            size: 0,
            mode: 0,
            object_id: None,
            checksum: None,
        }
    }

    pub fn leaf(side: Side, size: i64) -> Self {
        Self {
            kind: PathKind::leaf_on(side),
            size,
            mode: 0,
            object_id: None,
            checksum: None,
        }
    }
}

/// One path and everything learned about it during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathDescriptor {
    pub kind: PathKind,
    pub state: ExistenceState,
    pub size: i64,
    pub mode: u32,
    pub given_path: String,
    pub resolved_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub object_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checksum: String,
}

impl PathDescriptor {
    pub fn new(given_path: impl Into<String>) -> Self {
        Self {
            given_path: given_path.into(),
            ..Self::default()
        }
    }

    /// Placeholder for an absent destination.
    pub fn no_input() -> Self {
        Self {
            kind: PathKind::NoInput,
            ..Self::default()
        }
    }

    pub fn is_no_input(&self) -> bool {
        self.kind == PathKind::NoInput
    }

    pub fn is_resolved(&self) -> bool {
        !self.resolved_path.is_empty()
    }

    pub fn exists(&self) -> bool {
        self.state == ExistenceState::Exist
    }

    /// Records a status answer. `None` means the namespace reported the path
    /// missing on `side`.
    pub fn apply_stat(&mut self, side: Side, stat: Option<&PathStat>) {
        match stat {
            Some(stat) => {
                self.kind = stat.kind;
                self.state = ExistenceState::Exist;
                self.size = stat.size;
                self.mode = stat.mode;
                self.object_id = stat.object_id.clone().unwrap_or_default();
                self.checksum = stat.checksum.clone().unwrap_or_default();
            }
            None => {
                self.kind = PathKind::unknown_on(side);
                self.state = ExistenceState::NotExist;
                self.size = 0;
                self.mode = 0;
                self.object_id.clear();
                self.checksum.clear();
            }
        }
    }

    /// Clears everything resolution writes, keeping the caller's input.
    pub fn reset(&mut self) {
        let given = std::mem::take(&mut self.given_path);
        *self = Self::new(given);
    }
}

/// A source and the target computed for it. Keeping them in one record makes
/// the two sequences index-aligned by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathPair {
    pub source: PathDescriptor,
    pub target: PathDescriptor,
}

/// The unit handed to the resolver: sources, one destination, and the
/// targets filled in on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSet {
    pairs: Vec<PathPair>,
    pub destination: PathDescriptor,
    pub resolved: bool,
    #[serde(skip)]
    destination_absent: bool,
}

impl PathSet {
    pub fn new<I, S>(sources: I, destination: Option<&str>) -> ResolveResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pairs: Vec<PathPair> = sources
            .into_iter()
            .map(|given| PathPair {
                source: PathDescriptor::new(given),
                target: PathDescriptor::default(),
            })
            .collect();
        if pairs.is_empty() {
            return Err(ResolveError::NoSources);
        }
        let destination_absent = destination.is_none();
        let destination = match destination {
            Some(path) => PathDescriptor::new(path),
            None => PathDescriptor::no_input(),
        };
        Ok(Self {
            pairs,
            destination,
            resolved: false,
            destination_absent,
        })
    }

    /// Splits a command line the way the grid tools do: the last path is the
    /// destination when there are at least two.
    pub fn from_args<S: AsRef<str>>(paths: &[S]) -> ResolveResult<Self> {
        match paths {
            [] => Err(ResolveError::NoSources),
            [only] => Self::new([only.as_ref()], None),
            [sources @ .., destination] => Self::new(
                sources.iter().map(|s| s.as_ref()),
                Some(destination.as_ref()),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// False when the caller supplied no destination, even after resolution
    /// substituted a working directory for it.
    pub fn destination_given(&self) -> bool {
        !self.destination_absent
    }

    pub fn is_multi_source(&self) -> bool {
        self.pairs.len() > 1
    }

    pub fn pairs(&self) -> &[PathPair] {
        &self.pairs
    }

    pub fn pairs_mut(&mut self) -> &mut [PathPair] {
        &mut self.pairs
    }

    pub fn sources(&self) -> impl Iterator<Item = &PathDescriptor> {
        self.pairs.iter().map(|pair| &pair.source)
    }

    pub fn targets(&self) -> impl Iterator<Item = &PathDescriptor> {
        self.pairs.iter().map(|pair| &pair.target)
    }

    pub fn source(&self, index: usize) -> Option<&PathDescriptor> {
        self.pairs.get(index).map(|pair| &pair.source)
    }

    pub fn target(&self, index: usize) -> Option<&PathDescriptor> {
        self.pairs.get(index).map(|pair| &pair.target)
    }

    /// Drops every computed field so the set can be resolved again.
    pub fn reset(&mut self) {
        for pair in &mut self.pairs {
            pair.source.reset();
            pair.target = PathDescriptor::default();
        }
        if self.destination_absent {
            self.destination = PathDescriptor::no_input();
        } else {
            self.destination.reset();
        }
        self.resolved = false;
    }
}
