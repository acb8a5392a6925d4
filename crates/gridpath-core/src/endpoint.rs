use std::path::{Path, PathBuf};

use crate::config::GridConfig;
use crate::errors::{ResolveError, ResolveResult};
use crate::operation::EndpointRule;
use crate::path::Side;
use crate::pathname;

/// A raw path string mapped onto one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub side: Side,
    /// Absolute, lexically normalized form.
    pub path: String,
    /// Last component of the path as the caller wrote it.
    pub basename: String,
}

impl Endpoint {
    /// The local `-` destination, standard output.
    pub fn is_stdout(&self) -> bool {
        self.side == Side::Local && self.path == STDOUT_PATH
    }
}

pub const STDOUT_PATH: &str = "-";

/// Decides whether a path string names a local or a remote entry and
/// produces its normalized absolute form.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    zones: Vec<String>,
    home: Option<String>,
    remote_cwd: Option<String>,
    local_cwd: PathBuf,
}

impl PathClassifier {
    /// Prefix that marks a path as remote regardless of the operation.
    pub const REMOTE_MARKER: &'static str = "i:";

    pub fn new(local_cwd: impl Into<PathBuf>) -> Self {
        Self {
            zones: Vec::new(),
            home: None,
            remote_cwd: None,
            local_cwd: local_cwd.into(),
        }
    }

    pub fn from_config(config: &GridConfig, local_cwd: impl Into<PathBuf>) -> Self {
        let mut classifier = Self::new(local_cwd);
        classifier.zones = config.zone_names().map(str::to_string).collect();
        classifier.home = config.home.as_deref().map(pathname::normalize);
        classifier.remote_cwd = config
            .cwd
            .as_deref()
            .map(pathname::normalize)
            .or_else(|| classifier.home.clone());
        classifier
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zones.push(zone.into());
        self
    }

    pub fn with_home(mut self, home: &str) -> Self {
        self.home = Some(pathname::normalize(home));
        self
    }

    pub fn with_remote_cwd(mut self, cwd: &str) -> Self {
        self.remote_cwd = Some(pathname::normalize(cwd));
        self
    }

    pub fn local_cwd(&self) -> &Path {
        &self.local_cwd
    }

    /// Working directory of `side`, used when no destination was supplied.
    pub fn working_dir(&self, side: Side) -> ResolveResult<String> {
        match side {
            Side::Local => Ok(self.local_cwd_string()),
            Side::Remote => self.remote_cwd.clone().ok_or(ResolveError::AmbiguousKind {
                path: String::new(),
                reason: "no remote working collection configured",
            }),
        }
    }

    pub fn is_zone_path(&self, path: &str) -> bool {
        pathname::first_component(path)
            .map(|zone| self.zones.iter().any(|known| known == zone))
            .unwrap_or(false)
    }

    pub fn classify(&self, raw: &str, rule: EndpointRule) -> ResolveResult<Endpoint> {
        if raw.is_empty() {
            return Err(ambiguous(raw, "empty path"));
        }

        let side = match raw.strip_prefix(Self::REMOTE_MARKER) {
            Some(_) if rule == EndpointRule::Local => {
                return Err(ambiguous(raw, "remote marker on a local-only path"));
            }
            Some(_) => Side::Remote,
            None => match rule.fixed() {
                Some(side) => side,
                None if self.is_zone_path(raw) => Side::Remote,
                None => Side::Local,
            },
        };

        let body = raw.strip_prefix(Self::REMOTE_MARKER).unwrap_or(raw);
        if body.is_empty() {
            return Err(ambiguous(raw, "marker without a path"));
        }

        match side {
            Side::Remote => self.classify_remote(raw, body),
            Side::Local => Ok(self.classify_local(body)),
        }
    }

    fn classify_remote(&self, raw: &str, body: &str) -> ResolveResult<Endpoint> {
        let absolute = if body == "~" {
            self.home
                .clone()
                .ok_or_else(|| ambiguous(raw, "no home collection configured"))?
        } else if let Some(rest) = body.strip_prefix("~/") {
            let home = self
                .home
                .as_deref()
                .ok_or_else(|| ambiguous(raw, "no home collection configured"))?;
            pathname::join(home, rest)
        } else if pathname::is_absolute(body) {
            body.to_string()
        } else {
            let cwd = self
                .remote_cwd
                .as_deref()
                .ok_or_else(|| ambiguous(raw, "relative remote path without a working collection"))?;
            pathname::join(cwd, body)
        };
        let path = pathname::normalize(&absolute);
        Ok(Endpoint {
            basename: given_basename(body, &path),
            side: Side::Remote,
            path,
        })
    }

    fn classify_local(&self, body: &str) -> Endpoint {
        if body == STDOUT_PATH {
            return Endpoint {
                side: Side::Local,
                path: STDOUT_PATH.to_string(),
                basename: STDOUT_PATH.to_string(),
            };
        }
        let absolute = if pathname::is_absolute(body) {
            body.to_string()
        } else {
            pathname::join(&self.local_cwd_string(), body)
        };
        let path = pathname::normalize(&absolute);
        Endpoint {
            basename: given_basename(body, &path),
            side: Side::Local,
            path,
        }
    }

    fn local_cwd_string(&self) -> String {
        pathname::normalize(&self.local_cwd.to_string_lossy().replace('\\', "/"))
    }
}

/// Basename of the path as written; `.` and `..` defer to the normalized
/// form since they name nothing on their own.
fn given_basename(given: &str, normalized: &str) -> String {
    match pathname::basename(given) {
        "" | "." | ".." | "~" => pathname::basename(normalized).to_string(),
        name => name.to_string(),
    }
}

fn ambiguous(raw: &str, reason: &'static str) -> ResolveError {
    ResolveError::AmbiguousKind {
        path: raw.to_string(),
        reason,
    }
}
