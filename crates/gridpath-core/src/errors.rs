//! Error classification for target resolution.
//!
//! Every failure the resolver can report maps to exactly one category so the
//! caller can pick a message and an exit status without string matching:
//! - NamespaceShape: the destination (or its parent) is missing; recoverable
//!   by choosing another path or creating the parent first
//! - Usage: the request itself is malformed for the operation
//! - Source: a source does not exist
//! - Infrastructure: a namespace call failed or a path could not be classified

use std::io;

use thiserror::Error;

/// Category of resolution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NamespaceShape,
    Usage,
    Source,
    Infrastructure,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::NamespaceShape => "namespace-shape",
            ErrorCategory::Usage => "usage",
            ErrorCategory::Source => "source",
            ErrorCategory::Infrastructure => "infrastructure",
        }
    }
}

/// A classified resolution failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A source path does not exist in its namespace.
    #[error("source does not exist: {path}")]
    SourceNotFound { path: String },

    /// Multiple sources (or a container source) were aimed at a leaf.
    #[error("destination must be a container: {path} ({reason})")]
    DestinationMustBeContainer { path: String, reason: &'static str },

    /// The remote destination container (or its parent) is missing.
    #[error("unknown destination container: {path}")]
    UnknownDestinationContainer { path: String },

    /// The local destination directory (or its parent) is missing.
    #[error("destination directory does not exist: {path}")]
    FileDoesNotExist { path: String },

    /// The namespace refused to create a container the policy asked for.
    #[error("failed to create container {path}")]
    AutoCreateFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The path syntax did not map cleanly onto a local or remote path.
    #[error("cannot classify path '{path}': {reason}")]
    AmbiguousKind { path: String, reason: &'static str },

    /// A status query failed for a reason other than "not found".
    #[error("status query failed for {path}")]
    StatFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("at least one source path is required")]
    NoSources,

    #[error("sources span both local and remote namespaces: {first} and {other}")]
    MixedSourceSides { first: String, other: String },
}

impl ResolveError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ResolveError::UnknownDestinationContainer { .. }
            | ResolveError::FileDoesNotExist { .. } => ErrorCategory::NamespaceShape,
            ResolveError::DestinationMustBeContainer { .. }
            | ResolveError::NoSources
            | ResolveError::MixedSourceSides { .. } => ErrorCategory::Usage,
            ResolveError::SourceNotFound { .. } => ErrorCategory::Source,
            ResolveError::AutoCreateFailed { .. }
            | ResolveError::AmbiguousKind { .. }
            | ResolveError::StatFailed { .. } => ErrorCategory::Infrastructure,
        }
    }

    /// Process exit status for the CLI surface.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Usage => 2,
            ErrorCategory::Source => 3,
            ErrorCategory::NamespaceShape => 4,
            ErrorCategory::Infrastructure => 5,
        }
    }

    /// Short machine-readable code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::SourceNotFound { .. } => "source-not-found",
            ResolveError::DestinationMustBeContainer { .. } => "destination-must-be-container",
            ResolveError::UnknownDestinationContainer { .. } => "unknown-destination-container",
            ResolveError::FileDoesNotExist { .. } => "file-does-not-exist",
            ResolveError::AutoCreateFailed { .. } => "auto-create-failed",
            ResolveError::AmbiguousKind { .. } => "ambiguous-kind",
            ResolveError::StatFailed { .. } => "stat-failed",
            ResolveError::NoSources => "no-sources",
            ResolveError::MixedSourceSides { .. } => "mixed-source-sides",
        }
    }

    /// True when the destination, or the parent it would be created under,
    /// is missing. Covers both the remote and the local face of the condition.
    pub fn is_missing_destination(&self) -> bool {
        matches!(
            self,
            ResolveError::UnknownDestinationContainer { .. } | ResolveError::FileDoesNotExist { .. }
        )
    }
}

/// Result type for resolution operations.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
