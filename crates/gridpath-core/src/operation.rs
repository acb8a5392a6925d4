//! Operation kinds and the policy table that drives every branch of the
//! resolver.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::path::Side;

/// Where the paths on one side of an operation live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointRule {
    Local,
    Remote,
    /// Decided per path by syntax (marker prefix or zone root).
    Either,
}

impl EndpointRule {
    pub fn fixed(self) -> Option<Side> {
        match self {
            EndpointRule::Local => Some(Side::Local),
            EndpointRule::Remote => Some(Side::Remote),
            EndpointRule::Either => None,
        }
    }
}

/// Per-kind behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Policy {
    /// May resolution create missing destination containers?
    pub allow_autocreate_destination: bool,
    /// With several sources, must the destination already be a container?
    pub requires_existing_container_for_multi_source: bool,
    /// With one source and an existing container destination, is the target
    /// `destination/basename(source)` rather than the destination itself?
    pub nest_single_source_under_existing_container: bool,
    pub source_side: EndpointRule,
    pub destination_side: EndpointRule,
}

impl Policy {
    const fn transfer(source_side: EndpointRule, destination_side: EndpointRule) -> Self {
        Self {
            allow_autocreate_destination: true,
            requires_existing_container_for_multi_source: false,
            nest_single_source_under_existing_container: true,
            source_side,
            destination_side,
        }
    }

    const fn in_place() -> Self {
        Self {
            allow_autocreate_destination: false,
            requires_existing_container_for_multi_source: true,
            nest_single_source_under_existing_container: true,
            source_side: EndpointRule::Remote,
            destination_side: EndpointRule::Remote,
        }
    }

    const fn synchronize() -> Self {
        Self {
            allow_autocreate_destination: true,
            requires_existing_container_for_multi_source: false,
            nest_single_source_under_existing_container: false,
            source_side: EndpointRule::Either,
            destination_side: EndpointRule::Either,
        }
    }
}

/// Closed set of data-movement operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    Put,
    Get,
    SameHostCopy,
    CopyToLocal,
    CopyToRemote,
    Replicate,
    ReplicateDest,
    ReplicateSrc,
    CopyDest,
    CopySrc,
    RenameObject,
    RenameContainer,
    Move,
    Synchronize,
    PhysicalMove,
    PhysicalMoveSrc,
    PhysicalMoveDest,
    QueryObject,
    QueryObjectRecursive,
    QueryContainer,
    QueryContainerRecursive,
    RenameUnknown,
    RemoteZone,
    Unregister,
}

impl OperationKind {
    pub const ALL: [OperationKind; 24] = [
        OperationKind::Put,
        OperationKind::Get,
        OperationKind::SameHostCopy,
        OperationKind::CopyToLocal,
        OperationKind::CopyToRemote,
        OperationKind::Replicate,
        OperationKind::ReplicateDest,
        OperationKind::ReplicateSrc,
        OperationKind::CopyDest,
        OperationKind::CopySrc,
        OperationKind::RenameObject,
        OperationKind::RenameContainer,
        OperationKind::Move,
        OperationKind::Synchronize,
        OperationKind::PhysicalMove,
        OperationKind::PhysicalMoveSrc,
        OperationKind::PhysicalMoveDest,
        OperationKind::QueryObject,
        OperationKind::QueryObjectRecursive,
        OperationKind::QueryContainer,
        OperationKind::QueryContainerRecursive,
        OperationKind::RenameUnknown,
        OperationKind::RemoteZone,
        OperationKind::Unregister,
    ];

    pub const fn policy(self) -> Policy {
        use EndpointRule::{Local, Remote};
        match self {
            OperationKind::Put | OperationKind::CopyToRemote => Policy::transfer(Local, Remote),
            OperationKind::Get | OperationKind::CopyToLocal => Policy::transfer(Remote, Local),
            OperationKind::Replicate | OperationKind::ReplicateDest | OperationKind::ReplicateSrc => {
                Policy::transfer(Remote, Remote)
            }
            OperationKind::Synchronize => Policy::synchronize(),
            // Copy, rename and move never materialize destination structure;
            // physical-move, query, remote-zone and unregister alias them.
            OperationKind::SameHostCopy
            | OperationKind::CopyDest
            | OperationKind::CopySrc
            | OperationKind::RenameObject
            | OperationKind::RenameContainer
            | OperationKind::RenameUnknown
            | OperationKind::Move
            | OperationKind::PhysicalMove
            | OperationKind::PhysicalMoveSrc
            | OperationKind::PhysicalMoveDest
            | OperationKind::QueryObject
            | OperationKind::QueryObjectRecursive
            | OperationKind::QueryContainer
            | OperationKind::QueryContainerRecursive
            | OperationKind::RemoteZone
            | OperationKind::Unregister => Policy::in_place(),
        }
    }

    /// Numeric operation code used on the wire by the catalog protocol.
    pub const fn code(self) -> i32 {
        match self {
            OperationKind::Put => 1,
            OperationKind::Get => 2,
            OperationKind::SameHostCopy => 3,
            OperationKind::CopyToLocal => 4,
            OperationKind::CopyToRemote => 5,
            OperationKind::Replicate => 6,
            OperationKind::ReplicateDest => 7,
            OperationKind::ReplicateSrc => 8,
            OperationKind::CopyDest => 9,
            OperationKind::CopySrc => 10,
            OperationKind::RenameObject => 11,
            OperationKind::RenameContainer => 12,
            OperationKind::Move => 13,
            OperationKind::Synchronize => 14,
            OperationKind::PhysicalMove => 15,
            OperationKind::PhysicalMoveSrc => 16,
            OperationKind::PhysicalMoveDest => 17,
            OperationKind::QueryObject => 18,
            OperationKind::QueryObjectRecursive => 19,
            OperationKind::QueryContainer => 20,
            OperationKind::QueryContainerRecursive => 21,
            OperationKind::RenameUnknown => 22,
            OperationKind::RemoteZone => 24,
            OperationKind::Unregister => 26,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            OperationKind::Put => "put",
            OperationKind::Get => "get",
            OperationKind::SameHostCopy => "same-host-copy",
            OperationKind::CopyToLocal => "copy-to-local",
            OperationKind::CopyToRemote => "copy-to-remote",
            OperationKind::Replicate => "replicate",
            OperationKind::ReplicateDest => "replicate-dest",
            OperationKind::ReplicateSrc => "replicate-src",
            OperationKind::CopyDest => "copy-dest",
            OperationKind::CopySrc => "copy-src",
            OperationKind::RenameObject => "rename-object",
            OperationKind::RenameContainer => "rename-container",
            OperationKind::Move => "move",
            OperationKind::Synchronize => "synchronize",
            OperationKind::PhysicalMove => "physical-move",
            OperationKind::PhysicalMoveSrc => "physical-move-src",
            OperationKind::PhysicalMoveDest => "physical-move-dest",
            OperationKind::QueryObject => "query-object",
            OperationKind::QueryObjectRecursive => "query-object-recursive",
            OperationKind::QueryContainer => "query-container",
            OperationKind::QueryContainerRecursive => "query-container-recursive",
            OperationKind::RenameUnknown => "rename-unknown",
            OperationKind::RemoteZone => "remote-zone",
            OperationKind::Unregister => "unregister",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation kind '{0}'")]
pub struct UnknownOperation(pub String);

impl FromStr for OperationKind {
    type Err = UnknownOperation;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        let alias = match normalized.as_str() {
            "copy" | "cp" => Some(OperationKind::CopyDest),
            "mv" => Some(OperationKind::Move),
            "sync" | "rsync" => Some(OperationKind::Synchronize),
            "phymv" => Some(OperationKind::PhysicalMove),
            "unreg" => Some(OperationKind::Unregister),
            _ => None,
        };
        if let Some(kind) = alias {
            return Ok(kind);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| UnknownOperation(raw.to_string()))
    }
}
