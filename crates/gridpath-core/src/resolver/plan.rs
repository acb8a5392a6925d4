use serde::Serialize;

use crate::errors::{ResolveError, ResolveResult};
use crate::namespace::Namespace;
use crate::path::Side;

/// A container resolution created, or would create in a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedContainer {
    pub side: Side,
    pub path: String,
}

/// Routes container creation either to the namespace or into a list.
pub(super) struct Creations<'a> {
    namespace: &'a dyn Namespace,
    dry_run: bool,
    planned: Vec<PlannedContainer>,
}

impl<'a> Creations<'a> {
    pub(super) fn new(namespace: &'a dyn Namespace, dry_run: bool) -> Self {
        Self {
            namespace,
            dry_run,
            planned: Vec::new(),
        }
    }

    /// Creates `path`, or records it when planning. Returns whether the
    /// container now really exists.
    pub(super) async fn create(&mut self, path: &str) -> ResolveResult<bool> {
        let side = self.namespace.side();
        self.planned.push(PlannedContainer {
            side,
            path: path.to_string(),
        });
        if self.dry_run {
            log::debug!("dry run: would create {} container {path}", side.as_str());
            return Ok(false);
        }
        self.namespace
            .create_container(path)
            .await
            .map_err(|source| ResolveError::AutoCreateFailed {
                path: path.to_string(),
                source,
            })?;
        log::info!("created {} container {path}", side.as_str());
        Ok(true)
    }

    pub(super) fn into_planned(self) -> Vec<PlannedContainer> {
        self.planned
    }
}
