//! Target resolution: decides the final path of every source before any
//! data moves.
//!
//! Resolution runs in three passes over a [`PathSet`]:
//! 1. classify and stat every source (concurrently, applied in index order)
//! 2. classify and stat the destination, creating it when several sources
//!    need a container and the operation allows auto-create
//! 3. compute one target per source, creating container targets when the
//!    operation allows auto-create
//!
//! [`Resolver::plan`] runs the same passes without touching the namespace
//! and reports the containers [`Resolver::resolve`] would create.

mod plan;

pub use plan::PlannedContainer;

use futures::future::join_all;

use crate::endpoint::{Endpoint, PathClassifier};
use crate::errors::{ResolveError, ResolveResult};
use crate::namespace::Namespaces;
use crate::operation::{OperationKind, Policy};
use crate::path::{ExistenceState, PathDescriptor, PathKind, PathSet, PathStat, Side};
use crate::pathname;
use plan::Creations;

/// Where targets land relative to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    /// `destination/basename(source)`. `fresh` when this run made (or
    /// planned) the destination, so nothing below it exists yet.
    Nested { fresh: bool },
    /// The destination path itself, with its status if it exists.
    Literal { existing: Option<PathStat> },
}

pub struct Resolver<'a> {
    namespaces: Namespaces<'a>,
    classifier: PathClassifier,
}

impl<'a> Resolver<'a> {
    pub fn new(namespaces: Namespaces<'a>, classifier: PathClassifier) -> Self {
        Self {
            namespaces,
            classifier,
        }
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Resolves every target of `set` for `kind`, creating destination
    /// containers where the operation's policy allows it.
    ///
    /// Any state left by an earlier call is cleared first. On error the set
    /// stays partially populated and `resolved` is false.
    pub async fn resolve(&self, set: &mut PathSet, kind: OperationKind) -> ResolveResult<()> {
        set.reset();
        let created = self.run(set, kind, false).await?;
        set.resolved = true;
        log::debug!(
            "{kind}: resolved {} target(s), created {} container(s)",
            set.len(),
            created.len()
        );
        Ok(())
    }

    /// Dry run of [`Resolver::resolve`]. Targets are filled in but nothing
    /// is created and `resolved` stays false. Returns the containers a real
    /// run would create, in creation order.
    pub async fn plan(
        &self,
        set: &mut PathSet,
        kind: OperationKind,
    ) -> ResolveResult<Vec<PlannedContainer>> {
        set.reset();
        self.run(set, kind, true).await
    }

    async fn run(
        &self,
        set: &mut PathSet,
        kind: OperationKind,
        dry_run: bool,
    ) -> ResolveResult<Vec<PlannedContainer>> {
        let policy = kind.policy();
        log::debug!(
            "{kind}: resolving {} source(s) against {}",
            set.len(),
            if set.destination_given() {
                set.destination.given_path.as_str()
            } else {
                "the working directory"
            }
        );

        let sources = self.classify_sources(set, policy).await?;
        let source_side = sources.first().map(|ep| ep.side).ok_or(ResolveError::NoSources)?;
        let destination = self.classify_destination(set, policy, source_side)?;
        let mut creations = Creations::new(self.namespaces.for_side(destination.side), dry_run);

        if destination.is_stdout() {
            resolve_stdout(set)?;
            return Ok(creations.into_planned());
        }

        let placement = self
            .place_destination(set, policy, &destination, &mut creations)
            .await?;
        set.destination.resolved_path = destination.path.clone();
        self.fill_targets(set, policy, &sources, &destination, &placement, &mut creations)
            .await?;
        Ok(creations.into_planned())
    }

    async fn classify_sources(
        &self,
        set: &mut PathSet,
        policy: Policy,
    ) -> ResolveResult<Vec<Endpoint>> {
        let endpoints = set
            .sources()
            .map(|source| {
                let endpoint = self
                    .classifier
                    .classify(&source.given_path, policy.source_side)?;
                if endpoint.is_stdout() {
                    return Err(ResolveError::AmbiguousKind {
                        path: source.given_path.clone(),
                        reason: "standard output cannot be a source",
                    });
                }
                Ok(endpoint)
            })
            .collect::<ResolveResult<Vec<_>>>()?;

        if let Some(first) = endpoints.first() {
            if let Some(other) = endpoints.iter().find(|ep| ep.side != first.side) {
                return Err(ResolveError::MixedSourceSides {
                    first: first.path.clone(),
                    other: other.path.clone(),
                });
            }
        }

        let stats = join_all(endpoints.iter().map(|ep| self.stat(ep.side, &ep.path))).await;
        for ((pair, endpoint), stat) in set.pairs_mut().iter_mut().zip(&endpoints).zip(stats) {
            let stat = stat?;
            pair.source.apply_stat(endpoint.side, stat.as_ref());
            if stat.is_none() {
                return Err(ResolveError::SourceNotFound {
                    path: pair.source.given_path.clone(),
                });
            }
            pair.source.resolved_path = endpoint.path.clone();
        }
        Ok(endpoints)
    }

    fn classify_destination(
        &self,
        set: &mut PathSet,
        policy: Policy,
        source_side: Side,
    ) -> ResolveResult<Endpoint> {
        if !set.destination.is_no_input() {
            return self
                .classifier
                .classify(&set.destination.given_path, policy.destination_side);
        }

        let side = policy
            .destination_side
            .fixed()
            .unwrap_or(match source_side {
                Side::Local => Side::Remote,
                Side::Remote => Side::Local,
            });
        let cwd = self.classifier.working_dir(side)?;
        log::debug!("no destination given, using {} working directory {cwd}", side.as_str());
        set.destination = PathDescriptor::new(cwd.clone());
        Ok(Endpoint {
            side,
            basename: pathname::basename(&cwd).to_string(),
            path: cwd,
        })
    }

    async fn place_destination(
        &self,
        set: &mut PathSet,
        policy: Policy,
        destination: &Endpoint,
        creations: &mut Creations<'_>,
    ) -> ResolveResult<Placement> {
        let side = destination.side;
        let stat = self.stat(side, &destination.path).await?;
        set.destination.apply_stat(side, stat.as_ref());

        let multi = set.is_multi_source();
        let container_source = !multi && set.sources().any(|source| source.kind.is_container());

        match stat {
            Some(stat) if stat.kind.is_container() => {
                if !multi && container_source && !policy.nest_single_source_under_existing_container {
                    Ok(Placement::Literal {
                        existing: Some(stat),
                    })
                } else {
                    Ok(Placement::Nested { fresh: false })
                }
            }
            Some(stat) => {
                if multi {
                    Err(ResolveError::DestinationMustBeContainer {
                        path: destination.path.clone(),
                        reason: "multiple sources",
                    })
                } else if container_source {
                    Err(ResolveError::DestinationMustBeContainer {
                        path: destination.path.clone(),
                        reason: "source is a container",
                    })
                } else {
                    Ok(Placement::Literal {
                        existing: Some(stat),
                    })
                }
            }
            None => {
                let parent_is_container = match pathname::parent(&destination.path) {
                    Some(parent) => self
                        .stat(side, parent)
                        .await?
                        .is_some_and(|parent| parent.kind.is_container()),
                    None => false,
                };
                if !parent_is_container {
                    return Err(missing_destination(side, &destination.path));
                }
                if !multi {
                    return Ok(Placement::Literal { existing: None });
                }
                if policy.requires_existing_container_for_multi_source
                    || !policy.allow_autocreate_destination
                {
                    return Err(missing_destination(side, &destination.path));
                }
                let created = creations.create(&destination.path).await?;
                set.destination.kind = PathKind::container_on(side);
                if created {
                    set.destination.state = ExistenceState::Exist;
                }
                Ok(Placement::Nested { fresh: true })
            }
        }
    }

    async fn fill_targets(
        &self,
        set: &mut PathSet,
        policy: Policy,
        sources: &[Endpoint],
        destination: &Endpoint,
        placement: &Placement,
        creations: &mut Creations<'_>,
    ) -> ResolveResult<()> {
        let side = destination.side;
        for (pair, source) in set.pairs_mut().iter_mut().zip(sources) {
            let kind = pair.source.kind.target_on(side);
            let (path, stat) = match placement {
                Placement::Literal { existing } => (destination.path.clone(), existing.clone()),
                Placement::Nested { fresh } => {
                    if source.basename.is_empty() {
                        return Err(ResolveError::AmbiguousKind {
                            path: pair.source.given_path.clone(),
                            reason: "source has no name to place under the destination",
                        });
                    }
                    let path = pathname::join(&destination.path, &source.basename);
                    let stat = if *fresh {
                        None
                    } else {
                        self.stat(side, &path).await?
                    };
                    (path, stat)
                }
            };

            let target = &mut pair.target;
            *target = PathDescriptor::new(path.clone());
            target.apply_stat(side, stat.as_ref());
            target.kind = kind;

            if policy.allow_autocreate_destination
                && kind.is_container()
                && !target.exists()
                && creations.create(&path).await?
            {
                target.state = ExistenceState::Exist;
            }
            target.resolved_path = path;
        }
        Ok(())
    }

    async fn stat(&self, side: Side, path: &str) -> ResolveResult<Option<PathStat>> {
        log::debug!("stat {} {path}", side.as_str());
        self.namespaces
            .for_side(side)
            .stat(path)
            .await
            .map_err(|source| ResolveError::StatFailed {
                path: path.to_string(),
                source,
            })
    }
}

/// `-` as destination: one leaf streamed to standard output.
fn resolve_stdout(set: &mut PathSet) -> ResolveResult<()> {
    let single_leaf = !set.is_multi_source() && set.sources().all(|source| source.kind.is_leaf());
    if !single_leaf {
        return Err(ResolveError::DestinationMustBeContainer {
            path: crate::endpoint::STDOUT_PATH.to_string(),
            reason: "standard output takes a single object",
        });
    }
    let stdout = PathDescriptor {
        kind: PathKind::LocalFile,
        state: ExistenceState::Exist,
        given_path: crate::endpoint::STDOUT_PATH.to_string(),
        resolved_path: crate::endpoint::STDOUT_PATH.to_string(),
        ..PathDescriptor::default()
    };
    set.destination = stdout.clone();
    for pair in set.pairs_mut() {
        pair.target = stdout.clone();
    }
    Ok(())
}

fn missing_destination(side: Side, path: &str) -> ResolveError {
    match side {
        Side::Remote => ResolveError::UnknownDestinationContainer {
            path: path.to_string(),
        },
        Side::Local => ResolveError::FileDoesNotExist {
            path: path.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::InMemoryNamespace;

    fn classifier() -> PathClassifier {
        PathClassifier::new("/work")
            .with_zone("z")
            .with_home("/z/home/u")
            .with_remote_cwd("/z/home/u")
    }

    #[tokio::test]
    async fn stdout_destination_takes_one_object() -> ResolveResult<()> {
        let local = InMemoryNamespace::local().with_container("/work");
        let remote = InMemoryNamespace::remote()
            .with_object("/z/home/u/obj", 3)
            .with_container("/z/home/u/coll");
        let resolver = Resolver::new(Namespaces::new(&local, &remote), classifier());

        let mut set = PathSet::new(["obj"], Some("-"))?;
        resolver.resolve(&mut set, OperationKind::Get).await?;
        let target = set.target(0).expect("target");
        assert_eq!(target.resolved_path, "-");
        assert_eq!(target.kind, PathKind::LocalFile);
        assert!(target.exists());

        let mut set = PathSet::new(["coll"], Some("-"))?;
        let err = resolver.resolve(&mut set, OperationKind::Get).await.unwrap_err();
        assert!(matches!(err, ResolveError::DestinationMustBeContainer { .. }));
        assert!(!set.resolved);
        Ok(())
    }

    #[tokio::test]
    async fn sources_on_both_sides_are_rejected() -> ResolveResult<()> {
        let local = InMemoryNamespace::local().with_object("/work/f", 1);
        let remote = InMemoryNamespace::remote().with_object("/z/o", 1);
        let resolver = Resolver::new(Namespaces::new(&local, &remote), classifier());

        let mut set = PathSet::new(["/work/f", "i:/z/o"], Some("/z/dest"))?;
        let err = resolver
            .resolve(&mut set, OperationKind::Synchronize)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::MixedSourceSides { .. }));
        assert_eq!(local.stat_calls() + remote.stat_calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_destination_defaults_to_working_directory() -> ResolveResult<()> {
        let local = InMemoryNamespace::local().with_container("/work");
        let remote = InMemoryNamespace::remote().with_object("/z/home/u/obj", 3);
        let resolver = Resolver::new(Namespaces::new(&local, &remote), classifier());

        let mut set = PathSet::new(["obj"], None)?;
        resolver.resolve(&mut set, OperationKind::Get).await?;
        assert_eq!(set.destination.resolved_path, "/work");
        assert_eq!(set.target(0).expect("target").resolved_path, "/work/obj");

        // A second run starts from the caller's input again.
        resolver.resolve(&mut set, OperationKind::Get).await?;
        assert!(set.resolved);
        assert_eq!(set.target(0).expect("target").resolved_path, "/work/obj");
        Ok(())
    }

    #[tokio::test]
    async fn first_missing_source_is_reported() -> ResolveResult<()> {
        let local = InMemoryNamespace::local();
        let remote = InMemoryNamespace::remote()
            .with_object("/z/a", 1)
            .with_container("/z/dest");
        let resolver = Resolver::new(Namespaces::new(&local, &remote), classifier());

        let mut set = PathSet::new(["/z/a", "/z/b", "/z/c"], Some("/z/dest"))?;
        let err = resolver
            .resolve(&mut set, OperationKind::CopyDest)
            .await
            .unwrap_err();
        match err {
            ResolveError::SourceNotFound { path } => assert_eq!(path, "/z/b"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(set.source(0).expect("source").is_resolved());
        assert!(!set.source(1).expect("source").is_resolved());
        Ok(())
    }
}
