pub mod config;
pub mod endpoint;
pub mod errors;
pub mod namespace;
pub mod operation;
pub mod path;
pub mod pathname;
pub mod resolver;

pub use endpoint::{Endpoint, PathClassifier};
pub use errors::{ErrorCategory, ResolveError, ResolveResult};
pub use namespace::{DirectoryCatalog, InMemoryNamespace, LocalNamespace, Namespace, Namespaces};
pub use operation::{EndpointRule, OperationKind, Policy};
pub use path::{ExistenceState, PathDescriptor, PathKind, PathPair, PathSet, PathStat, Side};
pub use resolver::{PlannedContainer, Resolver};
