use eyre::Result;
use gridpath_core::{
    LocalNamespace, Namespaces, OperationKind, PathDescriptor, PathPair, PathSet,
    PlannedContainer, Resolver,
};
use serde::Serialize;

use crate::cli::ResolveArgs;
use crate::context::AppContext;
use crate::report::{describe, display_path};

#[derive(Serialize)]
struct ResolveReport<'a> {
    operation: OperationKind,
    code: i32,
    dry_run: bool,
    resolved: bool,
    destination: &'a PathDescriptor,
    pairs: &'a [PathPair],
    #[serde(skip_serializing_if = "Option::is_none")]
    planned: Option<&'a [PlannedContainer]>,
}

pub async fn run_resolve(ctx: &AppContext, args: &ResolveArgs) -> Result<()> {
    let mut set = PathSet::from_args(&args.paths)?;
    let local = LocalNamespace::new();
    let catalog = ctx.catalog();
    if catalog.is_empty() {
        log::warn!("no zone directories configured; remote paths will appear missing");
    }
    let resolver = Resolver::new(Namespaces::new(&local, &catalog), ctx.classifier());

    let planned = if args.dry_run {
        Some(resolver.plan(&mut set, args.operation).await?)
    } else {
        resolver.resolve(&mut set, args.operation).await?;
        None
    };

    if args.json {
        let report = ResolveReport {
            operation: args.operation,
            code: args.operation.code(),
            dry_run: args.dry_run,
            resolved: set.resolved,
            destination: &set.destination,
            pairs: set.pairs(),
            planned: planned.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_text(args.operation, &set, planned.as_deref());
    Ok(())
}

fn print_text(operation: OperationKind, set: &PathSet, planned: Option<&[PlannedContainer]>) {
    println!(
        "{operation}: {} source(s) -> {} ({})",
        set.len(),
        display_path(&set.destination),
        describe(&set.destination)
    );
    for pair in set.pairs() {
        println!(
            "  {} -> {} ({})",
            display_path(&pair.source),
            display_path(&pair.target),
            describe(&pair.target)
        );
    }
    if let Some(planned) = planned {
        if planned.is_empty() {
            println!("dry run: no containers would be created");
        }
        for container in planned {
            println!(
                "dry run: would create {} container {}",
                container.side.as_str(),
                container.path
            );
        }
    }
}
