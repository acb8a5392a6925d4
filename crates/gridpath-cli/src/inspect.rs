use eyre::{bail, Result};
use gridpath_core::{
    EndpointRule, LocalNamespace, Namespaces, OperationKind, PathDescriptor, Policy,
    ResolveError, Side,
};
use serde::Serialize;

use crate::cli::{OperationsArgs, StatArgs};
use crate::context::AppContext;
use crate::report::describe;

#[derive(Serialize)]
struct StatReport<'a> {
    side: Side,
    #[serde(flatten)]
    descriptor: &'a PathDescriptor,
}

pub async fn run_stat(ctx: &AppContext, args: &StatArgs) -> Result<()> {
    let rule = if args.local {
        EndpointRule::Local
    } else if args.remote {
        EndpointRule::Remote
    } else {
        EndpointRule::Either
    };
    let endpoint = ctx.classifier().classify(&args.path, rule)?;
    if endpoint.is_stdout() {
        bail!("'-' names standard output, not a path");
    }

    let local = LocalNamespace::new();
    let catalog = ctx.catalog();
    let namespaces = Namespaces::new(&local, &catalog);
    let stat = namespaces
        .for_side(endpoint.side)
        .stat(&endpoint.path)
        .await
        .map_err(|source| ResolveError::StatFailed {
            path: endpoint.path.clone(),
            source,
        })?;

    let mut descriptor = PathDescriptor::new(args.path.clone());
    descriptor.apply_stat(endpoint.side, stat.as_ref());
    descriptor.resolved_path = endpoint.path;

    if args.json {
        let report = StatReport {
            side: endpoint.side,
            descriptor: &descriptor,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} [{}]: {}",
            descriptor.resolved_path,
            endpoint.side.as_str(),
            describe(&descriptor)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct OperationRow {
    name: &'static str,
    code: i32,
    policy: Policy,
}

pub fn run_operations(args: &OperationsArgs) -> Result<()> {
    let rows: Vec<OperationRow> = OperationKind::ALL
        .into_iter()
        .map(|kind| OperationRow {
            name: kind.name(),
            code: kind.code(),
            policy: kind.policy(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:>4}  {:<26} {:<16} {:<10} {:<10} NEST",
        "CODE", "NAME", "SIDES", "AUTOCREATE", "MULTI-DIR"
    );
    for row in &rows {
        println!(
            "{:>4}  {:<26} {:<16} {:<10} {:<10} {}",
            row.code,
            row.name,
            format!(
                "{} -> {}",
                rule_label(row.policy.source_side),
                rule_label(row.policy.destination_side)
            ),
            yes_no(row.policy.allow_autocreate_destination),
            if row.policy.requires_existing_container_for_multi_source {
                "required"
            } else {
                "-"
            },
            yes_no(row.policy.nest_single_source_under_existing_container),
        );
    }
    Ok(())
}

fn rule_label(rule: EndpointRule) -> &'static str {
    match rule {
        EndpointRule::Local => "local",
        EndpointRule::Remote => "remote",
        EndpointRule::Either => "either",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
