use clap::{ArgAction, Args, Parser, Subcommand};
use gridpath_core::OperationKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridpath")]
#[command(about = "Work out where each source of a grid transfer will land")]
#[command(after_help = "Run '<command> --help' for detailed options on each command.")]
pub struct Cli {
    /// Override the configuration directory for this invocation
    #[arg(long, global = true, value_name = "PATH")]
    pub config_dir: Option<PathBuf>,
    /// Serve a zone from a local directory (repeatable)
    #[arg(long = "zone", global = true, value_name = "NAME=DIR", value_parser = parse_zone)]
    pub zones: Vec<(String, PathBuf)>,
    /// Remote working collection that relative remote paths join
    #[arg(long, global = true, value_name = "COLLECTION")]
    pub cwd: Option<String>,
    /// Home collection that `~` expands to
    #[arg(long, global = true, value_name = "COLLECTION")]
    pub home: Option<String>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the target path of every source for an operation
    Resolve(ResolveArgs),
    /// Show what a single path refers to
    Stat(StatArgs),
    /// List the operation kinds and their resolution policy
    Operations(OperationsArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ResolveArgs {
    /// Operation kind (put, get, copy, move, rsync, ...)
    pub operation: OperationKind,
    /// Source paths followed by the destination; a single path is a source
    /// resolved against the working directory
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<String>,
    /// Report the containers that would be created without creating them
    #[arg(long)]
    pub dry_run: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone, Debug)]
pub struct StatArgs {
    /// Path to look up; `i:` or a configured zone root marks it remote
    pub path: String,
    /// Treat the path as local
    #[arg(long, conflicts_with = "remote")]
    pub local: bool,
    /// Treat the path as remote
    #[arg(long)]
    pub remote: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone, Debug)]
pub struct OperationsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_zone(raw: &str) -> Result<(String, PathBuf), String> {
    let (name, dir) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=DIR, got '{raw}'"))?;
    let name = name.trim().trim_matches('/');
    if name.is_empty() || name.contains('/') {
        return Err(format!("invalid zone name in '{raw}'"));
    }
    if dir.is_empty() {
        return Err(format!("missing directory in '{raw}'"));
    }
    Ok((name.to_string(), PathBuf::from(dir)))
}
