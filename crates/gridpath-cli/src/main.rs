mod cli;
mod context;
mod inspect;
mod logging;
mod report;
mod resolve;

use clap::Parser;
use eyre::Result;
use gridpath_core::ResolveError;

use crate::cli::{Cli, Commands};
use crate::context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match run(&cli).await {
        Ok(()) => Ok(()),
        Err(report) => match report.downcast_ref::<ResolveError>() {
            Some(err) => {
                eprintln!("gridpath: {} [{}]: {err}", err.category().as_str(), err.code());
                let mut source = std::error::Error::source(err);
                while let Some(cause) = source {
                    eprintln!("  caused by: {cause}");
                    source = cause.source();
                }
                std::process::exit(err.exit_code());
            }
            None => Err(report),
        },
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Resolve(args) => {
            let ctx = AppContext::load(cli)?;
            resolve::run_resolve(&ctx, args).await
        }
        Commands::Stat(args) => {
            let ctx = AppContext::load(cli)?;
            inspect::run_stat(&ctx, args).await
        }
        Commands::Operations(args) => inspect::run_operations(args),
    }
}
