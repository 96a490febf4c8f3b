// nullwalk: a path-sensitive symbolic executor for a single procedure's
// control-flow graph, flagging possible null dereferences and
// tautological branch conditions.

#![allow(dead_code)]

use anyhow::Result;
use clap::Parser;

mod cfg;
mod cli;
mod output;
mod platform;
mod se;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    run_command(cli)
}

fn run_command(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Check(args) => cli::cmds::check(args, &cli),
        Commands::Explain => cli::cmds::explain(&cli),
    }
}
