use pcgp::{
    cli::{CliArgs, Cmd},
    drivers,
};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match args.command {
        Some(Cmd::Worker {
            ref buffer,
            len,
            iterations,
        }) => drivers::process::worker(buffer, len, iterations)
            .with_context(|| format!("worker on `{}` failed", buffer.display())),
        None => drivers::run(&args).context("benchmark failed"),
    }
}
