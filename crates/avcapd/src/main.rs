mod cli;
mod devices;
mod runtime;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,avcapd=info")))
        .init();

    let args = cli::Args::parse();
    runtime::run(args)
}
