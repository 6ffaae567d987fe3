//! `dtup2bin`: DTUP file to raw payload binary.

use anyhow::Context;
use clap::Parser;
use dtup_tools::{cli::Cli, convert};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    convert(&cli.source, &cli.destination, &cli.decode_config()).with_context(|| {
        format!("converting {} to {}", cli.source.display(), cli.destination.display())
    })?;

    Ok(())
}
