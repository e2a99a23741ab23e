//! CLI entry point for ringmap.

use clap::Parser;
use ringmap_cli::CliConfig;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    config.run()
}
