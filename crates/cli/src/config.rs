//! Top-level CLI options, logging setup and ring config loading.

use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use ringmap::RingConfig;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

/// Consistent-hashing ring simulator.
#[derive(Debug, Parser)]
#[command(name = "ringmap", version)]
pub struct CliConfig {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        init_tracing(&self.log_level);
        let result = self.command.execute()?;
        println!("{result}");
        Ok(())
    }
}

/// Install a `fmt` subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // a second install (tests) is harmless
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Read a JSON ring config, or the defaults when no path is given.
pub fn load_ring_config(path: Option<&Path>) -> anyhow::Result<RingConfig> {
    let Some(path) = path else {
        return Ok(RingConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}
