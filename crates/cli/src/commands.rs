//! CLI subcommands.

use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ringmap::{RingConfig, RingMap, RingStats};
use tracing::info;

use crate::config::load_ring_config;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load random keys, grow the ring, then shrink it, checking invariants
    /// after every step.
    Simulate(SimulateArgs),
    /// Print every vnode with its owner, angle and key count.
    Layout(LayoutArgs),
}

/// Ring shape, from an optional JSON config file with flag overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct RingArgs {
    /// JSON ring config (`initial_nodes`, `node_weight`, `seed`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Initial physical nodes.
    #[arg(long)]
    pub nodes: Option<usize>,

    /// Vnodes per physical node.
    #[arg(long)]
    pub weight: Option<usize>,

    /// Placement and key seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl RingArgs {
    pub fn resolve(&self) -> anyhow::Result<RingConfig> {
        let mut config = load_ring_config(self.config.as_deref())?;
        if let Some(nodes) = self.nodes {
            config.initial_nodes = nodes;
        }
        if let Some(weight) = self.weight {
            config.node_weight = weight;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub ring: RingArgs,

    /// Random keys to insert.
    #[arg(long, default_value_t = 100_000)]
    pub keys: usize,

    /// Nodes to add after loading.
    #[arg(long, default_value_t = 2)]
    pub add: usize,

    /// Remove the owners of the first and last vnodes afterwards.
    #[arg(long)]
    pub remove_edges: bool,
}

#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub ring: RingArgs,

    /// Random keys to insert before printing.
    #[arg(long, default_value_t = 0)]
    pub keys: usize,
}

/// Lines printed once a command finishes.
#[derive(Debug, Clone, Default)]
pub struct CommandResult {
    pub lines: Vec<String>,
}

impl CommandResult {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl Command {
    pub fn execute(&self) -> anyhow::Result<CommandResult> {
        match self {
            Command::Simulate(args) => simulate(args),
            Command::Layout(args) => layout(args),
        }
    }
}

fn key_rng(config: &RingConfig) -> StdRng {
    match config.seed {
        // keys and placement must not share a stream
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    }
}

fn load(map: &mut RingMap<u64, u64>, rng: &mut StdRng, count: usize) -> anyhow::Result<()> {
    for i in 0..count {
        map.put(rng.random(), i as u64)?;
    }
    Ok(())
}

fn checkpoint(map: &RingMap<u64, u64>, step: &str, out: &mut CommandResult) -> anyhow::Result<()> {
    map.verify().with_context(|| format!("ring inconsistent after {step}"))?;
    let stats = RingStats::collect(map);
    info!(step, "checkpoint");
    stats.log();
    out.push(format!(
        "{step:<12} keys={} nodes={} vnodes={} key_rsd={:.3}% arc_rsd={:.3}%",
        stats.keys,
        stats.nodes.len(),
        stats.vnodes,
        stats.key_rsd,
        stats.node_arc_rsd
    ));
    Ok(())
}

fn simulate(args: &SimulateArgs) -> anyhow::Result<CommandResult> {
    let config = args.ring.resolve()?;
    let mut rng = key_rng(&config);
    let mut map: RingMap<u64, u64> = RingMap::from_config(&config)?;
    let mut out = CommandResult::default();

    load(&mut map, &mut rng, args.keys)?;
    checkpoint(&map, "load", &mut out)?;
    let size = map.len();

    if args.add > 0 {
        let report = map.add_nodes(args.add)?;
        out.push(format!(
            "added {:?}, moved {} keys ({:.3}%)",
            report.nodes,
            report.moved,
            report.moved_fraction() * 100.0
        ));
        checkpoint(&map, "add", &mut out)?;
    }

    if args.remove_edges {
        for edge in ["first", "last"] {
            let vnode = match edge {
                "first" => map.first_vnode(),
                _ => map.last_vnode(),
            };
            let Some(owner) = vnode.map(|v| v.owner().to_string()) else {
                break;
            };
            match map.remove_node(&owner) {
                Ok(Some(report)) => out.push(format!(
                    "removed {owner} ({edge} vnode), moved {} keys",
                    report.moved
                )),
                Ok(None) => {}
                Err(err) => {
                    out.push(format!("kept {owner}: {err}"));
                    continue;
                }
            }
            checkpoint(&map, &format!("remove-{edge}"), &mut out)?;
        }
    }

    anyhow::ensure!(
        map.len() == size,
        "size changed from {size} to {}",
        map.len()
    );
    Ok(out)
}

fn layout(args: &LayoutArgs) -> anyhow::Result<CommandResult> {
    let config = args.ring.resolve()?;
    let mut rng = key_rng(&config);
    let mut map: RingMap<u64, u64> = RingMap::from_config(&config)?;
    load(&mut map, &mut rng, args.keys)?;

    let mut out = CommandResult::default();
    for arc in map.arcs() {
        out.push(format!(
            "{:<16} {:<10} {:>14.9}° {:>8}",
            arc.vnode,
            arc.owner,
            arc.end.degrees(),
            arc.keys
        ));
    }
    Ok(out)
}
