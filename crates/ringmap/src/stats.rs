//! Distribution statistics.
//!
//! Balance is reported as relative standard deviation: population standard
//! deviation as a percentage of the mean.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::angle::TURN;
use crate::map::RingMap;

/// Population standard deviation × 100 / |mean|.
///
/// Returns 0.0 for an empty slice or a zero mean.
pub fn relative_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() * 100.0 / mean.abs()
}

/// Load on one physical node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStats {
    pub keys: usize,
    pub vnodes: usize,
    /// Fraction of the ring owned, in `[0, 1]`.
    pub arc_share: f64,
}

/// Snapshot of how keys and arcs are spread over a ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingStats {
    pub keys: usize,
    pub vnodes: usize,
    pub nodes: BTreeMap<String, NodeStats>,
    /// RSD of key counts across physical nodes.
    pub key_rsd: f64,
    /// RSD of owned arc length across physical nodes.
    pub node_arc_rsd: f64,
    /// RSD of arc length across vnodes.
    pub vnode_arc_rsd: f64,
}

impl RingStats {
    pub fn collect<K, V, H>(map: &RingMap<K, V, H>) -> Self {
        let arcs = map.arcs();
        let mut nodes: BTreeMap<String, NodeStats> = map
            .node_names()
            .map(|name| {
                let stats = NodeStats {
                    keys: 0,
                    vnodes: 0,
                    arc_share: 0.0,
                };
                (name.to_string(), stats)
            })
            .collect();

        let mut widths = Vec::with_capacity(arcs.len());
        for arc in &arcs {
            let width = arc.width() as f64 / TURN as f64;
            widths.push(width);
            if let Some(node) = nodes.get_mut(&arc.owner) {
                node.keys += arc.keys;
                node.vnodes += 1;
                node.arc_share += width;
            }
        }

        let keys: Vec<f64> = nodes.values().map(|n| n.keys as f64).collect();
        let shares: Vec<f64> = nodes.values().map(|n| n.arc_share).collect();
        Self {
            keys: map.len(),
            vnodes: arcs.len(),
            key_rsd: relative_std_dev(&keys),
            node_arc_rsd: relative_std_dev(&shares),
            vnode_arc_rsd: relative_std_dev(&widths),
            nodes,
        }
    }

    /// Emit the snapshot at info level, one line per node.
    pub fn log(&self) {
        info!(
            keys = self.keys,
            nodes = self.nodes.len(),
            vnodes = self.vnodes,
            key_rsd = format_args!("{:.3}%", self.key_rsd),
            node_arc_rsd = format_args!("{:.3}%", self.node_arc_rsd),
            vnode_arc_rsd = format_args!("{:.3}%", self.vnode_arc_rsd),
            "ring distribution"
        );
        for (name, node) in &self.nodes {
            info!(
                node = %name,
                keys = node.keys,
                vnodes = node.vnodes,
                arc_share = format_args!("{:.4}", node.arc_share),
                "node load"
            );
        }
    }
}
