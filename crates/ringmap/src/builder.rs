//! Builder for [`RingMap`].

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{validate_node_weight, RingConfig, DEFAULT_NODE_WEIGHT};
use crate::error::Result;
use crate::hasher::Xxh3KeyHasher;
use crate::map::RingMap;
use crate::placement::AngleSource;

/// Builds a [`RingMap`] step by step.
///
/// # Example
///
/// ```rust
/// use ringmap::{RingMap, RingMapBuilder};
///
/// let map: RingMap<String, u32> = RingMapBuilder::new()
///     .with_node_weight(8)
///     .add_node("cache-a")
///     .add_node("cache-b")
///     .with_seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(map.vnode_count(), 16);
/// ```
pub struct RingMapBuilder<H = Xxh3KeyHasher> {
    node_weight: usize,
    initial_nodes: usize,
    names: Vec<String>,
    seed: Option<u64>,
    source: Option<Box<dyn AngleSource + Send>>,
    hasher: H,
}

impl Default for RingMapBuilder<Xxh3KeyHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl RingMapBuilder<Xxh3KeyHasher> {
    /// Start with no nodes, the default weight and the xxh3 key hasher.
    pub fn new() -> Self {
        Self {
            node_weight: DEFAULT_NODE_WEIGHT,
            initial_nodes: 0,
            names: Vec::new(),
            seed: None,
            source: None,
            hasher: Xxh3KeyHasher,
        }
    }

    /// Start from a configuration.
    pub fn from_config(config: &RingConfig) -> Self {
        let builder = Self::new()
            .with_node_weight(config.node_weight)
            .with_initial_nodes(config.initial_nodes);
        match config.seed {
            Some(seed) => builder.with_seed(seed),
            None => builder,
        }
    }
}

impl<H> RingMapBuilder<H> {
    /// Set the number of vnodes per physical node.
    pub fn with_node_weight(mut self, node_weight: usize) -> Self {
        self.node_weight = node_weight;
        self
    }

    /// Add `count` auto-named physical nodes (`node-<i>`) at build time.
    pub fn with_initial_nodes(mut self, count: usize) -> Self {
        self.initial_nodes = count;
        self
    }

    /// Add a named physical node at build time. Named nodes are placed
    /// before auto-named ones.
    pub fn add_node(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Place vnodes with a `StdRng` seeded from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Place vnodes with a custom angle source. Takes precedence over a seed.
    pub fn with_angle_source(mut self, source: impl AngleSource + Send + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Hash keys with `hasher`.
    pub fn with_hasher<H2>(self, hasher: H2) -> RingMapBuilder<H2> {
        RingMapBuilder {
            node_weight: self.node_weight,
            initial_nodes: self.initial_nodes,
            names: self.names,
            seed: self.seed,
            source: self.source,
            hasher,
        }
    }

    /// Validate and place every initial node.
    pub fn build<K: Eq, V>(self) -> Result<RingMap<K, V, H>> {
        validate_node_weight(self.node_weight)?;
        let source: Box<dyn AngleSource + Send> = match (self.source, self.seed) {
            (Some(source), _) => source,
            (None, Some(seed)) => Box::new(StdRng::seed_from_u64(seed)),
            (None, None) => Box::new(StdRng::from_os_rng()),
        };
        RingMap::assemble(
            self.names,
            self.initial_nodes,
            self.node_weight,
            self.hasher,
            source,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_ring_builder_default() {
        let map: RingMap<String, u32> = RingMapBuilder::new()
            .add_node("node1")
            .add_node("node2")
            .with_seed(1)
            .build()
            .unwrap();
        assert_eq!(map.node_count(), 2);
        // Default is 256 vnodes per node
        assert_eq!(map.vnode_count(), 512);
    }

    #[test]
    fn test_ring_builder_mixed_nodes() {
        let map: RingMap<String, u32> = RingMapBuilder::new()
            .with_node_weight(4)
            .add_node("named")
            .with_initial_nodes(2)
            .with_seed(2)
            .build()
            .unwrap();
        let names: Vec<&str> = map.node_names().collect();
        assert_eq!(names, vec!["named", "node-0", "node-1"]);
        assert_eq!(map.vnode_count(), 12);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let build = || -> RingMap<String, u32> {
            RingMapBuilder::new()
                .with_node_weight(16)
                .with_initial_nodes(3)
                .with_seed(99)
                .build()
                .unwrap()
        };
        let a: Vec<_> = build().vnodes().map(|v| v.angle()).collect();
        let b: Vec<_> = build().vnodes().map(|v| v.angle()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_builder_rejects_empty() {
        let result: Result<RingMap<String, u32>> = RingMapBuilder::new().with_seed(3).build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_rejects_zero_weight() {
        let result: Result<RingMap<String, u32>> = RingMapBuilder::new()
            .with_initial_nodes(2)
            .with_node_weight(0)
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_rejects_duplicate_names() {
        let result: Result<RingMap<String, u32>> = RingMapBuilder::new()
            .add_node("x")
            .add_node("x")
            .with_seed(4)
            .build();
        assert_eq!(result.unwrap_err(), Error::NodeExists("x".to_string()));
    }
}
