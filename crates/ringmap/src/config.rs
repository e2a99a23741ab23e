//! Ring configuration.
//!
//! A [`RingConfig`] can be deserialized from any serde format; missing fields
//! take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::placement::MAX_NODE_WEIGHT;

/// Default number of physical nodes on a fresh ring.
pub const DEFAULT_INITIAL_NODES: usize = 3;

/// Default vnodes per physical node.
pub const DEFAULT_NODE_WEIGHT: usize = 256;

/// Shape of a ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Physical nodes created at construction, auto-named `node-<i>`.
    pub initial_nodes: usize,
    /// Vnodes per physical node; fixed for the lifetime of the ring.
    pub node_weight: usize,
    /// Seed for vnode placement. `None` draws from OS randomness.
    pub seed: Option<u64>,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            initial_nodes: DEFAULT_INITIAL_NODES,
            node_weight: DEFAULT_NODE_WEIGHT,
            seed: None,
        }
    }
}

impl RingConfig {
    /// Check that the configuration describes a non-empty ring.
    pub fn validate(&self) -> Result<()> {
        if self.initial_nodes == 0 {
            return Err(Error::InvalidConfig(
                "initial_nodes must be at least 1".to_string(),
            ));
        }
        validate_node_weight(self.node_weight)
    }
}

/// Node weight must be in `1..=MAX_NODE_WEIGHT`.
pub fn validate_node_weight(node_weight: usize) -> Result<()> {
    if node_weight == 0 || node_weight > MAX_NODE_WEIGHT {
        return Err(Error::InvalidConfig(format!(
            "node_weight must be in 1..={MAX_NODE_WEIGHT}, got {node_weight}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.node_weight, 256);
    }

    #[test]
    fn test_rejects_zero_weight() {
        let config = RingConfig {
            node_weight: 0,
            ..RingConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_huge_weight() {
        assert!(validate_node_weight(MAX_NODE_WEIGHT).is_ok());
        assert!(validate_node_weight(MAX_NODE_WEIGHT + 1).is_err());
    }

    #[test]
    fn test_rejects_empty_ring() {
        let config = RingConfig {
            initial_nodes: 0,
            ..RingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
