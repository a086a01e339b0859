//! Coordinator configuration.

use quorumfs_groups::NodeId;
use serde::{Deserialize, Serialize};

/// Fencing domain non-spectator mounts belong to unless configured
/// otherwise.
pub const DEFAULT_FENCE_DOMAIN: &str = "default";

/// Configuration for a [`crate::MountGroupCoordinator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Name of the cluster this node belongs to. Mounts are rejected when
    /// the filesystem records a different cluster.
    pub cluster_name: String,

    /// This node's cluster id.
    pub node_id: NodeId,

    /// Fencing domain a non-spectator mount must be a member of.
    pub fence_domain: String,
}

impl CoordinatorConfig {
    /// Creates a configuration with the default fencing domain.
    pub fn new(cluster_name: impl Into<String>, node_id: NodeId) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            node_id,
            fence_domain: DEFAULT_FENCE_DOMAIN.to_string(),
        }
    }
}
