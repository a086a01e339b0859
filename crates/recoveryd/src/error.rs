//! Error types for mount-group coordination.

use quorumfs_control::ControlField;
use thiserror::Error;

/// Result type for coordination operations.
pub type Result<T> = std::result::Result<T, Error>;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for mount-group coordination.
#[derive(Debug, Error)]
pub enum Error {
    /// A group with this name is already mounted.
    #[error("mount group {0} is already mounted")]
    AlreadyMounted(String),

    /// An event referenced a group this node never mounted. The external
    /// service should never deliver such an event; it is logged and has
    /// no side effects.
    #[error("{event}: unknown mount group {group}")]
    UnknownGroup {
        /// The event that referenced the group.
        event: &'static str,
        /// The unknown group name.
        group: String,
    },

    /// The mounted filesystem records a different cluster than the local
    /// node belongs to.
    #[error("different cluster names: fs={fs} cluster={cluster}")]
    ClusterMismatch {
        /// Cluster name recorded by the filesystem.
        fs: String,
        /// The local cluster name.
        cluster: String,
    },

    /// A non-spectator mount was attempted without fencing-domain
    /// membership.
    #[error("not in fence domain {0}")]
    NotInFenceDomain(String),

    /// A kernel control read or write failed.
    #[error("{op}: {source}")]
    Control {
        /// What the control access was for.
        op: &'static str,
        /// The underlying control error.
        #[source]
        source: Source,
    },

    /// A group-service call failed.
    #[error("{op}: {source}")]
    Group {
        /// What the group-service call was for.
        op: &'static str,
        /// The underlying group-service error.
        #[source]
        source: Source,
    },

    /// A control value could not be parsed.
    #[error("invalid {field} value {value:?}")]
    InvalidControlValue {
        /// The control field read.
        field: ControlField,
        /// The raw value.
        value: String,
    },
}

impl Error {
    pub(crate) fn control(
        op: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Control {
            op,
            source: Box::new(source),
        }
    }

    pub(crate) fn group(
        op: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Group {
            op,
            source: Box::new(source),
        }
    }
}
