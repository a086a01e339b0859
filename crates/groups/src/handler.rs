//! Callbacks the group service drives on each node.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::node_id::NodeId;
use crate::types::{EventNumber, StartType};

/// Receiver of totally-ordered membership events for named groups.
///
/// The service guarantees a single, globally consistent delivery order of
/// stop / start / finish events per group across all nodes; handlers are
/// invoked one event at a time with no concurrent reentry per group.
#[async_trait]
pub trait GroupEventHandler: Send + Sync {
    /// The error type for event handling.
    type Error: Debug + Send;

    /// The group must pause activity pending the next start or finish.
    async fn on_stop(&self, group: &str) -> Result<(), Self::Error>;

    /// A new membership snapshot for the group.
    async fn on_start(
        &self,
        group: &str,
        event: EventNumber,
        start_type: StartType,
        members: &[NodeId],
    ) -> Result<(), Self::Error>;

    /// The membership transition that began with `event` has committed
    /// cluster-wide.
    async fn on_finish(&self, group: &str, event: EventNumber) -> Result<(), Self::Error>;

    /// The group is going away; all local state for it must be dropped.
    async fn on_terminate(&self, group: &str) -> Result<(), Self::Error>;
}
