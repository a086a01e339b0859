//! The group service as consumed by the coordinator.

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::node_id::NodeId;
use crate::types::{DomainMembership, EventNumber, GroupLevel, MemberRole};

/// Marker trait for `GroupService` errors.
pub trait GroupServiceError: Debug + Error + Send + Sync + 'static {}

/// A trait representing the external group-communication service, with
/// asynchronous operations.
///
/// The service delivers totally-ordered membership events (see
/// [`crate::GroupEventHandler`]) and accepts the join / leave /
/// acknowledge calls below.
#[async_trait]
pub trait GroupService: Clone + Send + Sync + 'static {
    /// The error type for group-service operations.
    type Error: GroupServiceError;

    /// Joins the named group with the given role.
    async fn join(&self, group: &str, role: MemberRole) -> Result<(), Self::Error>;

    /// Leaves the named group.
    async fn leave(&self, group: &str, reason: Option<&str>) -> Result<(), Self::Error>;

    /// Acknowledges that all work for a delivered start event is complete,
    /// unblocking the rest of the cluster.
    async fn acknowledge(&self, group: &str, event: EventNumber) -> Result<(), Self::Error>;

    /// Returns the role a node joined the named group with.
    async fn member_role(
        &self,
        level: GroupLevel,
        group: &str,
        node: NodeId,
    ) -> Result<MemberRole, Self::Error>;

    /// Returns the local node's membership in the named domain.
    async fn domain_membership(&self, domain: &str) -> Result<DomainMembership, Self::Error>;
}
