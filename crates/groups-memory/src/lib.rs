//! In-memory (single process) implementation of the group service for
//! tests and local development.
//!
//! Joins, leaves and acknowledgments are recorded for later inspection;
//! membership roles and domain membership are configurable.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use quorumfs_groups::{
    DomainMembership, EventNumber, GroupLevel, GroupService, MemberRole, NodeId,
};
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    roles: HashMap<(GroupLevel, String, NodeId), MemberRole>,
    domains: HashMap<String, DomainMembership>,
    joins: Vec<(String, MemberRole)>,
    leaves: Vec<String>,
    acknowledgments: Vec<(String, EventNumber)>,
    refuse_joins: bool,
}

/// In-memory group service.
#[derive(Clone, Debug, Default)]
pub struct MemoryGroupService {
    state: Arc<Mutex<State>>,
}

impl MemoryGroupService {
    /// Creates a new `MemoryGroupService`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the role a node holds in the named group.
    ///
    /// Nodes without a configured role are reported as participants.
    pub fn set_member_role(&self, level: GroupLevel, group: &str, node: NodeId, role: MemberRole) {
        self.state
            .lock()
            .roles
            .insert((level, group.to_string(), node), role);
    }

    /// Configures the local node's membership in the named domain.
    pub fn set_domain_membership(&self, domain: &str, membership: DomainMembership) {
        self.state
            .lock()
            .domains
            .insert(domain.to_string(), membership);
    }

    /// Makes every subsequent join fail.
    pub fn refuse_joins(&self) {
        self.state.lock().refuse_joins = true;
    }

    /// Returns every join performed so far, in order.
    #[must_use]
    pub fn joins(&self) -> Vec<(String, MemberRole)> {
        self.state.lock().joins.clone()
    }

    /// Returns every leave performed so far, in order.
    #[must_use]
    pub fn leaves(&self) -> Vec<String> {
        self.state.lock().leaves.clone()
    }

    /// Returns every acknowledgment performed so far, in order.
    #[must_use]
    pub fn acknowledgments(&self) -> Vec<(String, EventNumber)> {
        self.state.lock().acknowledgments.clone()
    }

    /// Returns the acknowledged event numbers for one group, in order.
    #[must_use]
    pub fn acknowledgments_for(&self, group: &str) -> Vec<EventNumber> {
        self.state
            .lock()
            .acknowledgments
            .iter()
            .filter(|(g, _)| g == group)
            .map(|(_, event)| *event)
            .collect()
    }
}

#[async_trait]
impl GroupService for MemoryGroupService {
    type Error = Error;

    async fn join(&self, group: &str, role: MemberRole) -> Result<(), Self::Error> {
        let mut state = self.state.lock();

        if state.refuse_joins {
            return Err(Error::JoinRefused(group.to_string()));
        }

        debug!(group, ?role, "join");
        state.joins.push((group.to_string(), role));
        Ok(())
    }

    async fn leave(&self, group: &str, _reason: Option<&str>) -> Result<(), Self::Error> {
        debug!(group, "leave");
        self.state.lock().leaves.push(group.to_string());
        Ok(())
    }

    async fn acknowledge(&self, group: &str, event: EventNumber) -> Result<(), Self::Error> {
        debug!(group, event, "acknowledge");
        self.state
            .lock()
            .acknowledgments
            .push((group.to_string(), event));
        Ok(())
    }

    async fn member_role(
        &self,
        level: GroupLevel,
        group: &str,
        node: NodeId,
    ) -> Result<MemberRole, Self::Error> {
        Ok(self
            .state
            .lock()
            .roles
            .get(&(level, group.to_string(), node))
            .copied()
            .unwrap_or(MemberRole::Participant))
    }

    async fn domain_membership(&self, domain: &str) -> Result<DomainMembership, Self::Error> {
        self.state
            .lock()
            .domains
            .get(domain)
            .cloned()
            .ok_or_else(|| Error::UnknownDomain(domain.to_string()))
    }
}
