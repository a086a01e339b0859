//! Membership reconciliation for mount groups.
//!
//! Every node receives the same totally-ordered membership snapshots and
//! runs the same reconciliation, so all nodes converge on the same member
//! lists and recovery decisions without further coordination.

use std::collections::HashMap;

use quorumfs_groups::{EventNumber, MemberRole, NodeId, StartType};
use tracing::debug;

use crate::mount_group::{Member, MountGroup};

/// Counts of members added and removed by one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipDelta {
    /// Members newly added from the snapshot.
    pub joined: usize,
    /// Members moved to the departed list.
    pub left: usize,
}

impl MountGroup {
    /// Whether `node` is a current member.
    #[must_use]
    pub fn is_member(&self, node: NodeId) -> bool {
        self.members.iter().any(|m| m.node_id == node)
    }

    /// Whether `node` is on the departed list.
    #[must_use]
    pub fn is_removed(&self, node: NodeId) -> bool {
        self.members_gone.iter().any(|m| m.node_id == node)
    }

    /// Applies a new membership snapshot.
    ///
    /// Members absent from the snapshot move to the departed list, stamped
    /// with the current start event; a departed member's journal is
    /// flagged for recovery when the departure was a failure, the member
    /// had finished mounting, neither the member nor the group is a
    /// spectator, and its journal is not already being recovered. Nodes
    /// new to the group are inserted in node-id order; `roles` supplies
    /// their spectator status.
    pub fn reconcile(
        &mut self,
        snapshot: &[NodeId],
        roles: &HashMap<NodeId, MemberRole>,
    ) -> MembershipDelta {
        let mut left = 0;
        let mut i = 0;
        while i < self.members.len() {
            if snapshot.contains(&self.members[i].node_id) {
                i += 1;
                continue;
            }

            let mut memb = self.members.remove(i);
            memb.gone_event = self.start_event;
            left += 1;

            // - spectator groups don't request recovery
            // - only failed (not cleanly leaving) nodes are recovered
            // - only nodes that finished joining are recovered
            // - spectators own no journal
            // - a journal already being recovered is not requested again
            if !self.spectator
                && self.start_type == StartType::NodeFailed
                && memb.mount_finished
                && !memb.spectator
                && !memb.wait_recover_done
            {
                memb.recover_journal = true;
            }

            debug!(
                group = %self.name,
                node = %memb.node_id,
                recover_journal = memb.recover_journal,
                "remove member"
            );
            self.members_gone.push(memb);
        }

        let mut joined = 0;
        for node in snapshot {
            if self.is_member(*node) {
                continue;
            }
            let spectator = roles.get(node).is_some_and(|r| r.is_spectator());
            self.insert_member(Member::new(*node, spectator));
            joined += 1;
            debug!(group = %self.name, node = %node, "add member");
        }

        self.low_node = self.members.iter().map(|m| m.node_id).min();

        debug!(group = %self.name, total = self.members.len(), "total members");

        MembershipDelta { joined, left }
    }

    /// Removes departed members whose departure event the group has
    /// finished.
    pub fn purge_gone(&mut self, finish_event: EventNumber) {
        self.members_gone.retain(|m| m.gone_event > finish_event);
    }

    /// Marks every current member as having completed mounting, making it
    /// a recovery target in future failures.
    pub fn mark_mounts_finished(&mut self) {
        for memb in &mut self.members {
            memb.mount_finished = true;
        }
    }

    /// Whether the local node is the first participant: alone in the
    /// group, or every other current member is a spectator.
    #[must_use]
    pub fn first_participant(&self, member_count: usize, local: NodeId) -> bool {
        if member_count == 1 {
            return true;
        }

        if self
            .members
            .iter()
            .any(|m| m.node_id != local && !m.spectator)
        {
            return false;
        }

        debug!(group = %self.name, members = member_count, "first participant");
        true
    }

    /// Inserts a member keeping `members` sorted ascending by node id.
    fn insert_member(&mut self, member: Member) {
        let at = self
            .members
            .iter()
            .position(|m| member.node_id < m.node_id)
            .unwrap_or(self.members.len());
        self.members.insert(at, member);
    }
}
