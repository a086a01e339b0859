//! Journal assignment.
//!
//! Journal ownership is a pure function of node identity, so no
//! allocation authority is needed: every node derives the same mapping
//! from the same membership.

use quorumfs_groups::NodeId;
use tracing::debug;

use crate::mount_group::{JournalId, MountGroup};

/// Assigns the local node's own journal.
pub(crate) fn claim_own_journal(group: &mut MountGroup, local: NodeId) -> JournalId {
    let journal = JournalId::for_node(local);
    group.our_journal = Some(journal);
    debug!(group = %group.name, journal = %journal, "claimed own journal");
    journal
}

/// Derives the journal owned by every current member.
///
/// Invoked whenever members joined, so a newly joined node learns the
/// journal ownership of peers already present.
pub(crate) fn discover_peer_journals(group: &mut MountGroup) {
    for memb in &mut group.members {
        memb.journal = Some(JournalId::for_node(memb.node_id));
    }
}
