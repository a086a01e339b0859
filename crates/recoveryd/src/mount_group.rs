//! Mount-group and member state.
//!
//! Pure state containers; membership transitions live in
//! [`crate::membership`] and recovery dispatch in [`crate::recovery`].

use std::fmt;

use quorumfs_groups::{EventNumber, NodeId, StartType};

/// Identifier of a per-node journal within a mount group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JournalId(u32);

impl JournalId {
    /// Creates a journal id from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The journal a node owns.
    ///
    /// Node ids are 1-based; journals are numbered from 0, so the mapping
    /// is a pure function of node identity and needs no allocation
    /// authority.
    #[must_use]
    pub const fn for_node(node: NodeId) -> Self {
        Self(node.get() - 1)
    }

    /// Returns the numeric value of this journal id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node participating, or having participated, in a mount group.
#[derive(Debug, Clone)]
pub struct Member {
    /// The node's cluster id.
    pub node_id: NodeId,
    /// The journal this node owns, once discovered.
    pub journal: Option<JournalId>,
    /// Whether the node joined as a spectator.
    pub spectator: bool,
    /// Whether the node has completed mounting. Only finished members are
    /// recovery targets when they later fail.
    pub mount_finished: bool,
    /// This node's journal needs recovery.
    pub recover_journal: bool,
    /// Recovery of this node's journal has been dispatched and not yet
    /// acknowledged.
    pub wait_recover_done: bool,
    /// Start event at which this member departed. Meaningful only while
    /// the member is on the departed list.
    pub gone_event: EventNumber,
}

impl Member {
    pub(crate) const fn new(node_id: NodeId, spectator: bool) -> Self {
        Self {
            node_id,
            journal: None,
            spectator,
            mount_finished: false,
            recover_journal: false,
            wait_recover_done: false,
            gone_event: 0,
        }
    }
}

/// Per-mount state for one clustered filesystem.
///
/// `members` is kept sorted ascending by node id so that every node
/// receiving the same membership snapshot derives the same low node and
/// recovery order. A node id is on exactly one of `members` /
/// `members_gone` at any time; departed members are purged once the
/// group's finish event reaches their departure event.
#[derive(Debug, Clone)]
pub struct MountGroup {
    /// Group name (the filesystem's lock-table name).
    pub name: String,
    /// The local node observes this group without participating in
    /// recovery.
    pub spectator: bool,
    /// True until the first start event has been handled.
    pub first_start: bool,
    /// The local node's journal, once claimed.
    pub our_journal: Option<JournalId>,
    /// Minimum node id among current members.
    pub low_node: Option<NodeId>,
    /// Event number of the most recent start event.
    pub start_event: EventNumber,
    /// Type of the most recent start event.
    pub start_type: StartType,
    /// Event number of the most recent finish event.
    pub finish_event: EventNumber,
    /// Current members, sorted ascending by node id.
    pub members: Vec<Member>,
    /// Departed members pending purge.
    pub members_gone: Vec<Member>,
}

impl MountGroup {
    /// Creates the state for a newly mounted group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spectator: false,
            first_start: true,
            our_journal: None,
            low_node: None,
            start_event: 0,
            start_type: StartType::Normal,
            finish_event: 0,
            members: Vec::new(),
            members_gone: Vec::new(),
        }
    }

    /// Number of current members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
