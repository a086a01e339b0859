//! Membership-event and role types delivered by the group service.

use serde::{Deserialize, Serialize};

/// Sequence number of a membership event within one group.
pub type EventNumber = u64;

/// Why a start event was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartType {
    /// A node joined or left cleanly.
    Normal,
    /// A node failed and was evicted.
    NodeFailed,
}

/// How a node takes part in a mount group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    /// Full participant: owns a journal and takes part in recovery.
    Participant,
    /// Observes the group without owning a journal.
    Spectator,
}

impl MemberRole {
    /// Whether this role is a spectator.
    #[must_use]
    pub const fn is_spectator(self) -> bool {
        matches!(self, Self::Spectator)
    }
}

/// Level a group is registered at within the group service.
///
/// Levels order recovery across subsystems: lower levels are recovered
/// before higher ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupLevel(u32);

impl GroupLevel {
    /// Fencing domains.
    pub const DOMAIN: Self = Self(0);

    /// Mount groups.
    pub const MOUNT: Self = Self(1);

    /// Creates a group level from its numeric value.
    #[must_use]
    pub const fn new(level: u32) -> Self {
        Self(level)
    }
}

/// Result of a domain-membership query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMembership {
    /// Whether the local node is currently a member of the domain.
    pub is_member: bool,
    /// Name of the client subsystem that owns the domain.
    pub client_owner: String,
}
