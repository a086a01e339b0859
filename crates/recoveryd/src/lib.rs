//! Mount-group membership tracking and journal-recovery coordination for
//! a shared clustered filesystem.
//!
//! A per-node daemon runs one [`MountGroupCoordinator`], feeding it the
//! totally-ordered membership events delivered by the external group
//! service. Every node runs an identical copy and converges to the same
//! membership and recovery decisions:
//! - member lists are kept in canonical (node id) order
//! - journal ownership is derived deterministically from node identity
//! - journal recoveries are serialized to one in flight per group
//! - a start event is acknowledged back to the group service only once
//!   all recovery it triggered has completed
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod coordinator;
pub mod error;
mod journal;
mod membership;
mod mount_group;
mod recovery;
mod registry;

pub use config::{CoordinatorConfig, DEFAULT_FENCE_DOMAIN};
pub use coordinator::MountGroupCoordinator;
pub use error::{Error, Result};
pub use membership::MembershipDelta;
pub use mount_group::{JournalId, Member, MountGroup};
pub use registry::MountGroupRegistry;
