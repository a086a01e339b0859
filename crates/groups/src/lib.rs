//! Group-communication boundary for mount-group coordination.
//!
//! This crate provides:
//! - Node identity and membership-event types
//! - The `GroupService` trait consumed by the coordinator (join / leave /
//!   acknowledge and membership queries)
//! - The `GroupEventHandler` trait the coordinator implements to receive
//!   totally-ordered membership events
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod handler;
mod node_id;
mod service;
mod types;

pub use handler::GroupEventHandler;
pub use node_id::NodeId;
pub use service::{GroupService, GroupServiceError};
pub use types::{DomainMembership, EventNumber, GroupLevel, MemberRole, StartType};
