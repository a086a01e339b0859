use quorumfs_control::{ControlError, ControlField};
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The addressed control value does not exist.
    #[error("control value not set: {group}/{field}")]
    NotSet {
        /// Mount group name.
        group: String,
        /// Control field.
        field: ControlField,
    },

    /// A write failure was injected for this field.
    #[error("write refused for field {0}")]
    WriteRefused(ControlField),
}

impl ControlError for Error {}
