use quorumfs_groups::GroupServiceError;
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// No membership information configured for the named domain.
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    /// A join failure was injected.
    #[error("join refused for group {0}")]
    JoinRefused(String),
}

impl GroupServiceError for Error {}
