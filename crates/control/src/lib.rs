//! Abstract interface for the kernel's per-mount-group recovery controls.
//!
//! The kernel exposes one control value per mount group and field; the
//! daemon drives journal recovery by writing to them and learns filesystem
//! facts by reading them.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;
use std::fmt::{self, Debug};

use async_trait::async_trait;

/// Marker trait for `RecoveryControl` errors.
pub trait ControlError: Debug + Error + Send + Sync + 'static {}

/// A named per-group control value.
///
/// Names match the file names the kernel exposes for each mount group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlField {
    /// Pause (1) or resume (0) filesystem activity.
    Block,
    /// Cluster name the mounted filesystem expects (read-only).
    Cluster,
    /// Mount-time initialization: 1 when this node is the first
    /// participant and must perform one-time setup.
    First,
    /// This node's own journal id.
    Jid,
    /// Mount completion: 1 = mount complete, -1 = mount aborted.
    Mounted,
    /// Mount option string (read-only).
    Options,
    /// Journal id whose recovery should begin.
    Recover,
    /// Journal id whose recovery just completed (read-only).
    RecoverDone,
}

impl ControlField {
    /// The control value's file name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Cluster => "cluster",
            Self::First => "first",
            Self::Jid => "jid",
            Self::Mounted => "mounted",
            Self::Options => "options",
            Self::Recover => "recover",
            Self::RecoverDone => "recover_done",
        }
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trait representing the kernel recovery controls of mount groups, with
/// asynchronous operations.
///
/// Both operations address a per-group, per-field resource. An absent
/// resource or I/O failure is always reported as an error.
#[async_trait]
pub trait RecoveryControl: Clone + Send + Sync + 'static {
    /// The error type for control operations.
    type Error: ControlError;

    /// Reads the current value of `field` for `group`.
    ///
    /// Trailing newlines are stripped from the returned value.
    async fn read(&self, group: &str, field: ControlField) -> Result<String, Self::Error>;

    /// Writes `value` to `field` for `group`.
    async fn write(
        &self,
        group: &str,
        field: ControlField,
        value: i64,
    ) -> Result<(), Self::Error>;
}
