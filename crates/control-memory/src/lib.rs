//! In-memory implementation of mount-group recovery controls for tests and
//! local development.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use quorumfs_control::{ControlField, RecoveryControl};
use tracing::debug;

/// A single recorded control write.
pub type ControlWrite = (String, ControlField, i64);

#[derive(Debug, Default)]
struct State {
    values: HashMap<(String, ControlField), String>,
    writes: Vec<ControlWrite>,
    failing: HashSet<ControlField>,
}

/// In-memory recovery controls.
///
/// Values can be seeded before a test runs, every write is journaled for
/// later inspection, and writes to chosen fields can be made to fail.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecoveryControl {
    state: Arc<Mutex<State>>,
}

impl MemoryRecoveryControl {
    /// Creates a new `MemoryRecoveryControl`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a control value, as if the kernel had exposed it.
    pub fn set(&self, group: &str, field: ControlField, value: impl Into<String>) {
        self.state
            .lock()
            .values
            .insert((group.to_string(), field), value.into());
    }

    /// Returns the current value of a control, if any.
    #[must_use]
    pub fn value(&self, group: &str, field: ControlField) -> Option<String> {
        self.state
            .lock()
            .values
            .get(&(group.to_string(), field))
            .cloned()
    }

    /// Returns every write performed so far, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<ControlWrite> {
        self.state.lock().writes.clone()
    }

    /// Returns the writes performed against one field of one group.
    #[must_use]
    pub fn writes_to(&self, group: &str, field: ControlField) -> Vec<i64> {
        self.state
            .lock()
            .writes
            .iter()
            .filter(|(g, f, _)| g == group && *f == field)
            .map(|(_, _, v)| *v)
            .collect()
    }

    /// Makes every subsequent write to `field` fail.
    pub fn refuse_writes(&self, field: ControlField) {
        self.state.lock().failing.insert(field);
    }

    /// Lets writes to `field` succeed again.
    pub fn accept_writes(&self, field: ControlField) {
        self.state.lock().failing.remove(&field);
    }
}

#[async_trait]
impl RecoveryControl for MemoryRecoveryControl {
    type Error = Error;

    async fn read(&self, group: &str, field: ControlField) -> Result<String, Self::Error> {
        self.state
            .lock()
            .values
            .get(&(group.to_string(), field))
            .cloned()
            .ok_or_else(|| Error::NotSet {
                group: group.to_string(),
                field,
            })
    }

    async fn write(
        &self,
        group: &str,
        field: ControlField,
        value: i64,
    ) -> Result<(), Self::Error> {
        let mut state = self.state.lock();

        if state.failing.contains(&field) {
            return Err(Error::WriteRefused(field));
        }

        debug!(group, field = %field, value, "set control value");

        state
            .values
            .insert((group.to_string(), field), value.to_string());
        state.writes.push((group.to_string(), field, value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let control = MemoryRecoveryControl::new();

        control.write("fs0", ControlField::Jid, 2).await.unwrap();

        assert_eq!(control.read("fs0", ControlField::Jid).await.unwrap(), "2");
    }

    #[tokio::test]
    async fn test_read_unset_value_is_an_error() {
        let control = MemoryRecoveryControl::new();

        let result = control.read("fs0", ControlField::Cluster).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_writes_are_journaled_in_order() {
        let control = MemoryRecoveryControl::new();

        control.write("fs0", ControlField::Block, 1).await.unwrap();
        control.write("fs0", ControlField::Block, 0).await.unwrap();
        control
            .write("fs0", ControlField::Mounted, 1)
            .await
            .unwrap();

        assert_eq!(control.writes_to("fs0", ControlField::Block), vec![1, 0]);
        assert_eq!(control.writes_to("fs0", ControlField::Mounted), vec![1]);
    }

    #[tokio::test]
    async fn test_refused_writes_fail_and_are_not_journaled() {
        let control = MemoryRecoveryControl::new();
        control.refuse_writes(ControlField::Recover);

        let result = control.write("fs0", ControlField::Recover, 4).await;

        assert!(result.is_err());
        assert!(control.writes().is_empty());

        control.accept_writes(ControlField::Recover);
        control
            .write("fs0", ControlField::Recover, 4)
            .await
            .unwrap();
        assert_eq!(control.writes_to("fs0", ControlField::Recover), vec![4]);
    }

    #[tokio::test]
    async fn test_seeded_value_is_readable() {
        let control = MemoryRecoveryControl::new();
        control.set("fs0", ControlField::Options, "rw,spectator");

        assert_eq!(
            control.read("fs0", ControlField::Options).await.unwrap(),
            "rw,spectator"
        );
    }
}
