//! Implementation of mount-group recovery controls using files on disk,
//! matching the kernel's one-file-per-field layout.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::path::PathBuf;

use async_trait::async_trait;
use quorumfs_control::{ControlField, RecoveryControl};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Recovery controls backed by a directory tree: one file per
/// `<root>/<group>/<field>`.
#[derive(Clone, Debug)]
pub struct FsRecoveryControl {
    root: PathBuf,
}

impl FsRecoveryControl {
    /// Creates a new `FsRecoveryControl` rooted at the specified directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn control_path(&self, group: &str, field: ControlField) -> PathBuf {
        self.root.join(group).join(field.as_str())
    }
}

#[async_trait]
impl RecoveryControl for FsRecoveryControl {
    type Error = Error;

    async fn read(&self, group: &str, field: ControlField) -> Result<String, Self::Error> {
        let path = self.control_path(group, field);
        let raw = fs::read_to_string(&path)
            .await
            .map_err(|e| Error::Io("error reading control value", e))?;
        Ok(raw.trim_end_matches('\n').to_string())
    }

    async fn write(
        &self,
        group: &str,
        field: ControlField,
        value: i64,
    ) -> Result<(), Self::Error> {
        let path = self.control_path(group, field);

        debug!(group, field = %field, value, "set control value");

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::Io("error creating group directory", e))?;
            }
        }

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| Error::Io("error opening control value", e))?;
        file.write_all(value.to_string().as_bytes())
            .await
            .map_err(|e| Error::Io("error writing control value", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let control = FsRecoveryControl::new(dir.path().to_path_buf());

        control.write("fs0", ControlField::Jid, 3).await.unwrap();
        let value = control.read("fs0", ControlField::Jid).await.unwrap();

        assert_eq!(value, "3");
    }

    #[tokio::test]
    async fn test_write_negative_value() {
        let dir = tempdir().unwrap();
        let control = FsRecoveryControl::new(dir.path().to_path_buf());

        control
            .write("fs0", ControlField::Mounted, -1)
            .await
            .unwrap();
        let value = control.read("fs0", ControlField::Mounted).await.unwrap();

        assert_eq!(value, "-1");
    }

    #[tokio::test]
    async fn test_read_strips_trailing_newline() {
        let dir = tempdir().unwrap();
        let control = FsRecoveryControl::new(dir.path().to_path_buf());

        let group_dir = dir.path().join("fs0");
        std::fs::create_dir_all(&group_dir).unwrap();
        std::fs::write(group_dir.join("cluster"), "alpha\n").unwrap();

        let value = control.read("fs0", ControlField::Cluster).await.unwrap();

        assert_eq!(value, "alpha");
    }

    #[tokio::test]
    async fn test_read_absent_value_is_an_error() {
        let dir = tempdir().unwrap();
        let control = FsRecoveryControl::new(dir.path().to_path_buf());

        let result = control.read("fs0", ControlField::Cluster).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_groups_are_isolated() {
        let dir = tempdir().unwrap();
        let control = FsRecoveryControl::new(dir.path().to_path_buf());

        control.write("fs0", ControlField::Block, 1).await.unwrap();
        control.write("fs1", ControlField::Block, 0).await.unwrap();

        assert_eq!(control.read("fs0", ControlField::Block).await.unwrap(), "1");
        assert_eq!(control.read("fs1", ControlField::Block).await.unwrap(), "0");
    }
}
