//! Process-wide collection of mount groups.

use std::collections::HashMap;

use crate::error::Error;
use crate::mount_group::MountGroup;

/// Mount groups keyed by name.
///
/// Groups are created when a mount request is accepted and destroyed when
/// the group service delivers a terminate event.
#[derive(Debug, Default)]
pub struct MountGroupRegistry {
    groups: HashMap<String, MountGroup>,
}

impl MountGroupRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a group with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Returns the named group.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MountGroup> {
        self.groups.get(name)
    }

    /// Returns the named group mutably.
    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut MountGroup> {
        self.groups.get_mut(name)
    }

    /// Registers a group, rejecting duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyMounted`] if a group with this name is
    /// already registered; the existing group is left untouched.
    pub fn insert(&mut self, group: MountGroup) -> Result<(), Error> {
        if self.groups.contains_key(&group.name) {
            return Err(Error::AlreadyMounted(group.name));
        }
        self.groups.insert(group.name.clone(), group);
        Ok(())
    }

    /// Removes and returns the named group.
    pub fn remove(&mut self, name: &str) -> Option<MountGroup> {
        self.groups.remove(name)
    }

    /// Number of registered groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no groups are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    #[test]
    fn insert_rejects_duplicates() {
        let mut registry = MountGroupRegistry::new();
        registry.insert(MountGroup::new("fs0")).unwrap();

        let result = registry.insert(MountGroup::new("fs0"));

        assert_matches!(result, Err(Error::AlreadyMounted(name)) if name == "fs0");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_returns_the_group() {
        let mut registry = MountGroupRegistry::new();
        registry.insert(MountGroup::new("fs0")).unwrap();

        let group = registry.remove("fs0").unwrap();

        assert_eq!(group.name, "fs0");
        assert!(registry.is_empty());
        assert!(registry.remove("fs0").is_none());
    }
}
