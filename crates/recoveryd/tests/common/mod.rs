//! Shared fixture for coordinator tests: one node wired to in-memory
//! kernel controls and an in-memory group service.
#![allow(dead_code)]

use quorumfs_control::ControlField;
use quorumfs_control_memory::MemoryRecoveryControl;
use quorumfs_groups::{DomainMembership, EventNumber, NodeId, StartType};
use quorumfs_groups_memory::MemoryGroupService;
use quorumfs_recoveryd::{CoordinatorConfig, MountGroupCoordinator};

/// Cluster name used by every test node.
pub const CLUSTER: &str = "alpha";

pub struct TestNode {
    pub control: MemoryRecoveryControl,
    pub service: MemoryGroupService,
    pub coordinator: MountGroupCoordinator<MemoryRecoveryControl, MemoryGroupService>,
}

impl TestNode {
    /// Creates a node that is a member of the default fence domain.
    pub fn new(node_id: u32) -> Self {
        let control = MemoryRecoveryControl::new();
        let service = MemoryGroupService::new();
        service.set_domain_membership(
            "default",
            DomainMembership {
                is_member: true,
                client_owner: "fence".to_string(),
            },
        );

        let coordinator = MountGroupCoordinator::new(
            CoordinatorConfig::new(CLUSTER, NodeId::new(node_id)),
            control.clone(),
            service.clone(),
        );

        Self {
            control,
            service,
            coordinator,
        }
    }

    /// Seeds the controls a mountable filesystem would expose.
    pub fn expose_filesystem(&self, group: &str, options: &str) {
        self.control.set(group, ControlField::Cluster, CLUSTER);
        self.control.set(group, ControlField::Options, options);
    }

    /// Exposes and mounts a plain read-write filesystem.
    pub async fn mount(&self, group: &str) {
        self.expose_filesystem(group, "rw");
        self.coordinator.mount(group).await.unwrap();
    }

    pub async fn start(
        &self,
        group: &str,
        event: EventNumber,
        start_type: StartType,
        ids: &[u32],
    ) {
        self.coordinator
            .start(group, event, start_type, &nodes(ids))
            .await
            .unwrap();
    }

    pub async fn finish(&self, group: &str, event: EventNumber) {
        self.coordinator.finish(group, event).await.unwrap();
    }

    /// Reports a completed journal recovery the way the kernel would:
    /// publishes the id in `recover_done`, then raises the notification.
    pub async fn kernel_reports_recovered(&self, group: &str, journal: u32) {
        self.control
            .set(group, ControlField::RecoverDone, journal.to_string());
        self.coordinator.recovery_done(group).await.unwrap();
    }
}

pub fn nodes(ids: &[u32]) -> Vec<NodeId> {
    ids.iter().copied().map(NodeId::new).collect()
}
