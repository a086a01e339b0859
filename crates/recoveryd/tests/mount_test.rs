//! Mount acceptance and rejection scenarios.

mod common;

use assert_matches::assert_matches;
use common::{CLUSTER, TestNode};
use quorumfs_control::ControlField;
use quorumfs_groups::{DomainMembership, MemberRole};
use quorumfs_recoveryd::Error;

#[tokio::test]
async fn mount_joins_the_group_as_participant() {
    let node = TestNode::new(4);

    node.mount("fs0").await;

    assert_eq!(
        node.service.joins(),
        vec![("fs0".to_string(), MemberRole::Participant)]
    );
    assert!(node.control.writes_to("fs0", ControlField::Mounted).is_empty());
    assert!(node.coordinator.group("fs0").await.is_some());
}

#[tokio::test]
async fn spectator_option_joins_as_spectator_without_fence_check() {
    let node = TestNode::new(4);
    // would fail the fence check if it ran
    node.service.set_domain_membership(
        "default",
        DomainMembership {
            is_member: false,
            client_owner: String::new(),
        },
    );
    node.expose_filesystem("fs0", "rw,noatime,spectator");

    node.coordinator.mount("fs0").await.unwrap();

    assert_eq!(
        node.service.joins(),
        vec![("fs0".to_string(), MemberRole::Spectator)]
    );
    let group = node.coordinator.group("fs0").await.unwrap();
    assert!(group.spectator);
}

#[tokio::test]
async fn duplicate_mount_is_rejected_and_leaves_the_group_untouched() {
    let node = TestNode::new(4);
    node.mount("fs0").await;

    let result = node.coordinator.mount("fs0").await;

    assert_matches!(result, Err(Error::AlreadyMounted(name)) if name == "fs0");
    // the existing group saw no abort signal and no second join
    assert!(node.control.writes_to("fs0", ControlField::Mounted).is_empty());
    assert_eq!(node.service.joins().len(), 1);
    assert!(node.coordinator.group("fs0").await.is_some());
}

#[tokio::test]
async fn cluster_mismatch_rejects_the_mount() {
    let node = TestNode::new(4);
    node.control.set("fs0", ControlField::Cluster, "beta");
    node.control.set("fs0", ControlField::Options, "rw");

    let result = node.coordinator.mount("fs0").await;

    assert_matches!(
        result,
        Err(Error::ClusterMismatch { fs, cluster }) if fs == "beta" && cluster == CLUSTER
    );
    assert_eq!(node.control.writes_to("fs0", ControlField::Mounted), vec![-1]);
    assert!(node.coordinator.group("fs0").await.is_none());
    assert!(node.service.joins().is_empty());
}

#[tokio::test]
async fn unreadable_cluster_name_rejects_the_mount() {
    let node = TestNode::new(4);
    node.control.set("fs0", ControlField::Options, "rw");

    let result = node.coordinator.mount("fs0").await;

    assert_matches!(result, Err(Error::Control { .. }));
    assert_eq!(node.control.writes_to("fs0", ControlField::Mounted), vec![-1]);
}

#[tokio::test]
async fn mount_outside_the_fence_domain_is_rejected() {
    let node = TestNode::new(4);
    node.service.set_domain_membership(
        "default",
        DomainMembership {
            is_member: false,
            client_owner: "fence".to_string(),
        },
    );
    node.expose_filesystem("fs0", "rw");

    let result = node.coordinator.mount("fs0").await;

    assert_matches!(result, Err(Error::NotInFenceDomain(domain)) if domain == "default");
    assert_eq!(node.control.writes_to("fs0", ControlField::Mounted), vec![-1]);
    assert!(node.coordinator.group("fs0").await.is_none());
}

#[tokio::test]
async fn fence_domain_owned_by_another_client_is_rejected() {
    let node = TestNode::new(4);
    node.service.set_domain_membership(
        "default",
        DomainMembership {
            is_member: true,
            client_owner: "other".to_string(),
        },
    );
    node.expose_filesystem("fs0", "rw");

    let result = node.coordinator.mount("fs0").await;

    assert_matches!(result, Err(Error::NotInFenceDomain(_)));
}

#[tokio::test]
async fn refused_join_deregisters_the_group() {
    let node = TestNode::new(4);
    node.service.refuse_joins();
    node.expose_filesystem("fs0", "rw");

    let result = node.coordinator.mount("fs0").await;

    assert_matches!(result, Err(Error::Group { .. }));
    assert_eq!(node.control.writes_to("fs0", ControlField::Mounted), vec![-1]);
    assert!(node.coordinator.group("fs0").await.is_none());
}
