//! Per-group coordination of membership events and journal recovery.
//!
//! Every node runs an identical coordinator, driven by the same totally
//! ordered events, and converges to the same decisions without extra
//! synchronization. Events are handled one at a time to completion;
//! the only state carried between events is the recovery backpressure:
//! a start event is acknowledged only once all recovery it triggered has
//! completed.

use std::collections::HashMap;

use async_trait::async_trait;
use quorumfs_control::{ControlField, RecoveryControl};
use quorumfs_groups::{
    EventNumber, GroupEventHandler, GroupLevel, GroupService, MemberRole, NodeId, StartType,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::CoordinatorConfig;
use crate::error::{Error, Result};
use crate::journal;
use crate::mount_group::{JournalId, MountGroup};
use crate::recovery;
use crate::registry::MountGroupRegistry;

/// Client subsystem that must own the fencing domain.
const FENCE_OWNER: &str = "fence";

/// Coordinates mount groups on one node.
///
/// Generic over the kernel control interface and the group service;
/// holds the registry of mounted groups.
pub struct MountGroupCoordinator<C, G>
where
    C: RecoveryControl,
    G: GroupService,
{
    config: CoordinatorConfig,
    control: C,
    groups: G,
    registry: RwLock<MountGroupRegistry>,
}

impl<C, G> MountGroupCoordinator<C, G>
where
    C: RecoveryControl,
    G: GroupService,
{
    /// Creates a coordinator with no mounted groups.
    pub fn new(config: CoordinatorConfig, control: C, groups: G) -> Self {
        Self {
            config,
            control,
            groups,
            registry: RwLock::new(MountGroupRegistry::new()),
        }
    }

    /// The coordinator's configuration.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Returns a snapshot of the named group's state.
    pub async fn group(&self, name: &str) -> Option<MountGroup> {
        self.registry.read().await.get(name).cloned()
    }

    /// Number of mounted groups.
    pub async fn mounted_groups(&self) -> usize {
        self.registry.read().await.len()
    }

    /// Handles a local mount request for the named group.
    ///
    /// Verifies that the filesystem belongs to the local cluster, reads
    /// the mount options for the spectator role, checks fencing-domain
    /// membership for non-spectator mounts, registers the group and joins
    /// it. The group service drives the first start event from there.
    ///
    /// # Errors
    ///
    /// Any failure rejects the mount; apart from [`Error::AlreadyMounted`]
    /// (which leaves the existing group untouched), a rejected mount
    /// signals `mounted = -1` to the kernel.
    pub async fn mount(&self, name: &str) -> Result<()> {
        if self.registry.read().await.contains(name) {
            warn!(group = name, "mount rejected: already mounted");
            return Err(Error::AlreadyMounted(name.to_string()));
        }

        let mut group = MountGroup::new(name);

        let fs_cluster = match self.control.read(name, ControlField::Cluster).await {
            Ok(value) => value,
            Err(e) => {
                return self
                    .abort_mount(name, Error::control("reading cluster name", e))
                    .await;
            }
        };
        if fs_cluster.is_empty() || fs_cluster != self.config.cluster_name {
            error!(
                group = name,
                fs = %fs_cluster,
                cluster = %self.config.cluster_name,
                "mount rejected: different cluster names"
            );
            return self
                .abort_mount(
                    name,
                    Error::ClusterMismatch {
                        fs: fs_cluster,
                        cluster: self.config.cluster_name.clone(),
                    },
                )
                .await;
        }
        debug!(group = name, cluster = %self.config.cluster_name, "cluster name matches");

        let options = match self.control.read(name, ControlField::Options).await {
            Ok(value) => value,
            Err(e) => {
                return self
                    .abort_mount(name, Error::control("reading mount options", e))
                    .await;
            }
        };

        let role = if options.contains("spectator") {
            debug!(group = name, "spectator mount");
            group.spectator = true;
            MemberRole::Spectator
        } else {
            match self.groups.domain_membership(&self.config.fence_domain).await {
                Ok(domain) if domain.is_member && domain.client_owner == FENCE_OWNER => {
                    MemberRole::Participant
                }
                Ok(_) => {
                    error!(
                        group = name,
                        domain = %self.config.fence_domain,
                        "mount rejected: not in fence domain"
                    );
                    return self
                        .abort_mount(
                            name,
                            Error::NotInFenceDomain(self.config.fence_domain.clone()),
                        )
                        .await;
                }
                Err(e) => {
                    return self
                        .abort_mount(name, Error::group("querying fence domain", e))
                        .await;
                }
            }
        };

        self.registry.write().await.insert(group)?;

        if let Err(e) = self.groups.join(name, role).await {
            self.registry.write().await.remove(name);
            return self
                .abort_mount(name, Error::group("joining mount group", e))
                .await;
        }

        info!(group = name, ?role, "mount group joined");
        Ok(())
    }

    /// Handles a start event: applies the new membership snapshot and
    /// dispatches any recovery it calls for.
    ///
    /// The event is acknowledged to the group service immediately unless
    /// a recovery was dispatched, in which case the acknowledgment waits
    /// for [`Self::recovery_done`].
    ///
    /// # Errors
    ///
    /// Control write failures are logged and reported but never abort the
    /// remaining steps or the acknowledgment decision.
    pub async fn start(
        &self,
        name: &str,
        event: EventNumber,
        start_type: StartType,
        members: &[NodeId],
    ) -> Result<()> {
        let mut registry = self.registry.write().await;
        let Some(group) = registry.get_mut(name) else {
            return Err(Self::unknown_group("start", name));
        };

        group.start_event = event;
        group.start_type = start_type;

        let roles = self.query_joiner_roles(group, members).await;
        let delta = group.reconcile(members, &roles);

        let mut failure = None;

        // NB first_start does not mean the first group member
        if group.first_start {
            group.first_start = false;

            if !group.spectator {
                let journal = journal::claim_own_journal(group, self.config.node_id);
                if let Err(e) = self
                    .control
                    .write(name, ControlField::Jid, i64::from(journal.get()))
                    .await
                {
                    error!(group = name, journal = %journal, error = %e, "failed to write journal id");
                    failure.get_or_insert(Error::control("writing journal id", e));
                }

                if group.first_participant(members.len(), self.config.node_id) {
                    if let Err(e) = self.control.write(name, ControlField::First, 1).await {
                        error!(group = name, error = %e, "failed to signal first participant");
                        failure.get_or_insert(Error::control("signaling first participant", e));
                    }
                }
            }
        }

        if delta.joined > 0 {
            journal::discover_peer_journals(group);
        }

        let mut pending = false;
        if delta.left > 0 {
            pending = recovery::schedule_next(&self.control, group).await;
        }

        if pending {
            debug!(group = name, event, "start acknowledgment deferred until recovery completes");
        } else if let Err(e) = self.groups.acknowledge(name, event).await {
            error!(group = name, event, error = %e, "failed to acknowledge start event");
            failure.get_or_insert(Error::group("acknowledging start event", e));
        }

        failure.map_or(Ok(()), Err)
    }

    /// Handles a stop event: pauses filesystem activity pending the next
    /// start or finish.
    pub async fn stop(&self, name: &str) -> Result<()> {
        let registry = self.registry.read().await;
        if !registry.contains(name) {
            return Err(Self::unknown_group("stop", name));
        }

        self.control
            .write(name, ControlField::Block, 1)
            .await
            .map_err(|e| Error::control("writing block", e))
    }

    /// Handles a finish event: the membership transition has committed
    /// cluster-wide, so members become recovery-eligible, departed
    /// members whose departure the finish covers are purged, and
    /// filesystem activity resumes.
    ///
    /// # Errors
    ///
    /// A failed block clear is logged and reported but does not prevent
    /// the remaining steps.
    pub async fn finish(&self, name: &str, event: EventNumber) -> Result<()> {
        let mut registry = self.registry.write().await;
        let Some(group) = registry.get_mut(name) else {
            return Err(Self::unknown_group("finish", name));
        };

        group.finish_event = event;
        group.mark_mounts_finished();
        group.purge_gone(event);

        let mut failure = None;

        if let Err(e) = self.control.write(name, ControlField::Block, 0).await {
            warn!(group = name, error = %e, "failed to clear block");
            failure.get_or_insert(Error::control("clearing block", e));
        }

        // only needed while joining, harmless otherwise
        if let Err(e) = self.control.write(name, ControlField::Mounted, 1).await {
            warn!(group = name, error = %e, "failed to signal mount complete");
            failure.get_or_insert(Error::control("signaling mount complete", e));
        }

        failure.map_or(Ok(()), Err)
    }

    /// Handles the kernel's notification that a journal recovery
    /// completed: reads which journal from the `recover_done` control,
    /// dispatches the next queued recovery, and acknowledges the deferred
    /// start event once nothing is pending.
    pub async fn recovery_done(&self, name: &str) -> Result<()> {
        let mut registry = self.registry.write().await;
        let Some(group) = registry.get_mut(name) else {
            return Err(Self::unknown_group("recovery_done", name));
        };

        let raw = self
            .control
            .read(name, ControlField::RecoverDone)
            .await
            .map_err(|e| Error::control("reading recovered journal id", e))?;
        let done = raw
            .trim()
            .parse::<u32>()
            .map(JournalId::new)
            .map_err(|_| Error::InvalidControlValue {
                field: ControlField::RecoverDone,
                value: raw,
            })?;

        let pending = recovery::acknowledge(&self.control, group, done).await;
        if !pending {
            self.groups
                .acknowledge(name, group.start_event)
                .await
                .map_err(|e| Error::group("acknowledging start event", e))?;
        }
        Ok(())
    }

    /// Handles a local unmount request: leaves the group. Local state is
    /// torn down once the group service delivers the terminate event.
    pub async fn unmount(&self, name: &str) -> Result<()> {
        let registry = self.registry.read().await;
        if !registry.contains(name) {
            return Err(Self::unknown_group("unmount", name));
        }

        self.groups
            .leave(name, None)
            .await
            .map_err(|e| Error::group("leaving mount group", e))
    }

    /// Handles a terminate event: signals the aborted mount and destroys
    /// all local state for the group.
    ///
    /// The group is removed from the registry regardless of the signal's
    /// outcome.
    pub async fn terminate(&self, name: &str) -> Result<()> {
        let mut registry = self.registry.write().await;
        if !registry.contains(name) {
            return Err(Self::unknown_group("terminate", name));
        }

        let result = self
            .control
            .write(name, ControlField::Mounted, -1)
            .await
            .map_err(|e| Error::control("signaling terminated mount", e));

        registry.remove(name);
        info!(group = name, "mount group terminated");

        result
    }

    /// Spectator status for every snapshot node not yet in the member
    /// list. A failed role query is logged and the joiner treated as a
    /// participant.
    async fn query_joiner_roles(
        &self,
        group: &MountGroup,
        members: &[NodeId],
    ) -> HashMap<NodeId, MemberRole> {
        let mut roles = HashMap::new();
        for node in members {
            if group.is_member(*node) {
                continue;
            }
            let role = match self
                .groups
                .member_role(GroupLevel::MOUNT, &group.name, *node)
                .await
            {
                Ok(role) => role,
                Err(e) => {
                    warn!(
                        group = %group.name,
                        node = %node,
                        error = %e,
                        "join-info query failed, assuming participant"
                    );
                    MemberRole::Participant
                }
            };
            roles.insert(*node, role);
        }
        roles
    }

    /// Best-effort `mounted = -1` signal for a rejected mount, then the
    /// rejection itself.
    async fn abort_mount(&self, name: &str, error: Error) -> Result<()> {
        if let Err(e) = self.control.write(name, ControlField::Mounted, -1).await {
            warn!(group = name, error = %e, "failed to signal aborted mount");
        }
        Err(error)
    }

    fn unknown_group(event: &'static str, name: &str) -> Error {
        error!(event, group = name, "unknown mount group");
        Error::UnknownGroup {
            event,
            group: name.to_string(),
        }
    }
}

#[async_trait]
impl<C, G> GroupEventHandler for MountGroupCoordinator<C, G>
where
    C: RecoveryControl,
    G: GroupService,
{
    type Error = Error;

    async fn on_stop(&self, group: &str) -> Result<()> {
        self.stop(group).await
    }

    async fn on_start(
        &self,
        group: &str,
        event: EventNumber,
        start_type: StartType,
        members: &[NodeId],
    ) -> Result<()> {
        self.start(group, event, start_type, members).await
    }

    async fn on_finish(&self, group: &str, event: EventNumber) -> Result<()> {
        self.finish(group, event).await
    }

    async fn on_terminate(&self, group: &str) -> Result<()> {
        self.terminate(group).await
    }
}
