//! Journal-recovery scheduling.
//!
//! Recoveries are serialized to one in flight per group: the kernel is
//! asked to recover a single journal, and the next flagged journal is
//! dispatched only once the kernel reports the previous one done.

use quorumfs_control::{ControlField, RecoveryControl};
use tracing::{debug, info, warn};

use crate::mount_group::{JournalId, Member, MountGroup};

fn flagged_member(group: &mut MountGroup) -> Option<&mut Member> {
    // Flags are set when members depart, so candidates normally sit on
    // the departed list; take the lowest node id among all flagged.
    group
        .members
        .iter_mut()
        .chain(group.members_gone.iter_mut())
        .filter(|m| m.recover_journal)
        .min_by_key(|m| m.node_id)
}

/// Dispatches the next queued journal recovery, if any.
///
/// Returns whether a recovery is now pending. On a control write failure
/// the member's flags are left untouched and the failure is logged; the
/// next scheduling pass retries the same journal.
pub(crate) async fn schedule_next<C>(control: &C, group: &mut MountGroup) -> bool
where
    C: RecoveryControl,
{
    let name = group.name.clone();

    // one recovery in flight at a time
    if group
        .members
        .iter()
        .chain(group.members_gone.iter())
        .any(|m| m.wait_recover_done)
    {
        return true;
    }

    let Some(memb) = flagged_member(group) else {
        return false;
    };

    let Some(journal) = memb.journal else {
        warn!(
            group = %name,
            node = %memb.node_id,
            "member flagged for recovery has no journal"
        );
        return false;
    };

    match control
        .write(&name, ControlField::Recover, i64::from(journal.get()))
        .await
    {
        Ok(()) => {
            memb.recover_journal = false;
            memb.wait_recover_done = true;
            info!(group = %name, node = %memb.node_id, journal = %journal, "recovering journal");
            true
        }
        Err(e) => {
            warn!(
                group = %name,
                journal = %journal,
                error = %e,
                "recovery request failed, retrying on next scheduling pass"
            );
            false
        }
    }
}

/// Records that the kernel finished recovering `done`, then dispatches any
/// further queued recovery.
///
/// Returns whether a recovery is still pending afterwards.
pub(crate) async fn acknowledge<C>(control: &C, group: &mut MountGroup, done: JournalId) -> bool
where
    C: RecoveryControl,
{
    let waiting = group
        .members
        .iter_mut()
        .chain(group.members_gone.iter_mut())
        .find(|m| m.journal == Some(done));

    match waiting {
        Some(memb) if memb.wait_recover_done => {
            memb.wait_recover_done = false;
            debug!(group = %group.name, journal = %done, "journal recovery done");
        }
        _ => {
            debug!(group = %group.name, journal = %done, "recovery done: not waiting");
        }
    }

    schedule_next(control, group).await
}
