/*!
 * Process Catalog
 * Stabilized per-process views and the catalog seam
 */

use crate::core::types::{Pages, Pid, Severity, Tgid};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// Stabilized, read-only view of one live process at the instant of
/// inspection. Never cached across rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessCandidate {
    pub pid: Pid,
    pub tgid: Tgid,
    pub name: String,
    /// Physical memory attributed to the process, in pages
    pub resident_pages: Pages,
    pub severity: Severity,
    /// False for kernel-internal helper tasks with no user address space
    pub has_address_space: bool,
    /// True while a previously issued kill is still settling
    pub is_kill_waiting: bool,
}

/// Enumerates live processes under the host's stabilizing lock.
///
/// The host owns process lifetime; the engine only borrows short-lived
/// candidate views, one at a time, and never holds a lock across a whole
/// scan. Kill delivery and kill-waiting marking go back through the catalog
/// so the address-space re-check happens where the process is stabilized.
pub trait ProcessCatalog: Send + Sync {
    /// Visit every live process in catalog order.
    ///
    /// The visitor returns `ControlFlow::Break(())` to abort the scan early.
    fn for_each_candidate(&self, visit: &mut dyn FnMut(ProcessCandidate) -> ControlFlow<()>);

    /// Deliver a termination signal to the process.
    ///
    /// Returns false if the target vanished before delivery; callers treat
    /// that as an expected race, not a failure.
    fn signal_kill(&self, pid: Pid) -> bool;

    /// Mark the process kill-waiting, only if it still has an address space
    /// at the moment of marking. Returns whether the mark was applied.
    fn mark_kill_waiting(&self, pid: Pid) -> bool;
}
