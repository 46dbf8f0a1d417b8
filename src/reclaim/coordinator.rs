/*!
 * Kill Coordinator
 * One-in-flight debounce and the kill action itself
 */

use crate::catalog::{ProcessCandidate, ProcessCatalog};
use crate::core::types::Pages;
use parking_lot::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// Coordinates kills across concurrent reclaim rounds.
///
/// Two pieces of state: a round mutex that makes the whole
/// evaluate-select-kill-arm sequence a single transaction, and the
/// death-pending deadline read by the selector's debounce check. The round
/// mutex closes the historical check-then-arm race where two overlapping
/// rounds could both pick a victim before either armed the deadline.
pub struct KillCoordinator {
    round: Mutex<()>,
    pending_until: Mutex<Option<Instant>>,
    grace: Duration,
}

impl KillCoordinator {
    #[must_use]
    pub fn new(grace: Duration) -> Self {
        Self {
            round: Mutex::new(()),
            pending_until: Mutex::new(None),
            grace,
        }
    }

    /// Claim the right to run a round. Returns `None` when another round is
    /// already in flight; the caller reports that round as debounced.
    #[must_use]
    pub fn try_begin_round(&self) -> Option<MutexGuard<'_, ()>> {
        self.round.try_lock()
    }

    /// Whether a previously issued kill is still inside its grace period
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending_until
            .lock()
            .map_or(false, |deadline| Instant::now() <= deadline)
    }

    /// Issue the termination, mark the victim, and arm the debounce.
    ///
    /// Signal-delivery failure means the target won the race to exit; the
    /// round still counts as an attempted kill, so the deadline is armed
    /// either way. Returns the victim's resident size as the freed estimate.
    pub fn execute_kill(&self, catalog: &dyn ProcessCatalog, victim: &ProcessCandidate) -> Pages {
        if !catalog.signal_kill(victim.pid) {
            debug!(
                pid = victim.pid,
                name = %victim.name,
                "Victim exited before signal delivery"
            );
        }
        // The catalog re-checks address-space presence under its own lock
        if !catalog.mark_kill_waiting(victim.pid) {
            debug!(pid = victim.pid, "Victim lost its address space before marking");
        }
        *self.pending_until.lock() = Some(Instant::now() + self.grace);
        victim.resident_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pid;
    use std::ops::ControlFlow;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct RacyCatalog {
        deliverable: AtomicBool,
    }

    impl ProcessCatalog for RacyCatalog {
        fn for_each_candidate(&self, _: &mut dyn FnMut(ProcessCandidate) -> ControlFlow<()>) {}

        fn signal_kill(&self, _pid: Pid) -> bool {
            self.deliverable.load(Ordering::SeqCst)
        }

        fn mark_kill_waiting(&self, _pid: Pid) -> bool {
            self.deliverable.load(Ordering::SeqCst)
        }
    }

    fn victim() -> ProcessCandidate {
        ProcessCandidate {
            pid: 7,
            tgid: 7,
            name: "victim".into(),
            resident_pages: 512,
            severity: 9,
            has_address_space: true,
            is_kill_waiting: false,
        }
    }

    #[test]
    fn test_kill_arms_debounce() {
        let coordinator = KillCoordinator::new(Duration::from_secs(1));
        let catalog = RacyCatalog {
            deliverable: AtomicBool::new(true),
        };

        assert!(!coordinator.is_pending());
        let freed = coordinator.execute_kill(&catalog, &victim());
        assert_eq!(freed, 512);
        assert!(coordinator.is_pending());
    }

    #[test]
    fn test_debounce_expires_after_grace() {
        let coordinator = KillCoordinator::new(Duration::from_millis(20));
        let catalog = RacyCatalog {
            deliverable: AtomicBool::new(true),
        };

        coordinator.execute_kill(&catalog, &victim());
        assert!(coordinator.is_pending());
        std::thread::sleep(Duration::from_millis(40));
        assert!(!coordinator.is_pending());
    }

    #[test]
    fn test_delivery_race_still_counts_for_debounce() {
        let coordinator = KillCoordinator::new(Duration::from_secs(1));
        let catalog = RacyCatalog {
            deliverable: AtomicBool::new(false),
        };

        let freed = coordinator.execute_kill(&catalog, &victim());
        assert_eq!(freed, 512);
        assert!(coordinator.is_pending());
    }

    #[test]
    fn test_round_guard_is_exclusive() {
        let coordinator = KillCoordinator::new(Duration::from_secs(1));

        let guard = coordinator.try_begin_round();
        assert!(guard.is_some());
        assert!(coordinator.try_begin_round().is_none());

        drop(guard);
        assert!(coordinator.try_begin_round().is_some());
    }
}
