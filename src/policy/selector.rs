/*!
 * Candidate Selector
 * Picks the single best kill victim at or above an eligibility severity
 */

use crate::catalog::{ProcessCandidate, ProcessCatalog};
use crate::core::types::Severity;
use std::ops::ControlFlow;
use tracing::debug;

/// Outcome of one catalog scan
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The best eligible candidate this round
    Victim(ProcessCandidate),
    /// A previous kill is still settling; the scan was aborted
    KillPending,
    /// Pressure holds but nothing qualifies
    Nothing,
}

/// Scan the catalog and pick the single best victim.
///
/// Preference is strictly higher severity, then strictly larger resident size
/// on a severity tie, so the first-seen maximal candidate wins regardless of
/// catalog order. `debounce_armed` is sampled by the caller before the scan;
/// encountering a kill-waiting candidate while it is set aborts the round
/// rather than piling a second kill onto a victim that is still exiting.
#[must_use]
pub fn select_victim(
    catalog: &dyn ProcessCatalog,
    min_severity: Severity,
    debounce_armed: bool,
) -> Selection {
    let mut best: Option<ProcessCandidate> = None;
    let mut aborted = false;

    catalog.for_each_candidate(&mut |candidate| {
        if !candidate.has_address_space {
            return ControlFlow::Continue(());
        }
        if candidate.is_kill_waiting && debounce_armed {
            aborted = true;
            return ControlFlow::Break(());
        }
        if candidate.severity < min_severity {
            return ControlFlow::Continue(());
        }
        if candidate.resident_pages == 0 {
            return ControlFlow::Continue(());
        }
        if let Some(current) = &best {
            if candidate.severity < current.severity {
                return ControlFlow::Continue(());
            }
            if candidate.severity == current.severity
                && candidate.resident_pages <= current.resident_pages
            {
                return ControlFlow::Continue(());
            }
        }
        debug!(
            pid = candidate.pid,
            name = %candidate.name,
            severity = candidate.severity,
            resident_pages = candidate.resident_pages,
            "New best victim"
        );
        best = Some(candidate);
        ControlFlow::Continue(())
    });

    if aborted {
        return Selection::KillPending;
    }
    match best {
        Some(victim) => Selection::Victim(victim),
        None => Selection::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Pages, Pid};

    struct VecCatalog(Vec<ProcessCandidate>);

    impl ProcessCatalog for VecCatalog {
        fn for_each_candidate(
            &self,
            visit: &mut dyn FnMut(ProcessCandidate) -> ControlFlow<()>,
        ) {
            for candidate in &self.0 {
                if visit(candidate.clone()).is_break() {
                    return;
                }
            }
        }

        fn signal_kill(&self, _pid: Pid) -> bool {
            true
        }

        fn mark_kill_waiting(&self, _pid: Pid) -> bool {
            true
        }
    }

    fn candidate(pid: Pid, severity: Severity, resident_pages: Pages) -> ProcessCandidate {
        ProcessCandidate {
            pid,
            tgid: pid,
            name: format!("task-{pid}"),
            resident_pages,
            severity,
            has_address_space: true,
            is_kill_waiting: false,
        }
    }

    #[test]
    fn test_higher_severity_beats_larger_size() {
        let catalog = VecCatalog(vec![
            candidate(1, 0, 50 * 256),
            candidate(2, 0, 200 * 256),
            candidate(3, 9, 10 * 256),
        ]);
        match select_victim(&catalog, 0, false) {
            Selection::Victim(v) => assert_eq!(v.pid, 3),
            other => panic!("expected victim, got {other:?}"),
        }
    }

    #[test]
    fn test_size_breaks_severity_tie_regardless_of_order() {
        let forward = VecCatalog(vec![candidate(1, 12, 75), candidate(2, 12, 300)]);
        let reverse = VecCatalog(vec![candidate(2, 12, 300), candidate(1, 12, 75)]);
        for catalog in [forward, reverse] {
            match select_victim(&catalog, 0, false) {
                Selection::Victim(v) => assert_eq!(v.pid, 2),
                other => panic!("expected victim, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_below_min_severity_excluded() {
        let catalog = VecCatalog(vec![candidate(1, 3, 1000), candidate(2, 8, 10)]);
        match select_victim(&catalog, 5, false) {
            Selection::Victim(v) => assert_eq!(v.pid, 2),
            other => panic!("expected victim, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_sized_candidate_never_selected() {
        let catalog = VecCatalog(vec![candidate(1, 8, 0)]);
        assert_eq!(select_victim(&catalog, 0, false), Selection::Nothing);
    }

    #[test]
    fn test_kernel_tasks_skipped() {
        let mut kthread = candidate(1, 15, 500);
        kthread.has_address_space = false;
        let catalog = VecCatalog(vec![kthread]);
        assert_eq!(select_victim(&catalog, 0, false), Selection::Nothing);
    }

    #[test]
    fn test_kill_waiting_aborts_scan_while_armed() {
        let mut waiting = candidate(1, 0, 100);
        waiting.is_kill_waiting = true;
        let catalog = VecCatalog(vec![waiting, candidate(2, 12, 400)]);
        assert_eq!(select_victim(&catalog, 0, true), Selection::KillPending);
    }

    #[test]
    fn test_kill_waiting_ignored_after_debounce_expiry() {
        let mut waiting = candidate(1, 0, 100);
        waiting.is_kill_waiting = true;
        let catalog = VecCatalog(vec![waiting, candidate(2, 12, 400)]);
        match select_victim(&catalog, 0, false) {
            Selection::Victim(v) => assert_eq!(v.pid, 2),
            other => panic!("expected victim, got {other:?}"),
        }
    }

    #[test]
    fn test_kernel_task_with_waiting_flag_does_not_abort() {
        // Address-space check runs before the debounce short-circuit
        let mut kthread = candidate(1, 0, 0);
        kthread.has_address_space = false;
        kthread.is_kill_waiting = true;
        let catalog = VecCatalog(vec![kthread, candidate(2, 4, 50)]);
        match select_victim(&catalog, 0, true) {
            Selection::Victim(v) => assert_eq!(v.pid, 2),
            other => panic!("expected victim, got {other:?}"),
        }
    }
}
