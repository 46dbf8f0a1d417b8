/*!
 * /proc Process Catalog
 * Live candidate enumeration and SIGKILL delivery for the daemon
 */

use crate::catalog::{ProcessCandidate, ProcessCatalog};
use crate::core::types::{Pages, Pid, Severity};
use dashmap::DashMap;
use nix::sys::signal::{kill, Signal};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// Virtual and resident sizes from /proc/<pid>/statm, in pages
fn parse_statm(contents: &str) -> Option<(Pages, Pages)> {
    let mut fields = contents.split_whitespace();
    let total = fields.next()?.parse().ok()?;
    let resident = fields.next()?.parse().ok()?;
    Some((total, resident))
}

/// Process catalog backed by the /proc filesystem.
///
/// The kernel stabilizes each /proc read for us; the kill-waiting flag has no
/// userspace representation, so it lives in a shared map keyed by pid and is
/// pruned as marked processes disappear from /proc.
pub struct ProcCatalog {
    proc_root: PathBuf,
    kill_waiting: DashMap<Pid, ()>,
}

impl ProcCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            kill_waiting: DashMap::new(),
        }
    }

    fn pid_dir(&self, pid: Pid) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }

    fn read_candidate(&self, dir: &Path, pid: Pid) -> Option<ProcessCandidate> {
        let name = std::fs::read_to_string(dir.join("comm"))
            .ok()?
            .trim()
            .to_string();
        let severity: Severity = std::fs::read_to_string(dir.join("oom_score_adj"))
            .ok()?
            .trim()
            .parse()
            .ok()?;
        let statm = std::fs::read_to_string(dir.join("statm")).ok()?;
        let (total, resident) = parse_statm(&statm)?;

        Some(ProcessCandidate {
            pid,
            // Top-level /proc entries are thread-group leaders
            tgid: pid,
            name,
            resident_pages: resident,
            severity,
            has_address_space: total > 0,
            is_kill_waiting: self.kill_waiting.contains_key(&pid),
        })
    }
}

impl Default for ProcCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCatalog for ProcCatalog {
    fn for_each_candidate(&self, visit: &mut dyn FnMut(ProcessCandidate) -> ControlFlow<()>) {
        let Ok(entries) = std::fs::read_dir(&self.proc_root) else {
            return;
        };

        // Marked pids that no longer exist have finished exiting
        self.kill_waiting
            .retain(|pid, _| self.pid_dir(*pid).exists());

        for entry in entries.flatten() {
            let Ok(pid) = entry.file_name().to_string_lossy().parse::<Pid>() else {
                continue;
            };
            let Some(candidate) = self.read_candidate(&entry.path(), pid) else {
                // Vanished mid-scan; skip
                continue;
            };
            if visit(candidate).is_break() {
                return;
            }
        }
    }

    fn signal_kill(&self, pid: Pid) -> bool {
        kill(nix::unistd::Pid::from_raw(pid as i32), Signal::SIGKILL).is_ok()
    }

    fn mark_kill_waiting(&self, pid: Pid) -> bool {
        // Re-check address-space presence at the moment of marking
        let dir = self.pid_dir(pid);
        let still_mapped = std::fs::read_to_string(dir.join("statm"))
            .ok()
            .and_then(|s| parse_statm(&s))
            .map_or(false, |(total, _)| total > 0);
        if still_mapped {
            self.kill_waiting.insert(pid, ());
        }
        still_mapped
    }
}
