/*!
 * Kill Audit
 * Structured per-kill records and the verbosity knob gating them
 */

use crate::core::types::{pages_to_kb, signed_pages_to_kb, Pid, Severity, Tgid};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;

/// Runtime-adjustable diagnostic verbosity.
///
/// 0 silences everything; each level adds detail, mirroring the historical
/// debug_level knob: 1 kill audit, 2 selection trace, 3 scan entry, 4 scan
/// return, 5 no-pressure chatter.
#[derive(Debug)]
pub struct Verbosity(AtomicU32);

impl Verbosity {
    #[must_use]
    pub const fn new(level: u32) -> Self {
        Self(AtomicU32::new(level))
    }

    #[inline]
    #[must_use]
    pub fn at(&self, level: u32) -> bool {
        self.0.load(Ordering::Relaxed) >= level
    }

    pub fn set(&self, level: u32) {
        self.0.store(level, Ordering::Relaxed);
    }

    #[must_use]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Audit record emitted once per kill, for post-hoc analysis of kill
/// decisions. Never consulted by control flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KillRecord {
    pub pid: Pid,
    pub tgid: Tgid,
    pub name: String,
    /// The victim's own severity score
    pub severity: Severity,
    /// Minimum eligibility severity of the triggering tier
    pub min_severity: Severity,
    /// Estimated memory relieved by the kill
    pub resident_kb: u64,
    /// The triggering tier's free-memory floor
    pub threshold_kb: u64,
    /// Free memory above the reserve at decision time
    pub free_kb: i64,
    /// File-cache pages at decision time
    pub cache_kb: u64,
}

impl KillRecord {
    /// Emit the record through structured logging, with a JSON rendering for
    /// downstream collectors.
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        info!(
            pid = self.pid,
            tgid = self.tgid,
            name = %self.name,
            severity = self.severity,
            resident_kb = self.resident_kb,
            threshold_kb = self.threshold_kb,
            free_kb = self.free_kb,
            cache_kb = self.cache_kb,
            record = %json,
            "Killing '{}' ({}) to free {}kB: cache {}kB below limit {}kB for severity {}, \
             free memory {}kB above reserve",
            self.name,
            self.pid,
            self.resident_kb,
            self.cache_kb,
            self.threshold_kb,
            self.min_severity,
            self.free_kb,
        );
    }
}

/// Build a kill record from page-denominated decision inputs
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn kill_record(
    pid: Pid,
    tgid: Tgid,
    name: String,
    severity: Severity,
    min_severity: Severity,
    resident_pages: u64,
    threshold_pages: u64,
    free_pages: i64,
    cache_pages: u64,
) -> KillRecord {
    KillRecord {
        pid,
        tgid,
        name,
        severity,
        min_severity,
        resident_kb: pages_to_kb(resident_pages),
        threshold_kb: pages_to_kb(threshold_pages),
        free_kb: signed_pages_to_kb(free_pages),
        cache_kb: pages_to_kb(cache_pages),
    }
}
