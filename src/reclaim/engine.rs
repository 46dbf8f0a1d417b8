/*!
 * Policy Engine
 * Composes evaluation, selection, and the kill into one reclaim round
 */

use crate::catalog::ProcessCatalog;
use crate::config::EngineParams;
use crate::core::types::{Pages, Severity};
use crate::monitoring::audit::{kill_record, Verbosity};
use crate::policy::{evaluate, select_victim, Selection, SharedThresholds, ThresholdTable};
use crate::reclaim::coordinator::KillCoordinator;
use crate::snapshot::MemorySnapshotProvider;
use tracing::debug;

/// Two-operation interface the host reclaim scheduler drives.
///
/// The host calls `estimate` to decide whether reclaiming is worthwhile and
/// `reclaim` to actually do it; no ordering is guaranteed between the two,
/// and `reclaim` may be invoked concurrently from independent contexts.
pub trait ReclaimSource: Send + Sync {
    /// Cheap upper-bound estimate of reclaimable memory, in pages
    fn estimate(&self) -> Pages;

    /// Run one evaluation-selection-kill round and return the pages
    /// nominally freed. At most one victim per call, regardless of `budget`.
    fn reclaim(&self, budget: Pages) -> Pages;
}

/// The memory-pressure policy engine.
///
/// Holds the shared threshold table and the kill debounce; borrows live
/// memory counters and process views from the host-provided collaborators.
pub struct PolicyEngine<P, C> {
    provider: P,
    catalog: C,
    thresholds: SharedThresholds,
    coordinator: KillCoordinator,
    verbosity: Verbosity,
    cost: u32,
    legacy_rescale: bool,
}

impl<P, C> PolicyEngine<P, C>
where
    P: MemorySnapshotProvider,
    C: ProcessCatalog,
{
    #[must_use]
    pub fn new(provider: P, catalog: C, params: EngineParams) -> Self {
        // Boot-time tables are taken verbatim; the legacy rescale only
        // applies to severity lists written through reconfiguration.
        let table = ThresholdTable::new(params.severities, params.min_free_pages);
        Self {
            provider,
            catalog,
            thresholds: SharedThresholds::new(table),
            coordinator: KillCoordinator::new(params.grace_period),
            verbosity: Verbosity::new(params.debug_level),
            cost: params.cost,
            legacy_rescale: params.legacy_rescale,
        }
    }

    /// Relative reclaim cost advertised to the host scheduler
    #[inline]
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Audit verbosity knob
    #[inline]
    #[must_use]
    pub fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    /// Privileged reconfiguration of the severity list
    pub fn reconfigure_severities(&self, severities: Vec<Severity>) {
        self.thresholds
            .set_severities(severities, self.legacy_rescale);
    }

    /// Privileged reconfiguration of the free-page threshold list
    pub fn reconfigure_min_free(&self, min_free_pages: Vec<u32>) {
        self.thresholds.set_min_free(min_free_pages);
    }
}

impl<P, C> ReclaimSource for PolicyEngine<P, C>
where
    P: MemorySnapshotProvider,
    C: ProcessCatalog,
{
    fn estimate(&self) -> Pages {
        self.provider.reclaimable_pages()
    }

    fn reclaim(&self, budget: Pages) -> Pages {
        // One round at a time; an overlapping invocation is reported as
        // debounced rather than allowed to double-kill.
        let Some(_round) = self.coordinator.try_begin_round() else {
            if self.verbosity.at(3) {
                debug!(budget, "Reclaim round already in flight");
            }
            return 0;
        };

        let table = self.thresholds.load();
        let snapshot = self.provider.snapshot();
        let available = self.provider.available_pages(&snapshot);

        if self.verbosity.at(3) {
            debug!(
                budget,
                available,
                free_pages = snapshot.free_pages,
                file_cache_pages = snapshot.file_cache_pages,
                "Scanning for pressure"
            );
        }

        let Some(verdict) = evaluate(available, &table) else {
            if self.verbosity.at(5) {
                debug!(available, "No tier breached; nothing to do");
            }
            return 0;
        };

        let selection = select_victim(
            &self.catalog,
            verdict.min_severity,
            self.coordinator.is_pending(),
        );

        match selection {
            Selection::KillPending => {
                if self.verbosity.at(4) {
                    debug!("Previous kill still settling; deferring");
                }
                0
            }
            Selection::Nothing => {
                if self.verbosity.at(2) {
                    debug!(
                        min_severity = verdict.min_severity,
                        "Pressure detected but no eligible candidate"
                    );
                }
                0
            }
            Selection::Victim(victim) => {
                let freed = self.coordinator.execute_kill(&self.catalog, &victim);
                if self.verbosity.at(1) {
                    kill_record(
                        victim.pid,
                        victim.tgid,
                        victim.name.clone(),
                        victim.severity,
                        verdict.min_severity,
                        victim.resident_pages,
                        verdict.min_free_pages as u64,
                        available,
                        snapshot.file_cache_pages,
                    )
                    .emit();
                }
                freed
            }
        }
    }
}
