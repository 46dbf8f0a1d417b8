/*!
 * Threshold Table
 * Ordered pressure tiers and their RCU-protected shared handle
 */

use crate::config::rescale_legacy_severities;
use crate::core::limits::MAX_PRESSURE_TIERS;
use crate::core::types::Severity;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::warn;

/// One pressure level: kill at `min_severity` or above once available memory
/// drops below `min_free_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureTier {
    pub min_severity: Severity,
    pub min_free_pages: u32,
}

/// Ordered tier configuration.
///
/// The severity and threshold lists are reconfigured independently and may
/// diverge in length; the usable tier count is always the shorter of the two.
/// Ordering is not validated: a non-ascending table is accepted as-is for
/// compatibility with existing configurations.
#[derive(Debug, Clone, Default)]
pub struct ThresholdTable {
    severities: Vec<Severity>,
    min_free_pages: Vec<u32>,
}

impl ThresholdTable {
    #[must_use]
    pub fn new(severities: Vec<Severity>, min_free_pages: Vec<u32>) -> Self {
        Self {
            severities,
            min_free_pages,
        }
    }

    /// Usable tier count: min of the two configured lengths, capped at capacity
    #[inline]
    #[must_use]
    pub fn effective_len(&self) -> usize {
        self.severities
            .len()
            .min(self.min_free_pages.len())
            .min(MAX_PRESSURE_TIERS)
    }

    /// Tier at index `i`, for `i < effective_len()`
    #[inline]
    #[must_use]
    pub fn tier_at(&self, i: usize) -> PressureTier {
        PressureTier {
            min_severity: self.severities[i],
            min_free_pages: self.min_free_pages[i],
        }
    }

    /// Iterate usable tiers from least to most severe
    pub fn tiers(&self) -> impl Iterator<Item = PressureTier> + '_ {
        (0..self.effective_len()).map(move |i| self.tier_at(i))
    }

    fn warn_if_unordered(&self) {
        let n = self.effective_len();
        for i in 1..n {
            let prev = self.tier_at(i - 1);
            let cur = self.tier_at(i);
            if cur.min_severity < prev.min_severity || cur.min_free_pages < prev.min_free_pages {
                warn!(
                    tier = i,
                    "Threshold table is not ascending; accepting as configured"
                );
                return;
            }
        }
    }
}

/// Process-wide shared handle to the threshold table.
///
/// Reads are lock-free atomic pointer loads; reconfiguration is
/// clone-modify-swap, so readers always see a consistent table rather than a
/// torn mix of old and new entries.
#[derive(Clone)]
pub struct SharedThresholds {
    inner: Arc<ArcSwap<ThresholdTable>>,
}

impl SharedThresholds {
    #[must_use]
    pub fn new(table: ThresholdTable) -> Self {
        table.warn_if_unordered();
        Self {
            inner: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    /// Current table (zero-contention load)
    #[inline]
    pub fn load(&self) -> Arc<ThresholdTable> {
        self.inner.load_full()
    }

    /// Replace the severity list.
    ///
    /// With `legacy_rescale`, a list still expressed in the legacy narrow
    /// unit is rescaled into the native scale once, at write time.
    pub fn set_severities(&self, mut severities: Vec<Severity>, legacy_rescale: bool) {
        severities.truncate(MAX_PRESSURE_TIERS);
        if legacy_rescale {
            rescale_legacy_severities(&mut severities);
        }
        self.inner.rcu(|table| {
            let mut next = ThresholdTable::clone(table);
            next.severities = severities.clone();
            next
        });
        self.load().warn_if_unordered();
    }

    /// Replace the free-page threshold list
    pub fn set_min_free(&self, mut min_free_pages: Vec<u32>) {
        min_free_pages.truncate(MAX_PRESSURE_TIERS);
        self.inner.rcu(|table| {
            let mut next = ThresholdTable::clone(table);
            next.min_free_pages = min_free_pages.clone();
            next
        });
        self.load().warn_if_unordered();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_len_clamps_to_shorter_list() {
        let table = ThresholdTable::new(vec![0, 1, 6, 12], vec![1024, 2048]);
        assert_eq!(table.effective_len(), 2);

        let table = ThresholdTable::new(vec![0], vec![1024, 2048, 4096]);
        assert_eq!(table.effective_len(), 1);
    }

    #[test]
    fn test_effective_len_caps_at_capacity() {
        let severities = vec![0; 8];
        let thresholds = vec![100; 8];
        let table = ThresholdTable::new(severities, thresholds);
        assert_eq!(table.effective_len(), MAX_PRESSURE_TIERS);
    }

    #[test]
    fn test_tier_iteration_order() {
        let table = ThresholdTable::new(vec![0, 8], vec![192, 1024]);
        let tiers: Vec<_> = table.tiers().collect();
        assert_eq!(
            tiers,
            vec![
                PressureTier {
                    min_severity: 0,
                    min_free_pages: 192
                },
                PressureTier {
                    min_severity: 8,
                    min_free_pages: 1024
                },
            ]
        );
    }

    #[test]
    fn test_non_ascending_table_accepted() {
        let table = ThresholdTable::new(vec![12, 0], vec![4096, 1024]);
        assert_eq!(table.effective_len(), 2);
        assert_eq!(table.tier_at(0).min_severity, 12);
    }

    #[test]
    fn test_shared_reconfiguration() {
        let shared = SharedThresholds::new(ThresholdTable::new(vec![0, 1], vec![512, 1024]));

        shared.set_min_free(vec![256, 768, 2048]);
        let table = shared.load();
        // Severity list still has two entries, so only two tiers are usable
        assert_eq!(table.effective_len(), 2);
        assert_eq!(table.tier_at(1).min_free_pages, 768);

        shared.set_severities(vec![0, 100, 500], false);
        assert_eq!(shared.load().effective_len(), 3);
    }

    #[test]
    fn test_shared_set_severities_applies_legacy_rescale() {
        let shared = SharedThresholds::new(ThresholdTable::default());
        shared.set_severities(vec![0, 1, 6, 12], true);
        let table = shared.load();
        assert_eq!(table.severities, vec![0, 58, 352, 705]);
    }

    #[test]
    fn test_oversized_writes_truncate() {
        let shared = SharedThresholds::new(ThresholdTable::default());
        shared.set_min_free((0..10).map(|i| i * 100).collect());
        assert_eq!(shared.load().min_free_pages.len(), MAX_PRESSURE_TIERS);
    }
}
