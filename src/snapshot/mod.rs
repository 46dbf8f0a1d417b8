/*!
 * Memory Snapshots
 * Point-in-time system memory counters and the provider seam
 */

use crate::core::types::Pages;
use serde::{Deserialize, Serialize};

/// Point-in-time read of system-wide memory counters, in pages.
///
/// Produced fresh for every evaluation round and never cached.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemorySnapshot {
    /// Free pages as reported by the host memory manager
    pub free_pages: Pages,
    /// File-cache pages, excluding shared, unevictable, and swap-cache pages
    pub file_cache_pages: Pages,
    /// Free pages inside the CMA reserve, unusable for unmovable requests
    pub cma_free_pages: Pages,
    /// Pages the host keeps in reserve and never hands out
    pub reserved_pages: Pages,
}

impl MemorySnapshot {
    /// Free pages usable for unmovable allocations, net of reserves.
    ///
    /// Signed because reserves can exceed the free count under heavy pressure.
    #[inline]
    #[must_use]
    pub fn unreserved_free(&self) -> i64 {
        self.free_pages as i64 - self.reserved_pages as i64 - self.cma_free_pages as i64
    }
}

/// Supplies current memory counters on demand.
///
/// The host memory manager owns the real accounting; implementations are thin
/// adapters over it. The available-pages formula varies by platform, so it
/// lives here rather than in the evaluator.
pub trait MemorySnapshotProvider: Send + Sync {
    /// Take a fresh snapshot of the system-wide counters
    fn snapshot(&self) -> MemorySnapshot;

    /// Upper-bound estimate of reclaimable memory (active + inactive pages).
    ///
    /// Only used to tell the host scheduler there is potentially something to
    /// reclaim; never consulted by the selection logic.
    fn reclaimable_pages(&self) -> Pages;

    /// Pages considered available when comparing against tier thresholds.
    ///
    /// Platform-specific adjustments (cache treatment, CMA exclusions)
    /// override this; the default counts free pages net of reserves.
    fn available_pages(&self, snapshot: &MemorySnapshot) -> i64 {
        snapshot.unreserved_free()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_free_goes_negative() {
        let snap = MemorySnapshot {
            free_pages: 100,
            reserved_pages: 150,
            ..Default::default()
        };
        assert_eq!(snap.unreserved_free(), -50);
    }

    #[test]
    fn test_cma_excluded_from_available() {
        let snap = MemorySnapshot {
            free_pages: 1000,
            cma_free_pages: 300,
            reserved_pages: 100,
            ..Default::default()
        };
        assert_eq!(snap.unreserved_free(), 600);
    }
}
