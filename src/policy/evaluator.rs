/*!
 * Pressure Evaluator
 * Maps a memory snapshot onto the threshold table
 */

use crate::core::types::Severity;
use crate::policy::thresholds::ThresholdTable;

/// Outcome of a pressure evaluation: the lowest-severity tier whose
/// free-memory floor is breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureVerdict {
    /// Minimum severity a candidate needs to be kill-eligible this round
    pub min_severity: Severity,
    /// Index of the breached tier
    pub tier_index: usize,
    /// The breached tier's threshold, in pages
    pub min_free_pages: u32,
}

/// Evaluate current pressure against the tier table.
///
/// Tiers are cumulative tripwires walked from least to most severe: the FIRST
/// tier whose threshold exceeds the available quantity decides the round,
/// even if later tiers are also breached. Returns `None` when no floor is
/// crossed ("no pressure").
#[must_use]
pub fn evaluate(available_pages: i64, table: &ThresholdTable) -> Option<PressureVerdict> {
    for (tier_index, tier) in table.tiers().enumerate() {
        if available_pages < tier.min_free_pages as i64 {
            return Some(PressureVerdict {
                min_severity: tier.min_severity,
                tier_index,
                min_free_pages: tier.min_free_pages,
            });
        }
    }
    None
}
