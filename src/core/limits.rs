/*!
 * System Limits and Constants
 *
 * Centralized location for the engine's limits, defaults, and magic numbers.
 * Linux-compatible values are marked with [LINUX-COMPAT].
 */

use crate::core::types::Severity;
use std::time::Duration;

/// Maximum number of pressure tiers in the threshold table
/// [LINUX-COMPAT] Matches the classic lowmemorykiller 6-entry arrays
pub const MAX_PRESSURE_TIERS: usize = 6;

/// Highest native severity value
/// [LINUX-COMPAT] Matches OOM_SCORE_ADJ_MAX
pub const SEVERITY_MAX: Severity = 1000;

/// Highest severity in the legacy narrow unit
/// [LINUX-COMPAT] Matches OOM_ADJUST_MAX
pub const LEGACY_SEVERITY_MAX: Severity = 15;

/// Legacy "never kill" sentinel, used as the rescale divisor
/// [LINUX-COMPAT] Matches OOM_DISABLE (-17)
pub const LEGACY_SEVERITY_DISABLE: Severity = -17;

/// How long a kill is considered in flight before the debounce expires
pub const KILL_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Default severity tiers (least to most killable)
pub const DEFAULT_SEVERITIES: [Severity; 4] = [0, 1, 6, 12];

/// Default free-page thresholds, paired positionally with the severities
/// 1536 pages = 6MB, 2048 = 8MB, 4096 = 16MB, 16384 = 64MB
pub const DEFAULT_MIN_FREE_PAGES: [u32; 4] = [3 * 512, 2 * 1024, 4 * 1024, 16 * 1024];

/// Default cost hint advertised to the host reclaim scheduler
/// [LINUX-COMPAT] DEFAULT_SEEKS (2) * 16
pub const DEFAULT_RECLAIM_COST: u32 = 32;

/// Default audit verbosity (0 silent, 5 maximum detail)
pub const DEFAULT_DEBUG_LEVEL: u32 = 1;
