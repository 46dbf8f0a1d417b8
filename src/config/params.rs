/*!
 * Engine Parameters
 * Textual configuration parsing and the legacy severity-unit rescale
 */

use crate::core::limits::{
    DEFAULT_DEBUG_LEVEL, DEFAULT_MIN_FREE_PAGES, DEFAULT_RECLAIM_COST, DEFAULT_SEVERITIES,
    KILL_GRACE_PERIOD, LEGACY_SEVERITY_DISABLE, LEGACY_SEVERITY_MAX, MAX_PRESSURE_TIERS,
    SEVERITY_MAX,
};
use crate::core::types::Severity;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Configuration operation result
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Empty tier list")]
    EmptyList,

    #[error("Too many tiers: {given}, maximum {max}")]
    TooManyTiers { given: usize, max: usize },

    #[error("Invalid list entry '{0}'")]
    InvalidEntry(String),
}

/// Runtime parameters for the policy engine.
///
/// The severity and threshold lists are configured independently and may have
/// different lengths; the engine clamps to the shorter one at evaluation time.
#[derive(Debug, Clone)]
pub struct EngineParams {
    /// Minimum severity per tier, ascending
    pub severities: Vec<Severity>,
    /// Free-page floor per tier, ascending, paired positionally
    pub min_free_pages: Vec<u32>,
    /// Relative reclaim cost advertised to the host scheduler
    pub cost: u32,
    /// Audit verbosity, 0 = silent
    pub debug_level: u32,
    /// How long a kill stays in flight for debounce purposes
    pub grace_period: Duration,
    /// Rescale legacy-unit severity lists once at write time
    pub legacy_rescale: bool,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            severities: DEFAULT_SEVERITIES.to_vec(),
            min_free_pages: DEFAULT_MIN_FREE_PAGES.to_vec(),
            cost: DEFAULT_RECLAIM_COST,
            debug_level: DEFAULT_DEBUG_LEVEL,
            grace_period: KILL_GRACE_PERIOD,
            legacy_rescale: true,
        }
    }
}

impl EngineParams {
    /// Load parameters from `LOWMEMD_*` environment variables, falling back
    /// to the defaults for anything unset or malformed.
    pub fn from_env() -> Self {
        let mut params = Self::default();

        if let Ok(raw) = std::env::var("LOWMEMD_ADJ") {
            match parse_tier_list::<Severity>(&raw) {
                Ok(list) => params.severities = list,
                Err(e) => tracing::warn!(error = %e, "Ignoring LOWMEMD_ADJ"),
            }
        }
        if let Ok(raw) = std::env::var("LOWMEMD_MINFREE") {
            match parse_tier_list::<u32>(&raw) {
                Ok(list) => params.min_free_pages = list,
                Err(e) => tracing::warn!(error = %e, "Ignoring LOWMEMD_MINFREE"),
            }
        }
        if let Ok(raw) = std::env::var("LOWMEMD_COST") {
            if let Ok(cost) = raw.trim().parse() {
                params.cost = cost;
            }
        }
        if let Ok(raw) = std::env::var("LOWMEMD_DEBUG_LEVEL") {
            if let Ok(level) = raw.trim().parse() {
                params.debug_level = level;
            }
        }

        params
    }
}

/// Parse a comma-separated tier list ("0,1,6,12") into at most
/// `MAX_PRESSURE_TIERS` entries. Ordering is not validated here; a
/// non-ascending list is accepted for compatibility.
pub fn parse_tier_list<T: FromStr>(raw: &str) -> ConfigResult<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyList);
    }

    let entries: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if entries.len() > MAX_PRESSURE_TIERS {
        return Err(ConfigError::TooManyTiers {
            given: entries.len(),
            max: MAX_PRESSURE_TIERS,
        });
    }

    entries
        .into_iter()
        .map(|e| e.parse().map_err(|_| ConfigError::InvalidEntry(e.into())))
        .collect()
}

/// Convert one legacy-unit severity to the native scale
#[inline]
#[must_use]
pub const fn legacy_to_native(legacy: Severity) -> Severity {
    if legacy == LEGACY_SEVERITY_MAX {
        SEVERITY_MAX
    } else {
        (legacy as i32 * SEVERITY_MAX as i32 / -(LEGACY_SEVERITY_DISABLE as i32)) as Severity
    }
}

/// One-shot compatibility rescale applied when a severity list is written.
///
/// If the last configured entry still fits the legacy narrow range, the whole
/// list is rescaled into the native scale. Skipped when the conversion would
/// be ambiguous (the rescaled last entry stays inside the legacy range).
/// Returns whether a rescale happened. Never called on the evaluation path.
pub fn rescale_legacy_severities(severities: &mut [Severity]) -> bool {
    let Some(&last) = severities.last() else {
        return false;
    };
    if last > LEGACY_SEVERITY_MAX {
        return false;
    }
    if legacy_to_native(last) <= LEGACY_SEVERITY_MAX {
        return false;
    }

    for value in severities.iter_mut() {
        let native = legacy_to_native(*value);
        info!(legacy = *value, native, "Rescaling legacy severity unit");
        *value = native;
    }
    true
}
