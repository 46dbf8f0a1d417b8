/*!
 * Configuration Module
 * Parameter parsing and runtime reconfiguration support
 */

pub mod params;

pub use params::{
    legacy_to_native, parse_tier_list, rescale_legacy_severities, ConfigError, ConfigResult,
    EngineParams,
};
