/*!
 * lowmemd Library
 * Memory-pressure kill policy engine
 *
 * Given an ordered table of (severity, free-page-threshold) tiers and live
 * memory/process views borrowed from the host, decides whether the system is
 * low on memory and, if so, selects and kills exactly one process per
 * reclaim round.
 */

pub mod catalog;
pub mod config;
pub mod core;
pub mod monitoring;
pub mod policy;
pub mod reclaim;
pub mod snapshot;
#[cfg(unix)]
pub mod sys;

// Re-exports
pub use catalog::{ProcessCandidate, ProcessCatalog};
pub use config::EngineParams;
pub use monitoring::init_tracing;
pub use policy::{SharedThresholds, ThresholdTable};
pub use reclaim::{PolicyEngine, ReclaimSource};
pub use snapshot::{MemorySnapshot, MemorySnapshotProvider};
