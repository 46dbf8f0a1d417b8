/*!
 * Reclaim Module
 * The kill coordinator and the host-facing reclaim engine
 */

pub mod coordinator;
pub mod engine;

pub use coordinator::KillCoordinator;
pub use engine::{PolicyEngine, ReclaimSource};
