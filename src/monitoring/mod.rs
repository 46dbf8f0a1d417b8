/*!
 * Monitoring Module
 * Tracing setup and per-kill audit records
 */

pub mod audit;
pub mod tracer;

pub use audit::{kill_record, KillRecord, Verbosity};
pub use tracer::init_tracing;
