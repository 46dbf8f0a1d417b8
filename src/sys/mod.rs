/*!
 * System Adapters
 * /proc-backed implementations of the collaborator traits (unix-only)
 */

pub mod meminfo;
pub mod proc_catalog;

pub use meminfo::ProcMemoryProvider;
pub use proc_catalog::ProcCatalog;
