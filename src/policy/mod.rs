/*!
 * Policy Module
 * Threshold evaluation and victim selection
 */

pub mod evaluator;
pub mod selector;
pub mod thresholds;

pub use evaluator::{evaluate, PressureVerdict};
pub use selector::{select_victim, Selection};
pub use thresholds::{PressureTier, SharedThresholds, ThresholdTable};
