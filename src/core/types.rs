/*!
 * Core Types
 * Common types used across the policy engine
 */

/// Process ID type
pub type Pid = u32;

/// Thread group ID type
pub type Tgid = u32;

/// Page count type for memory accounting
pub type Pages = u64;

/// Kill-eligibility score; higher means more killable under pressure
pub type Severity = i16;

/// Bytes per page (4KB pages assumed throughout)
pub const PAGE_SIZE: u64 = 4096;

/// Convert a page count to kilobytes for audit output
#[inline]
#[must_use]
pub const fn pages_to_kb(pages: u64) -> u64 {
    pages * (PAGE_SIZE / 1024)
}

/// Convert a signed page quantity to kilobytes for audit output
#[inline]
#[must_use]
pub const fn signed_pages_to_kb(pages: i64) -> i64 {
    pages * (PAGE_SIZE / 1024) as i64
}
