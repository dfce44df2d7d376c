//! Break-length policy.
//!
//! Short focus intervals earn a proportionally shorter break; intervals past
//! the target earn the default break plus 10% of the overtime.

/// Nominal focus interval, in seconds (25 minutes).
pub const FOCUS_TARGET_SECS: u64 = 25 * 60;

/// Break earned by a full focus interval, in seconds (5 minutes).
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;

/// Map a completed work duration to a break duration.
///
/// All arithmetic is integer, so results floor exactly.
pub fn compute_break(worked_secs: u64) -> u64 {
    if worked_secs < FOCUS_TARGET_SECS {
        DEFAULT_BREAK_SECS * worked_secs / FOCUS_TARGET_SECS
    } else {
        let extra = worked_secs - FOCUS_TARGET_SECS;
        DEFAULT_BREAK_SECS.saturating_add(extra / 10)
    }
}
