//! Cosmetic upload progress heartbeat.
//!
//! While a video is `uploaded` or `processing`, the UI shows a progress
//! percentage that advances by a fixed step on each status poll and is
//! capped below 100 until the server reports `ready`. It is a UI
//! heartbeat, not a measurement: the original product had no real
//! byte/frame progress signal for server-side processing, and this
//! reproduces its behavior exactly.

/// Increment applied per poll tick while processing.
pub const PROGRESS_TICK: u8 = 3;

/// Ceiling while the video is still non-terminal.
pub const PROGRESS_CAP: u8 = 95;

/// Value set once the video reaches `ready`.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Advance the cosmetic progress by one tick, capped at [`PROGRESS_CAP`].
pub fn tick(current: u8) -> u8 {
    current.saturating_add(PROGRESS_TICK).min(PROGRESS_CAP)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_by_three() {
        assert_eq!(tick(0), 3);
        assert_eq!(tick(42), 45);
    }

    #[test]
    fn tick_caps_at_95() {
        assert_eq!(tick(93), 95);
        assert_eq!(tick(94), 95);
        assert_eq!(tick(95), 95);
    }

    #[test]
    fn tick_is_monotonic_up_to_cap() {
        let mut p = 0;
        for _ in 0..100 {
            let next = tick(p);
            assert!(next >= p);
            assert!(next <= PROGRESS_CAP);
            p = next;
        }
        assert_eq!(p, PROGRESS_CAP);
    }
}
