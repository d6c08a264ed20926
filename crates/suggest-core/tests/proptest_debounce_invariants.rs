//! Property-based invariant tests for the stopped-typing debouncer.
//!
//! For any schedule of restarts followed by polls:
//!
//! 1. At most one fire happens per quiet period.
//! 2. A fire only happens once `interval` has elapsed since the last restart.
//! 3. Earlier restarts never fire once superseded.
//! 4. `remaining` never exceeds the interval.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use suggest_core::debounce::Debouncer;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Millisecond gaps between consecutive keystrokes.
fn gaps_strategy() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(0u64..2_000, 1..40)
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Fires exactly when a gap reaches the interval
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fires_once_per_quiet_gap(gaps in gaps_strategy(), interval_ms in 1u64..1_500) {
        let interval = Duration::from_millis(interval_ms);
        let mut timer = Debouncer::new(interval);
        let t0 = Instant::now();
        let mut now = t0;
        let mut fires = 0usize;
        let mut expected = 0usize;

        timer.restart(now);
        for gap in &gaps {
            // Poll just before and at the end of each gap.
            let next = now + Duration::from_millis(*gap);
            if *gap > 0 && timer.poll(next - Duration::from_millis(1)) {
                fires += 1;
            }
            if timer.poll(next) {
                fires += 1;
            }
            if *gap >= interval_ms {
                expected += 1;
            }
            now = next;
            timer.restart(now);
        }

        prop_assert_eq!(fires, expected, "gaps={:?} interval={}ms", gaps, interval_ms);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Superseded restarts never fire
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn only_latest_restart_fires(restarts in 1usize..20, step_ms in 1u64..799) {
        let mut timer = Debouncer::default();
        let t0 = Instant::now();
        let mut last = t0;
        for i in 0..restarts {
            last = t0 + Duration::from_millis(step_ms * i as u64);
            prop_assert!(!timer.poll(last));
            timer.restart(last);
        }
        prop_assert_eq!(timer.generation(), restarts as u64);
        prop_assert!(!timer.poll(last + Duration::from_millis(799)));
        prop_assert!(timer.poll(last + Duration::from_millis(800)));
        prop_assert!(!timer.is_pending());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Remaining is bounded by the interval
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn remaining_bounded(offset_ms in 0u64..5_000) {
        let mut timer = Debouncer::default();
        let t0 = Instant::now();
        timer.restart(t0);
        let remaining = timer.remaining(t0 + Duration::from_millis(offset_ms));
        prop_assert!(remaining.is_some());
        prop_assert!(remaining.unwrap_or_default() <= timer.interval());
    }
}
