//! Record id generation.
//!
//! # Responsibility
//! - Issue integer ids that read like epoch milliseconds.
//! - Guarantee uniqueness within one process even when several records are
//!   created inside the same millisecond.
//!
//! # Invariants
//! - Ids returned by one generator are strictly increasing until they
//!   saturate at `i64::MAX`.
//! - Ids are always `> 0`.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicI64, Ordering};

static GLOBAL_IDS: Lazy<IdGenerator> = Lazy::new(IdGenerator::new);

/// Monotonic millisecond-based id source.
pub struct IdGenerator {
    last: AtomicI64,
    clock: fn() -> i64,
}

impl IdGenerator {
    /// Creates a generator backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(now_epoch_ms)
    }

    /// Creates a generator with a caller-provided millisecond clock.
    pub fn with_clock(clock: fn() -> i64) -> Self {
        Self {
            last: AtomicI64::new(0),
            clock,
        }
    }

    /// Returns the next id: the current time, or one past the last issued id
    /// when the clock has not advanced.
    pub fn next_id(&self) -> i64 {
        let now = (self.clock)().max(1);
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current.saturating_add(1));
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => current = observed,
            }
        }
    }

    /// Returns the next id for which `taken` is false.
    ///
    /// Used when ids loaded from storage (issued by an earlier process) might
    /// collide with the ones this process generates.
    pub fn next_unique(&self, taken: impl Fn(i64) -> bool) -> i64 {
        loop {
            let candidate = self.next_id();
            if !taken(candidate) {
                return candidate;
            }
            if candidate == i64::MAX {
                // Saturated: hand out the highest free id below the ceiling.
                return (1..i64::MAX).rev().find(|id| !taken(*id)).unwrap_or(1);
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns a fresh id from the process-wide generator.
pub fn next_id() -> i64 {
    GLOBAL_IDS.next_id()
}

/// Returns a fresh id from the process-wide generator that is not `taken`.
pub fn next_unique_id(taken: impl Fn(i64) -> bool) -> i64 {
    GLOBAL_IDS.next_unique(taken)
}

fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::IdGenerator;

    fn frozen_clock() -> i64 {
        1_700_000_000_000
    }

    #[test]
    fn frozen_clock_still_yields_increasing_ids() {
        let ids = IdGenerator::with_clock(frozen_clock);
        let first = ids.next_id();
        let second = ids.next_id();
        let third = ids.next_id();

        assert_eq!(first, 1_700_000_000_000);
        assert_eq!(second, 1_700_000_000_001);
        assert_eq!(third, 1_700_000_000_002);
    }

    #[test]
    fn next_unique_skips_taken_ids() {
        let ids = IdGenerator::with_clock(frozen_clock);
        let taken = [1_700_000_000_000_i64, 1_700_000_000_001];

        let id = ids.next_unique(|candidate| taken.contains(&candidate));
        assert_eq!(id, 1_700_000_000_002);
    }

    #[test]
    fn ids_saturate_at_max_without_overflow() {
        let ids = IdGenerator::with_clock(|| i64::MAX);
        assert_eq!(ids.next_id(), i64::MAX);
        assert_eq!(ids.next_id(), i64::MAX);

        let id = ids.next_unique(|candidate| candidate >= i64::MAX - 1);
        assert_eq!(id, i64::MAX - 2);
    }

    #[test]
    fn system_clock_ids_are_positive_and_strictly_increasing() {
        let ids = IdGenerator::new();
        let mut previous = 0;
        for _ in 0..1_000 {
            let id = ids.next_id();
            assert!(id > previous);
            previous = id;
        }
    }
}
