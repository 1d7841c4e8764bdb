//! Fire-decision policies injected into the scheduling lifecycle.
//!
//! The lifecycle in [`crate::scheduler`] is generic over a [`TickPolicy`]
//! value: on every timer tick it asks the policy whether the user callback
//! should run. The two policies here are the "always fire" fixed-delay
//! variant and the wall-clock time-of-day matcher.

use std::sync::{Arc, RwLock};

use chrono_tz::Tz;

use crate::time;

/// Decides, per tick, whether the user callback fires.
pub trait TickPolicy: Send + Sync + 'static {
    fn should_fire(&self) -> bool;
}

/// Fixed-delay policy: every tick fires.
pub struct IntervalPolicy;

impl TickPolicy for IntervalPolicy {
    fn should_fire(&self) -> bool {
        true
    }
}

/// Time-of-day policy: a tick fires when the formatted current time is
/// present in the configured set of canonical `HH:MM:SS` strings.
///
/// The set is an immutable sorted snapshot swapped atomically on replacement,
/// so a tick comparison that already grabbed a snapshot never observes a
/// partial update.
pub struct RegularPolicy {
    times: RwLock<Arc<[String]>>,
    time_zone: RwLock<Option<Tz>>,
}

impl RegularPolicy {
    pub(crate) fn new() -> Self {
        Self {
            times: RwLock::new(Vec::new().into()),
            time_zone: RwLock::new(None),
        }
    }

    /// Current snapshot of the trigger set.
    pub(crate) fn times(&self) -> Arc<[String]> {
        self.times.read().unwrap().clone()
    }

    /// Swap in a new snapshot. Callers are responsible for canonical form.
    pub(crate) fn replace_times(&self, times: Arc<[String]>) {
        *self.times.write().unwrap() = times;
    }

    pub(crate) fn time_zone(&self) -> Option<Tz> {
        *self.time_zone.read().unwrap()
    }

    pub(crate) fn replace_time_zone(&self, zone: Option<Tz>) {
        *self.time_zone.write().unwrap() = zone;
    }
}

impl TickPolicy for RegularPolicy {
    fn should_fire(&self) -> bool {
        let times = self.times();
        if times.is_empty() {
            return false;
        }
        // The snapshot is sorted ascending, so membership is a binary search.
        // Duplicate entries still yield at most one fire per tick.
        let now = time::current_time_string(self.time_zone());
        times.binary_search(&now).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::canonicalize_times;

    #[test]
    fn interval_policy_always_fires() {
        assert!(IntervalPolicy.should_fire());
    }

    #[test]
    fn empty_regular_policy_never_fires() {
        assert!(!RegularPolicy::new().should_fire());
    }

    #[test]
    fn regular_policy_matches_current_local_time() {
        let policy = RegularPolicy::new();
        let now = time::current_time_string(None);
        // Include the adjacent second as well so a second rollover between
        // the two statements cannot produce a false negative.
        let plus_one = bump_second(&now);
        policy.replace_times(canonicalize_times([now, plus_one]).unwrap());
        assert!(policy.should_fire());
    }

    #[test]
    fn regular_policy_ignores_non_matching_times() {
        let policy = RegularPolicy::new();
        policy.replace_times(canonicalize_times(["00:00:01"]).unwrap());
        // Midnight rollover within a test run is not a realistic hazard, and
        // the matching case is covered above.
        let now = time::current_time_string(None);
        if now != "00:00:01" {
            assert!(!policy.should_fire());
        }
    }

    fn bump_second(hhmmss: &str) -> String {
        let h: u32 = hhmmss[0..2].parse().unwrap();
        let m: u32 = hhmmss[3..5].parse().unwrap();
        let s: u32 = hhmmss[6..8].parse().unwrap();
        let total = (h * 3600 + m * 60 + s + 1) % 86_400;
        format!("{:02}:{:02}:{:02}", total / 3600, total % 3600 / 60, total % 60)
    }
}
