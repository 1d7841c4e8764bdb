//! The periodic timer primitive, plus a small delay utility for callers.
//!
//! [`spawn_repeating`] drives its tick callback at a fixed cadence on a
//! dedicated tokio task, independent of how long each tick takes to handle.
//! The returned [`TimerHandle`] is the exclusive way to cancel it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::error::{Result, SchedulerError};

/// Opaque, cancellable handle to a repeating timer task.
///
/// Dropping the handle also cancels the timer, so a handle stored in an
/// `Option` slot can be cancelled simply by taking it out and letting it fall.
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Cancel the timer. No further ticks will be delivered; a tick callback
    /// already executing is not interrupted.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Schedule `on_tick` to run approximately every `period`, starting one full
/// period after the call.
///
/// The callback returns `true` to keep ticking; returning `false` ends the
/// timer task from the inside, which covers the case where the owning
/// scheduler has been dropped while its timer is still running. Ticks are
/// emitted at the configured cadence regardless of how the previous tick was
/// handled; if the task falls behind, missed ticks are skipped rather than
/// burst-delivered.
pub fn spawn_repeating<F>(period: Duration, mut on_tick: F) -> TimerHandle
where
    F: FnMut() -> bool + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if !on_tick() {
                break;
            }
        }
    });
    TimerHandle { task }
}

/// Resolve after `ms` milliseconds (rounded to the nearest integer).
///
/// Fails with [`SchedulerError::InvalidDuration`] when `ms` is not finite or
/// rounds to zero or below. Used by callers and tests; the schedulers
/// themselves tick off [`spawn_repeating`].
pub async fn sleep(ms: f64) -> Result<()> {
    if !ms.is_finite() || ms.round() <= 0.0 {
        return Err(SchedulerError::InvalidDuration(ms));
    }
    tokio::time::sleep(Duration::from_millis(ms.round() as u64)).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_at_fixed_cadence_starting_one_period_in() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = ticks.clone();
        let handle = spawn_repeating(Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0, "no tick before one period");

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        handle.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_future_ticks() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = ticks.clone();
        let handle = spawn_repeating(Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.cancel();
        let seen = ticks.load(Ordering::SeqCst);
        assert_eq!(seen, 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_callback_can_end_the_loop() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = ticks.clone();
        let _handle = spawn_repeating(Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst) < 2
        });

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3, "loop ends after callback returns false");
    }

    #[tokio::test]
    async fn sleep_rejects_non_positive_and_non_finite() {
        assert!(sleep(0.0).await.is_err());
        assert!(sleep(-5.0).await.is_err());
        assert!(sleep(0.4).await.is_err(), "rounds to zero");
        assert!(sleep(f64::NAN).await.is_err());
        assert!(sleep(f64::INFINITY).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_resolves_after_rounded_duration() {
        let before = tokio::time::Instant::now();
        sleep(10.4).await.unwrap();
        assert_eq!(before.elapsed(), Duration::from_millis(10));
    }
}
