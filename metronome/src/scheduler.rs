//! The scheduling lifecycle shared by both trigger policies.
//!
//! A [`Scheduler`] is a cheap-clone handle over shared state: clones refer to
//! the same underlying instance, which is what lets a user callback reach
//! back into its own scheduler (to stop it, retune its delay, or install a
//! new time set) through the [`FireEvent::current_target`] it receives.
//!
//! The lifecycle is a two-state machine — stopped or running — derived
//! entirely from whether the timer-handle slot is occupied. Ticks are driven
//! by [`crate::timer::spawn_repeating`] at a fixed cadence; each fire runs
//! the user callback on its own spawned task, so a callback slower than the
//! delay overlaps the next one instead of delaying it. Callback failures are
//! caught and routed; they can never cancel the timer.

use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, error};

use crate::config::{IntervalConfig, RegularConfig};
use crate::error::{Result, SchedulerError};
use crate::policy::{IntervalPolicy, RegularPolicy, TickPolicy};
use crate::time;
use crate::timer::{self, TimerHandle};

/// Lifecycle state, derived from timer-handle ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Stopped,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Running => "running",
            Status::Stopped => "stopped",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "running" => Ok(Status::Running),
            "stopped" => Ok(Status::Stopped),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Context handed to the user callback on each fire.
pub struct FireEvent<P: TickPolicy> {
    /// The scheduler that fired. A clone of the instance, not a copy: calls
    /// on it (stop, reconfigure) act on the live schedule.
    pub current_target: Scheduler<P>,
}

/// Context handed to the error handler when a callback fails.
pub struct ErrorEvent<P: TickPolicy> {
    pub error: anyhow::Error,
    pub current_target: Scheduler<P>,
}

type BoxedCallback<P> =
    Arc<dyn Fn(FireEvent<P>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;
type BoxedErrorHandler<P> = Arc<dyn Fn(ErrorEvent<P>) + Send + Sync>;

/// Destination for callback failures when no error handler is installed.
pub type DiagnosticSink = Arc<dyn Fn(&anyhow::Error) + Send + Sync>;

struct Inner<P: TickPolicy> {
    policy: P,
    delay_ms: AtomicU64,
    timer: Mutex<Option<TimerHandle>>,
    callback: BoxedCallback<P>,
    on_error: RwLock<Option<BoxedErrorHandler<P>>>,
    sink: RwLock<DiagnosticSink>,
}

/// A recurring job: one timer handle, one callback, one fire-decision policy.
pub struct Scheduler<P: TickPolicy> {
    inner: Arc<Inner<P>>,
}

impl<P: TickPolicy> Clone for Scheduler<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Fixed-delay scheduler: fires on every tick.
pub type IntervalScheduler = Scheduler<IntervalPolicy>;

/// Time-of-day scheduler: fires when the wall clock matches a configured time.
pub type RegularScheduler = Scheduler<RegularPolicy>;

impl<P: TickPolicy> Scheduler<P> {
    fn with_policy<C, Fut>(policy: P, delay: Duration, callback: C) -> Result<Self>
    where
        C: Fn(FireEvent<P>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let delay_ms = delay.as_millis() as u64;
        if delay_ms == 0 {
            return Err(SchedulerError::InvalidDelay);
        }
        let callback: BoxedCallback<P> = Arc::new(move |event| Box::pin(callback(event)));
        Ok(Self {
            inner: Arc::new(Inner {
                policy,
                delay_ms: AtomicU64::new(delay_ms),
                timer: Mutex::new(None),
                callback,
                on_error: RwLock::new(None),
                sink: RwLock::new(default_sink()),
            }),
        })
    }

    /// `Running` iff a timer handle is held.
    pub fn status(&self) -> Status {
        if self.inner.timer.lock().unwrap().is_some() {
            Status::Running
        } else {
            Status::Stopped
        }
    }

    /// Begin ticking at the configured delay. Returns `false` without side
    /// effects if already running. The first tick lands one delay after this
    /// call. Must be called within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut slot = self.inner.timer.lock().unwrap();
        if slot.is_some() {
            return false;
        }

        let period = Duration::from_millis(self.inner.delay_ms.load(Ordering::Relaxed));
        // The timer task holds only a weak reference: once every user handle
        // is gone the next tick ends the task instead of leaking it.
        let weak = Arc::downgrade(&self.inner);
        let handle = timer::spawn_repeating(period, move || tick(&weak));
        *slot = Some(handle);

        debug!(delay_ms = period.as_millis() as u64, "scheduler started");
        true
    }

    /// Cancel the timer. Returns `false` without side effects if already
    /// stopped. A callback invocation already in flight is not interrupted.
    pub fn stop(&self) -> bool {
        let mut slot = self.inner.timer.lock().unwrap();
        match slot.take() {
            Some(handle) => {
                handle.cancel();
                debug!("scheduler stopped");
                true
            }
            None => false,
        }
    }

    /// `stop()` then `start()`: always ends running, and resets the tick
    /// phase so the next tick is one delay from now.
    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    /// Install or replace the error handler invoked on callback failure.
    pub fn on_error(&self, handler: impl Fn(ErrorEvent<P>) + Send + Sync + 'static) {
        *self.inner.on_error.write().unwrap() = Some(Arc::new(handler));
    }

    /// Remove the error handler, reverting failures to the diagnostic sink.
    pub fn clear_on_error(&self) {
        *self.inner.on_error.write().unwrap() = None;
    }

    /// Replace the diagnostic sink that receives unhandled callback failures.
    /// The default logs through `tracing::error!`.
    pub fn set_diagnostic_sink(&self, sink: impl Fn(&anyhow::Error) + Send + Sync + 'static) {
        *self.inner.sink.write().unwrap() = Arc::new(sink);
    }

    /// One tick: ask the policy, and on fire run the callback on its own
    /// task so slow callbacks overlap rather than stall the cadence.
    fn evaluate_tick(self) {
        if !self.inner.policy.should_fire() {
            return;
        }
        let fut = (self.inner.callback)(FireEvent {
            current_target: self.clone(),
        });
        tokio::spawn(async move {
            if let Err(error) = fut.await {
                self.route_error(error);
            }
        });
    }

    fn route_error(&self, error: anyhow::Error) {
        let handler = self.inner.on_error.read().unwrap().clone();
        match handler {
            Some(handler) => handler(ErrorEvent {
                error,
                current_target: self.clone(),
            }),
            None => {
                let sink = self.inner.sink.read().unwrap().clone();
                sink(&error);
            }
        }
    }
}

/// Timer-task entry point. Returns `false` once the scheduler is gone,
/// ending the timer loop.
fn tick<P: TickPolicy>(inner: &Weak<Inner<P>>) -> bool {
    match inner.upgrade() {
        Some(inner) => {
            Scheduler { inner }.evaluate_tick();
            true
        }
        None => false,
    }
}

fn default_sink() -> DiagnosticSink {
    Arc::new(|error| error!(error = %error, "scheduler callback failed (no error handler installed)"))
}

impl Scheduler<IntervalPolicy> {
    /// Build a fixed-delay scheduler. Fails with
    /// [`SchedulerError::InvalidDelay`] when `delay_ms` is zero.
    pub fn new<C, Fut>(config: IntervalConfig, callback: C) -> Result<Self>
    where
        C: Fn(FireEvent<IntervalPolicy>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::with_policy(
            IntervalPolicy,
            Duration::from_millis(config.delay_ms),
            callback,
        )
    }

    /// Current tick delay.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.inner.delay_ms.load(Ordering::Relaxed))
    }

    /// Retune the tick delay. If running, the schedule restarts with the new
    /// delay: the next tick is one delay from this call, not from the
    /// original start. An unchanged value still restarts, keeping the
    /// phase-reset guarantee unconditional.
    pub fn set_delay(&self, delay: Duration) -> Result<()> {
        let delay_ms = delay.as_millis() as u64;
        if delay_ms == 0 {
            return Err(SchedulerError::InvalidDelay);
        }
        self.inner.delay_ms.store(delay_ms, Ordering::Relaxed);
        if self.status() == Status::Running {
            self.restart();
        }
        Ok(())
    }
}

impl Scheduler<RegularPolicy> {
    /// Build a time-of-day scheduler. The tick cadence is fixed at one
    /// second (one comparison per formatted second) and is not exposed for
    /// reconfiguration.
    pub fn new<C, Fut>(config: RegularConfig, callback: C) -> Result<Self>
    where
        C: Fn(FireEvent<RegularPolicy>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let scheduler =
            Self::with_policy(RegularPolicy::new(), Duration::from_millis(1000), callback)?;
        scheduler.set_time_zone(config.time_zone.as_deref())?;
        scheduler.set_times(&config.times)?;
        Ok(scheduler)
    }

    /// Current snapshot of canonical trigger times, ascending.
    pub fn times(&self) -> Arc<[String]> {
        self.inner.policy.times()
    }

    /// Validate, canonicalize, sort, and atomically swap in a new trigger
    /// set. On any invalid entry the old set is left untouched. Safe to call
    /// from inside the callback: the replacement is visible to the very next
    /// tick's comparison.
    pub fn set_times<I, S>(&self, times: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let canonical = time::canonicalize_times(times)?;
        self.inner.policy.replace_times(canonical);
        Ok(())
    }

    /// Configured zone, if any. `None` means local-time comparison.
    pub fn time_zone(&self) -> Option<chrono_tz::Tz> {
        self.inner.policy.time_zone()
    }

    /// Set or clear the IANA zone used to format the current time.
    pub fn set_time_zone(&self, zone: Option<&str>) -> Result<()> {
        let resolved = match zone {
            Some(id) => Some(time::resolve_zone(id)?),
            None => None,
        };
        self.inner.policy.replace_time_zone(resolved);
        Ok(())
    }
}
