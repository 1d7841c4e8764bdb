//! # Metronome
//!
//! Callback scheduling over a periodic timer, for processes that need simple
//! recurring jobs (daily digests, polling loops) without an external job
//! scheduler.
//!
//! ## Core Concepts
//!
//! - **Scheduler**: a two-state (stopped/running) lifecycle that owns exactly
//!   one repeating timer handle and one user callback. Cheap to clone; clones
//!   refer to the same instance.
//! - **Tick policy**: the injected fire-decision strategy evaluated on every
//!   timer tick. [`IntervalScheduler`](scheduler::IntervalScheduler) fires on
//!   every tick at a configurable delay;
//!   [`RegularScheduler`](scheduler::RegularScheduler) checks once per second
//!   whether the wall clock matches one of its configured `HH:MM:SS` times,
//!   optionally localized to an IANA time zone.
//! - **Error routing**: a failing callback is caught and forwarded to the
//!   per-instance error handler, or to an injectable diagnostic sink that
//!   logs through `tracing` by default. A callback failure never cancels the
//!   schedule.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use metronome::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Fires every 500ms until stopped.
//!     let ticker = IntervalScheduler::new(IntervalConfig { delay_ms: 500 }, |e| async move {
//!         println!("tick (status: {})", e.current_target.status());
//!         Ok(())
//!     })?;
//!
//!     ticker.start();
//!     metronome::timer::sleep(2_000.0).await?;
//!     ticker.stop();
//!     Ok(())
//! }
//! ```

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod config;
pub mod error;
pub mod policy;
pub mod scheduler;
pub mod time;
pub mod timer;

/// A prelude module for easy importing of the most common Metronome types.
pub mod prelude {
    pub use crate::config::{IntervalConfig, MetronomeConfig, RegularConfig};
    pub use crate::error::{Result, SchedulerError};
    pub use crate::policy::{IntervalPolicy, RegularPolicy, TickPolicy};
    pub use crate::scheduler::{
        ErrorEvent, FireEvent, IntervalScheduler, RegularScheduler, Scheduler, Status,
    };
}
