use thiserror::Error;

/// Errors raised synchronously at construction or when a setter is called.
///
/// Failures inside a user callback are deliberately *not* part of this enum:
/// they are opaque [`anyhow::Error`] values routed to the scheduler's error
/// handler (or diagnostic sink) and never surface through `Result` returns.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The tick delay must be strictly greater than zero.
    #[error("invalid delay: must be greater than zero")]
    InvalidDelay,

    /// A time-of-day entry did not parse as `hh:mm:ss`.
    #[error("invalid time '{0}': must have the format hh:mm:ss")]
    InvalidTimeFormat(String),

    /// The string is not a known IANA time zone identifier.
    #[error("invalid time zone '{0}'")]
    InvalidTimeZone(String),

    /// A sleep duration must be finite and round to at least one millisecond.
    #[error("invalid sleep duration {0}: must be greater than 0")]
    InvalidDuration(f64),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
