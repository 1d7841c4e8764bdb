//! Plain-data configuration for the two scheduler kinds.
//!
//! These structs are designed to be deserialized from a configuration file
//! (e.g., a TOML file) using `serde`, separating the data half of a schedule
//! from the callback supplied in code. All fields have sensible defaults so a
//! partial or missing file still yields a usable configuration.

use serde::Deserialize;

/// Configuration for a fixed-delay ("interval") scheduler.
#[derive(Debug, Clone, Deserialize)]
pub struct IntervalConfig {
    /// Tick cadence in milliseconds. Must be greater than zero.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// Configuration for a time-of-day ("regular") scheduler.
///
/// `times` entries are accepted in loose `h:m:s` form (leading zeros and
/// whitespace around the colon-separated parts are optional) and are
/// canonicalized to zero-padded `HH:MM:SS` at construction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegularConfig {
    /// Daily trigger times.
    #[serde(default)]
    pub times: Vec<String>,

    /// Optional IANA time zone identifier (e.g., "America/New_York").
    /// When absent, times are compared against the local wall clock.
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Top-level file shape consumed by the `metrodev` demo binary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetronomeConfig {
    #[serde(default)]
    pub interval: IntervalConfig,

    #[serde(default)]
    pub regular: RegularConfig,
}

// --- Default value functions for serde ---

fn default_delay_ms() -> u64 {
    1000
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}
