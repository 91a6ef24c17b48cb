//! Time sources for the sampling loop
//!
//! Measurements are stamped in milliseconds since the Unix epoch. The store
//! asks a [`TimeSource`] for "now" when the caller does not supply a
//! timestamp, which keeps the core free of ambient clock reads and lets tests
//! pin time with [`FixedTime`].
//!
//! The gas calibrator also needs the *local* hour of day for its daily
//! recalibration window; [`local_hour`] derives it from a timestamp and the
//! station's UTC offset.

use chrono::{DateTime, FixedOffset, Timelike};

use crate::constants::time::{MS_PER_HOUR, SECONDS_PER_MINUTE};

/// Timestamp in milliseconds since epoch
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing and replay
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Local hour of day (0-23) for a timestamp at the given UTC offset.
///
/// Offsets outside +-24h and timestamps chrono cannot represent fall back to UTC.
pub fn local_hour(timestamp: Timestamp, utc_offset_minutes: i32) -> u8 {
    let offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(SECONDS_PER_MINUTE as i32))
        .or_else(|| FixedOffset::east_opt(0));

    match (offset, DateTime::from_timestamp_millis(timestamp as i64)) {
        (Some(offset), Some(utc)) => utc.with_timezone(&offset).hour() as u8,
        _ => ((timestamp / MS_PER_HOUR) % 24) as u8,
    }
}

/// Whole hours elapsed between two timestamps (saturating)
pub fn hours_between(earlier: Timestamp, later: Timestamp) -> f64 {
    later.saturating_sub(earlier) as f64 / MS_PER_HOUR as f64
}
