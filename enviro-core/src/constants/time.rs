//! Time-Related Constants
//!
//! Time unit conversions and calibration scheduling defaults.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Minutes per hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Hours per day.
pub const HOURS_PER_DAY: u32 = 24;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = MS_PER_SECOND * SECONDS_PER_MINUTE as u64;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = MS_PER_MINUTE * MINUTES_PER_HOUR as u64;

/// Milliseconds per day.
pub const MS_PER_DAY: u64 = MS_PER_HOUR * HOURS_PER_DAY as u64;

// ===== GAS CALIBRATION SCHEDULE =====

/// Default warm-up period before the first R0 baseline is sampled (hours).
///
/// Metal-oxide heaters need time to reach a stable operating temperature;
/// readings taken earlier drift strongly and would poison the baseline.
///
/// Source: MICS-6814 datasheet, preheat time recommendation
pub const DEFAULT_GAS_WARMUP_HOURS: f64 = 1.0;

/// Shortest warm-up after which the daily hour may sample the first R0 (hours).
///
/// A station powered on during the calibration hour would otherwise take
/// its baseline from a cold heater. Capped by the configured warm-up.
pub const MIN_WARMUP_BEFORE_DAILY_HOURS: f64 = 0.25;

/// Default local hour for the daily R0 recalibration.
///
/// 3 AM is chosen because indoor air is usually at its cleanest then
/// (no cooking, no occupants moving).
///
/// Source: enviro-monitor deployment default
pub const DEFAULT_GAS_CALIBRATION_HOUR: u8 = 3;
