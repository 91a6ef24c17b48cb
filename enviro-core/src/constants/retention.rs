//! History Retention Limits
//!
//! The telemetry store keeps every sample in RAM. At one sample per second a
//! week of history is 604 800 samples per variable, which is the ceiling a
//! Raspberry Pi Zero class device can afford for thirteen variables.
//!
//! Trimming is amortised: the store only inspects history lengths every
//! [`DEFAULT_HISTORY_CHECK`] writes and then drops a whole day at once.

/// Maximum history length per variable before trimming kicks in.
///
/// 7 days × 86 400 samples/day at 1 Hz.
pub const DEFAULT_LIMIT_HISTORY: usize = 604_800;

/// Number of writes between retention checks.
pub const DEFAULT_HISTORY_CHECK: u32 = 10_000;

/// Samples removed from the front of an over-long history in one trim.
///
/// One day at 1 Hz.
pub const DEFAULT_TRIM_CHUNK: usize = 86_400;

/// Default number of entries returned by a history query.
pub const DEFAULT_HISTORY_QUERY: usize = 5;
