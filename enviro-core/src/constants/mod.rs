//! Constants for the Enviro Core
//!
//! Centralised numeric values with their purpose and source.
//!
//! ## Organization
//!
//! - **Physics**: psychrometric and barometric coefficients
//! - **Gas**: metal-oxide sensor curves and clamping floor
//! - **Time**: unit conversions and calibration schedule defaults
//! - **Retention**: telemetry history limits
//! - **Air quality**: default severity thresholds

/// Psychrometric and barometric coefficients.
pub mod physics;

/// Gas sensor ratio curves.
pub mod gas;

/// Time-related constants.
pub mod time;

/// History retention limits.
pub mod retention;

/// Air-quality thresholds.
pub mod air_quality;

pub use physics::KELVIN_OFFSET;

pub use gas::{REDUCING_CURVE, OXIDISING_CURVE, NH3_CURVE, RATIO_FLOOR};

pub use time::{MS_PER_SECOND, MS_PER_HOUR, MS_PER_DAY};

pub use retention::{DEFAULT_HISTORY_CHECK, DEFAULT_HISTORY_QUERY, DEFAULT_LIMIT_HISTORY, DEFAULT_TRIM_CHUNK};
