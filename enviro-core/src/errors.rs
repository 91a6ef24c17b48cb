//! Error Types for the Telemetry and Compensation Engine
//!
//! ## Design Philosophy
//!
//! Errors are returned from hot paths on small devices, so they follow the
//! same rules as the rest of the core:
//!
//! 1. **Small Size**: every variant carries at most one float or one static string.
//! 2. **No Heap Allocation**: messages are `&'static str`, never `String`.
//! 3. **Copy Semantics**: errors can be stored and re-reported freely.
//!
//! ## What Is (and Is Not) an Error
//!
//! Only conditions where the core cannot produce a meaningful number are
//! errors:
//!
//! - `UnknownVariable`: an adapter wrote or read a name the units registry
//!   does not know. Fatal to that request, never to the process.
//! - `InvalidHumidity`: dew point needs `ln(RH)`, undefined for `RH <= 0`.
//! - `DivisionSingularity`: mixing-ratio denominator `P - e` reached zero.
//!
//! Several things look like failures but are deliberately *not* errors:
//!
//! - A gas ratio `Rs/R0 <= 0` is clamped to a floor ratio so the pipeline
//!   always produces a ppm value.
//! - Asking for more history than exists returns what exists.
//! - Retention trimming cannot fail.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use enviro_core::{compensation, EnviroError};
//!
//! match compensation::dew_point(21.0, 0.0) {
//!     Ok(dp) => println!("dew point {dp:.1}"),
//!     Err(EnviroError::InvalidHumidity { value }) => {
//!         // Humidity sensor reported nothing usable, skip derived values
//!         let _ = value;
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for engine operations
pub type EnviroResult<T> = Result<T, EnviroError>;

/// Engine errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EnviroError {
    /// Name not present in the units registry
    #[error("Unknown variable: not present in the units registry")]
    UnknownVariable,

    /// Humidity that cannot feed logarithmic humidity math
    #[error("Invalid humidity {value}: must be greater than zero")]
    InvalidHumidity {
        /// Raw humidity as supplied by the caller
        value: f64,
    },

    /// Denominator of a ratio reached zero
    #[error("Division singularity in {quantity}")]
    DivisionSingularity {
        /// Quantity being computed (e.g. "mixing ratio")
        quantity: &'static str,
    },

    /// CPU-proximity temperature strategy called without a CPU reading
    #[error("CPU temperature required by the configured temperature strategy")]
    MissingCpuTemperature,

    /// Air-quality thresholds that are empty, too many, or not ascending
    #[error("Invalid air-quality thresholds: {reason}")]
    InvalidThresholds {
        /// What is wrong with the list
        reason: &'static str,
    },

    /// Retention policy whose chunk cannot be removed from the history limit
    #[error("Invalid retention policy: {reason}")]
    InvalidRetention {
        /// What is wrong with the policy
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for EnviroError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::UnknownVariable =>
                defmt::write!(fmt, "Unknown variable"),
            Self::InvalidHumidity { value } =>
                defmt::write!(fmt, "Invalid humidity {}", value),
            Self::DivisionSingularity { quantity } =>
                defmt::write!(fmt, "Division singularity in {}", quantity),
            Self::MissingCpuTemperature =>
                defmt::write!(fmt, "CPU temperature missing"),
            Self::InvalidThresholds { reason } =>
                defmt::write!(fmt, "Invalid thresholds: {}", reason),
            Self::InvalidRetention { reason } =>
                defmt::write!(fmt, "Invalid retention: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_stay_small() {
        assert!(core::mem::size_of::<EnviroError>() <= 24);
    }

    #[test]
    fn display_includes_context() {
        let err = EnviroError::DivisionSingularity { quantity: "mixing ratio" };
        assert_eq!(err.to_string(), "Division singularity in mixing ratio");
    }
}
