//! Compensation Engine
//!
//! ## Overview
//!
//! Raw sensor output is not what the room is doing. The board temperature
//! sensor is heated by the CPU and its own enclosure, the humidity sensor
//! inherits that temperature error, the barometer reads station pressure,
//! and the metal-oxide gas sensor's resistance drifts with the climate it
//! sits in. This module turns raw numbers into physically meaningful ones.
//!
//! ```text
//!  raw temp ──► adjust_temperature ──► comp temp ─┐
//!  raw hum  ──► adjust_humidity    ──► comp hum  ─┼─► dew_point / absolute_humidity
//!  raw bar  ──► × barometer_altitude_compensation ──► sea-level pressure
//!  raw Rs   ──► compensate_gas (once calibrated) ──► gas_to_ppm ──► ppm
//! ```
//!
//! ## Purity
//!
//! Every function here is pure: inputs in, number out, no shared state. They
//! can run on any thread and in parallel across readings. Calibration data
//! comes in as arguments (see [`crate::profile`]); nothing is read from
//! globals.
//!
//! ## Failure Policy
//!
//! Functions are total except where the math has no answer:
//!
//! | Function | Failure |
//! |----------|---------|
//! | [`dew_point`] | `InvalidHumidity` when humidity `<= 0` |
//! | [`mixing_ratio`] | `DivisionSingularity` when `P == e` |
//! | [`adjust_temperature`] | `MissingCpuTemperature` for the CPU strategy without a CPU reading |
//!
//! [`gas_to_ppm`] never fails; a non-positive resistance ratio is clamped to
//! a small floor so the pipeline always yields a number.

mod barometer;
mod gas;
mod light;
mod psychrometrics;
mod temperature;

pub use barometer::{barometer_altitude_compensation, compensate_pressure, sea_level_to_station_pressure};
pub use gas::{compensate_gas, compensate_gases, gas_to_ppm, gas_to_ppm_all, GasCurve};
pub use light::proximity_gated_lux;
pub use psychrometrics::{
    absolute_humidity, dew_point, mixing_ratio, relative_humidity_fraction, saturation_vapor_pressure,
    voc_humidity_compensation, water_vapor_pressure,
};
pub use temperature::{adjust_humidity, adjust_temperature};

/// Temperature, humidity and pressure observed together
///
/// Used as the reference point for gas drift correction: the climate in
/// which R0 was sampled, and the climate of the current reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Climate {
    /// Celsius
    pub temperature: f64,
    /// Percent
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
}

impl Climate {
    pub const fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self { temperature, humidity, pressure }
    }
}
