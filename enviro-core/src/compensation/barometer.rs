//! Barometric altitude correction
//!
//! A barometer at altitude reads station pressure. Weather reports use
//! sea-level pressure, obtained by multiplying with
//!
//! ```text
//! factor = (1 - L h / (T + L h + 273.15)) ^ -5.257
//! ```
//!
//! where `L` is the standard lapse rate (0.0065 K/m), `h` the altitude in
//! metres and `T` the air temperature in Celsius.

use crate::constants::physics::{BAROMETRIC_EXPONENT, KELVIN_OFFSET, TEMP_LAPSE_RATE_K_PER_M};

/// Multiplicative station-to-sea-level factor (1.0 at sea level)
pub fn barometer_altitude_compensation(altitude_m: f64, temp_celsius: f64) -> f64 {
    let lapse = TEMP_LAPSE_RATE_K_PER_M * altitude_m;
    libm::pow(1.0 - lapse / (temp_celsius + lapse + KELVIN_OFFSET), -BAROMETRIC_EXPONENT)
}

/// Project a station reading to sea level (hPa)
pub fn compensate_pressure(station_hpa: f64, altitude_m: f64, temp_celsius: f64) -> f64 {
    station_hpa * barometer_altitude_compensation(altitude_m, temp_celsius)
}

/// Remove the sea-level projection from an externally supplied pressure (hPa)
///
/// Useful when a reference station publishes sea-level pressure and the
/// local comparison needs what the barometer itself should read.
pub fn sea_level_to_station_pressure(sea_level_hpa: f64, altitude_m: f64, temp_celsius: f64) -> f64 {
    sea_level_hpa / barometer_altitude_compensation(altitude_m, temp_celsius)
}
