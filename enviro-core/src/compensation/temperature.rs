//! Board temperature and humidity correction
//!
//! The temperature strategy is chosen once when the profile is built (see
//! [`TemperatureStrategy`]); each call runs exactly one of them.

use crate::constants::physics::HUMIDITY_MAX_PCT;
use crate::errors::{EnviroError, EnviroResult};
use crate::profile::{QuadraticCoefficients, TemperatureStrategy};

/// Correct a raw board temperature (C)
///
/// - `CpuProximity { factor }`: `raw - (cpu - raw) / factor`, needs `cpu_temp`
/// - `Cubic(k)`: `k.a t^3 + k.b t^2 + k.c t + k.d`, ignores `cpu_temp`
pub fn adjust_temperature(raw_temp: f64, cpu_temp: Option<f64>, strategy: &TemperatureStrategy) -> EnviroResult<f64> {
    match strategy {
        TemperatureStrategy::CpuProximity { factor } => {
            let cpu = cpu_temp.ok_or(EnviroError::MissingCpuTemperature)?;
            Ok(raw_temp - (cpu - raw_temp) / factor)
        }
        TemperatureStrategy::Cubic(coefficients) => Ok(coefficients.evaluate(raw_temp)),
    }
}

/// Correct a raw humidity percentage, capped at 100 %
pub fn adjust_humidity(raw_humidity: f64, coefficients: &QuadraticCoefficients) -> f64 {
    coefficients.evaluate(raw_humidity).min(HUMIDITY_MAX_PCT)
}
