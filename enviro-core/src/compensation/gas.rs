//! Metal-oxide gas conversion
//!
//! ## Resistance Ratio to Concentration
//!
//! Each MICS-6814 channel's response is a straight line in log-log space:
//!
//! ```text
//! ppm = 10 ^ (slope * log10(Rs / R0) + intercept)
//! ```
//!
//! `R0` is the channel's resistance in clean air (the baseline kept by
//! [`crate::calibration`]). A ratio that is not positive (a sensor fault,
//! or a drift correction that overshot) has no logarithm; it is replaced by
//! [`RATIO_FLOOR`] and the reading carries on.
//!
//! ## Drift Correction
//!
//! Resistance also moves with temperature, humidity and pressure. Relative
//! to the climate in which R0 was sampled:
//!
//! ```text
//! Rs' = Rs - (ft * Rs * dT + fh * Rs * dH + fb * Rs * dP)
//! ```
//!
//! with one `(ft, fh, fb)` triple per channel.

use crate::compensation::Climate;
use crate::constants::gas::{NH3_CURVE, OXIDISING_CURVE, RATIO_FLOOR, REDUCING_CURVE};
use crate::profile::{GasDriftFactors, GasTriple};

/// Log-log response line of one gas channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasCurve {
    pub slope: f64,
    pub intercept: f64,
}

impl GasCurve {
    pub const REDUCING: GasCurve = GasCurve::from_pair(REDUCING_CURVE);
    pub const OXIDISING: GasCurve = GasCurve::from_pair(OXIDISING_CURVE);
    pub const NH3: GasCurve = GasCurve::from_pair(NH3_CURVE);

    const fn from_pair(pair: (f64, f64)) -> Self {
        Self { slope: pair.0, intercept: pair.1 }
    }

    /// The three channel curves
    pub const fn standard() -> GasTriple<GasCurve> {
        GasTriple {
            reducing: Self::REDUCING,
            oxidising: Self::OXIDISING,
            nh3: Self::NH3,
        }
    }
}

/// Concentration in ppm from a resistance and its baseline
pub fn gas_to_ppm(resistance: f64, r0: f64, curve: GasCurve) -> f64 {
    let ratio = resistance / r0;
    // `ratio > 0.0` is false for NaN as well
    let ratio = if ratio > 0.0 {
        ratio
    } else {
        log_warn!("Gas ratio {} not positive, clamping to {}", ratio, RATIO_FLOOR);
        RATIO_FLOOR
    };
    libm::pow(10.0, curve.slope * libm::log10(ratio) + curve.intercept)
}

/// [`gas_to_ppm`] for all three channels against the standard curves
pub fn gas_to_ppm_all(resistance: GasTriple<f64>, r0: GasTriple<f64>) -> GasTriple<f64> {
    let curves = GasCurve::standard();
    GasTriple {
        reducing: gas_to_ppm(resistance.reducing, r0.reducing, curves.reducing),
        oxidising: gas_to_ppm(resistance.oxidising, r0.oxidising, curves.oxidising),
        nh3: gas_to_ppm(resistance.nh3, r0.nh3, curves.nh3),
    }
}

/// Remove climate drift from one channel's raw resistance
pub fn compensate_gas(raw_resistance: f64, calibration: Climate, current: Climate, factors: GasDriftFactors) -> f64 {
    let d_temp = current.temperature - calibration.temperature;
    let d_hum = current.humidity - calibration.humidity;
    let d_bar = current.pressure - calibration.pressure;

    raw_resistance
        - (factors.temperature * raw_resistance * d_temp
            + factors.humidity * raw_resistance * d_hum
            + factors.pressure * raw_resistance * d_bar)
}

/// [`compensate_gas`] applied to each channel with its own factors
pub fn compensate_gases(
    raw: GasTriple<f64>,
    calibration: Climate,
    current: Climate,
    factors: &GasTriple<GasDriftFactors>,
) -> GasTriple<f64> {
    GasTriple {
        reducing: compensate_gas(raw.reducing, calibration, current, factors.reducing),
        oxidising: compensate_gas(raw.oxidising, calibration, current, factors.oxidising),
        nh3: compensate_gas(raw.nh3, calibration, current, factors.nh3),
    }
}
