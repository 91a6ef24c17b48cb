//! Psychrometric Conversions
//!
//! ## Humidity Input Convention
//!
//! Adapters report humidity either as a percentage (`45.0`) or as a fraction
//! (`0.45`). Every function here accepts both and normalises through
//! [`relative_humidity_fraction`]: values `>= 1.0` are percentages. A fully
//! dry `1.0 %` therefore reads as 100 %; this ambiguity is inherited from
//! the sensor adapters and kept for compatibility.
//!
//! ## Formulas
//!
//! ```text
//! e     = RH * 0.61121 * exp((18.678 - t/234.5) * t / (257.14 + t))   Buck, kPa
//! AH    = 216.679 * e / (t + 273.15)                                   g/m3, e in hPa
//! x     = 621.9907 * e / (P - e)                                       g/kg
//! gamma = ln(RH) + 17.625 t / (243.04 + t)
//! Td    = 243.04 gamma / (17.625 - gamma)                              Magnus
//! ```

use crate::constants::physics::{
    ABSOLUTE_HUMIDITY_C, BUCK_A_KPA, BUCK_B, BUCK_C, BUCK_D, HPA_PER_KPA, HUMIDITY_FRACTION_THRESHOLD,
    KELVIN_OFFSET, MAGNUS_B, MAGNUS_C, MIXING_RATIO_B, PA_PER_HPA, SGP_ABSOLUTE_HUMIDITY_C, SGP_MAGNUS_A_HPA,
    SGP_MAGNUS_B, SGP_MAGNUS_C, SVP_LN_COEFFS, SVP_LN_THETA_COEFF, SVP_THETA_COEFFS,
};
use crate::errors::{EnviroError, EnviroResult};

/// Saturation vapor pressure over liquid water (hPa)
///
/// Hyland-Wexler style fit: a temperature correction `theta` followed by a
/// Laurent polynomial plus logarithm in `theta`. Accurate to well under
/// 0.1 % across the ambient range.
pub fn saturation_vapor_pressure(temp_celsius: f64) -> f64 {
    let t = temp_celsius + KELVIN_OFFSET;
    let [c0, c1, c2, c3] = SVP_THETA_COEFFS;
    let theta = t - (c0 + t * (c1 + t * (c2 + t * c3)));

    let [b_1, b0, b1, b2, b3] = SVP_LN_COEFFS;
    let ln_pws = b_1 / theta
        + b0
        + theta * (b1 + theta * (b2 + theta * b3))
        + SVP_LN_THETA_COEFF * libm::log(theta);

    libm::exp(ln_pws) / PA_PER_HPA
}

/// Normalise humidity to a 0..1 fraction
///
/// `45.0 -> 0.45`, `0.45 -> 0.45`.
pub fn relative_humidity_fraction(raw_humidity: f64) -> f64 {
    if raw_humidity >= HUMIDITY_FRACTION_THRESHOLD {
        raw_humidity / 100.0
    } else {
        raw_humidity
    }
}

/// Partial pressure of water vapor (hPa)
pub fn water_vapor_pressure(temp_celsius: f64, relative_humidity_raw: f64) -> f64 {
    let rh = relative_humidity_fraction(relative_humidity_raw);
    let t = temp_celsius;
    let kpa = rh * BUCK_A_KPA * libm::exp((BUCK_B - t / BUCK_C) * (t / (BUCK_D + t)));
    kpa * HPA_PER_KPA
}

/// Mass of water vapor per volume of air (g/m3)
pub fn absolute_humidity(temp_celsius: f64, relative_humidity_raw: f64) -> f64 {
    let e = water_vapor_pressure(temp_celsius, relative_humidity_raw);
    ABSOLUTE_HUMIDITY_C * e / (temp_celsius + KELVIN_OFFSET)
}

/// Mass of water vapor per mass of dry air (g/kg)
pub fn mixing_ratio(temp_celsius: f64, relative_humidity_raw: f64, pressure_hpa: f64) -> EnviroResult<f64> {
    let e = water_vapor_pressure(temp_celsius, relative_humidity_raw);
    let dry = pressure_hpa - e;
    if dry == 0.0 {
        return Err(EnviroError::DivisionSingularity { quantity: "mixing ratio" });
    }
    Ok(MIXING_RATIO_B * e / dry)
}

/// Temperature at which the air would saturate (C)
pub fn dew_point(temp_celsius: f64, relative_humidity_raw: f64) -> EnviroResult<f64> {
    // Also rejects NaN
    if !(relative_humidity_raw > 0.0) {
        return Err(EnviroError::InvalidHumidity { value: relative_humidity_raw });
    }
    let rh = relative_humidity_fraction(relative_humidity_raw);
    let gamma = libm::log(rh) + MAGNUS_B * temp_celsius / (MAGNUS_C + temp_celsius);
    Ok(MAGNUS_C * gamma / (MAGNUS_B - gamma))
}

/// Absolute humidity in mg/m3 for eCO2/TVOC sensor compensation
///
/// Takes the *raw* board temperature and humidity percentage, since that is
/// the air the gas sensor actually sees. The result is truncated to an
/// integer and saturates at zero, which is what the sensor's humidity
/// register accepts.
pub fn voc_humidity_compensation(raw_temp_celsius: f64, raw_humidity_pct: f64) -> u32 {
    let t = raw_temp_celsius;
    let e = raw_humidity_pct / 100.0 * SGP_MAGNUS_A_HPA * libm::exp(SGP_MAGNUS_B * t / (SGP_MAGNUS_C + t));
    let grams = SGP_ABSOLUTE_HUMIDITY_C * e / (KELVIN_OFFSET + t);
    (1000.0 * grams) as u32
}
