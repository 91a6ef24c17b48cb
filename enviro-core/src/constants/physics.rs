//! Physical Constants for Psychrometric and Barometric Math
//!
//! Every coefficient used by the compensation engine lives here with its
//! source, so the formulas in [`crate::compensation`] read as formulas.

// ===== FUNDAMENTAL =====

/// Offset between Celsius and Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

// ===== SATURATION VAPOR PRESSURE (Hyland-Wexler form) =====
//
// theta = T - sum(C_i * T^i), i = 0..3
// ln(Pws) = sum(b_i * theta^i), i = -1..3, + b_4 * ln(theta)
//
// T in Kelvin, Pws in Pa.
//
// Source: Vaisala, "Humidity Conversion Formulas", saturation vapor pressure over water

/// Temperature correction polynomial C0..C3.
pub const SVP_THETA_COEFFS: [f64; 4] = [
    0.49313580,
    -0.46094296e-2,
    0.13746454e-4,
    -0.12743214e-7,
];

/// ln(Pws) coefficients b-1..b3.
pub const SVP_LN_COEFFS: [f64; 5] = [
    -0.58002206e4,
    0.13914993e1,
    -0.48640239e-1,
    0.41764768e-4,
    -0.14452093e-7,
];

/// ln(theta) coefficient b4.
pub const SVP_LN_THETA_COEFF: f64 = 6.5459673;

/// Pascals per hectopascal.
pub const PA_PER_HPA: f64 = 100.0;

// ===== WATER VAPOR PRESSURE (Buck equation) =====
//
// e = RH * 0.61121 * exp((18.678 - T/234.5) * (T / (257.14 + T)))   [kPa]
//
// Source: Buck (1996), "Buck Research CR-1A User's Manual"

/// Buck equation scale (kPa).
pub const BUCK_A_KPA: f64 = 0.61121;
/// Buck equation numerator constant.
pub const BUCK_B: f64 = 18.678;
/// Buck equation temperature divisor (°C).
pub const BUCK_C: f64 = 234.5;
/// Buck equation denominator offset (°C).
pub const BUCK_D: f64 = 257.14;
/// Hectopascals per kilopascal.
pub const HPA_PER_KPA: f64 = 10.0;

// ===== DERIVED HUMIDITY =====

/// Absolute humidity constant for e in hPa (g·K/m³/hPa).
///
/// Source: Vaisala, "Humidity Conversion Formulas", absolute humidity
pub const ABSOLUTE_HUMIDITY_C: f64 = 216.679;

/// Mixing ratio constant B (g/kg), ratio of molar masses × 1000.
///
/// Source: Vaisala, "Humidity Conversion Formulas", mixing ratio
pub const MIXING_RATIO_B: f64 = 621.9907;

// ===== DEW POINT (Magnus form) =====
//
// Source: Alduchov & Eskridge (1996), improved Magnus coefficients

/// Magnus coefficient b.
pub const MAGNUS_B: f64 = 17.625;
/// Magnus coefficient c (°C).
pub const MAGNUS_C: f64 = 243.04;

// ===== eCO2/TVOC HUMIDITY COMPENSATION =====
//
// The SGP30 expects absolute humidity in mg/m³ computed with the classic
// Magnus constants, so these differ slightly from the dew point set above.
//
// Source: Sensirion SGP30 driver integration guide

/// Saturation scale (hPa).
pub const SGP_MAGNUS_A_HPA: f64 = 6.112;
/// Magnus coefficient b.
pub const SGP_MAGNUS_B: f64 = 17.62;
/// Magnus coefficient c (°C).
pub const SGP_MAGNUS_C: f64 = 243.12;
/// Absolute humidity constant (g·K/m³/hPa), rounded as in the guide.
pub const SGP_ABSOLUTE_HUMIDITY_C: f64 = 216.7;

// ===== BAROMETER =====

/// Standard temperature lapse rate (K/m).
///
/// Source: International Standard Atmosphere (ISA)
pub const TEMP_LAPSE_RATE_K_PER_M: f64 = 0.0065;

/// Barometric exponent g·M/(R·L).
///
/// Source: Barometric formula, troposphere
pub const BAROMETRIC_EXPONENT: f64 = 5.257;

// ===== HUMIDITY =====

/// Upper bound of relative humidity after polynomial correction (%).
pub const HUMIDITY_MAX_PCT: f64 = 100.0;

/// Raw humidity at or above this is a percentage, below it a fraction.
pub const HUMIDITY_FRACTION_THRESHOLD: f64 = 1.0;

// ===== LIGHT =====

/// Proximity count at which the light sensor is considered covered.
///
/// Source: LTR-559 integration on the Enviro+ board
pub const PROXIMITY_COVERED_THRESHOLD: u16 = 500;

/// Lux value reported while the light sensor is covered.
pub const COVERED_LUX: f64 = 1.0;

// ===== TEMPERATURE =====

/// Default divisor for the CPU-proximity temperature correction.
///
/// The board sensor sits next to the SoC; the reading is pulled towards the
/// CPU temperature by roughly `(cpu - raw) / 2.25`.
///
/// Source: Pimoroni Enviro+ compensated temperature example
pub const DEFAULT_CPU_FACTOR: f64 = 2.25;
