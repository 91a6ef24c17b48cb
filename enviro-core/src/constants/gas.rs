//! Metal-Oxide Gas Sensor Characteristics
//!
//! Ratio-to-concentration curves for the three MICS-6814 channels. Each curve
//! is a straight line in log-log space, `log10(ppm) = slope * log10(Rs/R0) + intercept`,
//! fitted to the datasheet sensitivity plots.

/// Reducing channel (CO reference gas): (slope, intercept).
///
/// Source: MICS-6814 datasheet, RED sensor sensitivity curve
pub const REDUCING_CURVE: (f64, f64) = (-1.25, 0.64);

/// Oxidising channel (NO2 reference gas): (slope, intercept).
///
/// Source: MICS-6814 datasheet, OX sensor sensitivity curve
pub const OXIDISING_CURVE: (f64, f64) = (1.0, -0.8129);

/// NH3 channel: (slope, intercept).
///
/// Source: MICS-6814 datasheet, NH3 sensor sensitivity curve
pub const NH3_CURVE: (f64, f64) = (-1.8, -0.163);

/// Ratio substituted when Rs/R0 is not positive.
///
/// Keeps `log10` defined; the resulting ppm is extreme but finite, which
/// downstream alerting treats as an implausible reading rather than a crash.
pub const RATIO_FLOOR: f64 = 0.0001;
