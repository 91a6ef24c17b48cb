//! Air-Quality Severity Thresholds
//!
//! Each list is ascending; a value's level is the number of entries it
//! strictly exceeds, so four thresholds give levels 0 (good) to 4 (very poor).

/// Maximum thresholds per factor.
pub const MAX_THRESHOLDS: usize = 8;

/// PM1 (ug/m3).
pub const PM1_THRESHOLDS: [f64; 4] = [6.0, 17.0, 27.0, 35.0];

/// PM2.5 (ug/m3).
///
/// Source: UK Daily Air Quality Index bands
pub const PM25_THRESHOLDS: [f64; 4] = [11.0, 35.0, 53.0, 70.0];

/// PM10 (ug/m3).
///
/// Source: UK Daily Air Quality Index bands
pub const PM10_THRESHOLDS: [f64; 4] = [16.0, 50.0, 75.0, 100.0];

/// Oxidising gases, NO2 equivalent (ppm).
pub const OXIDISING_THRESHOLDS: [f64; 4] = [0.5, 1.0, 3.0, 5.0];

/// Reducing gases, CO equivalent (ppm).
pub const REDUCING_THRESHOLDS: [f64; 4] = [5.0, 30.0, 50.0, 75.0];

/// Ammonia (ppm).
pub const NH3_THRESHOLDS: [f64; 4] = [2.0, 10.0, 15.0, 20.0];
