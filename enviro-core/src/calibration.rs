//! Gas Calibration State Machine
//!
//! ## Why Calibrate?
//!
//! A metal-oxide sensor reports resistance, and concentration is a function
//! of the *ratio* of that resistance to its clean-air baseline R0. R0 is
//! not a datasheet constant: it differs per unit, moves while the heater
//! stabilises after power-on, and drifts over days. The calibrator owns R0
//! and decides when a fresh one is sampled.
//!
//! ## States
//!
//! ```text
//!                 start / first observe
//!  Uninitialized ───────────────────────► Warming { since, provisional R0 }
//!       ▲                                    │
//!       │ reset()          warm-up elapsed   │  or daily hour reached
//!       │                                    │  after a minimum warm-up
//!       │                                    ▼
//!       └──────────────────────────────  Calibrated { R0, climate, at }
//!                                            │  ▲
//!                                            └──┘ daily hour (once per day)
//! ```
//!
//! While **Warming**, the first reading stands in for R0 and raw
//! resistances go straight to ppm conversion; drift correction is skipped
//! because there is no trustworthy calibration climate yet.
//!
//! Once **Calibrated**, every reading is drift-corrected against the
//! climate captured with R0 before conversion.
//!
//! ## Atomic Baselines
//!
//! The three channels' baselines live in one [`GasTriple`] and are
//! replaced as a single value, so a reading never mixes an old reducing R0
//! with a new oxidising one.
//!
//! ## Usage
//!
//! ```rust
//! use enviro_core::calibration::{GasCalibrationSettings, GasCalibrator};
//! use enviro_core::compensation::Climate;
//! use enviro_core::profile::GasTriple;
//!
//! let mut calibrator = GasCalibrator::new(GasCalibrationSettings::default(), GasTriple::default());
//! let climate = Climate::new(21.0, 45.0, 1012.0);
//!
//! let first = calibrator.observe(GasTriple::splat(40_000.0), climate, 0);
//! assert!(!first.calibrated);
//! ```

use crate::compensation::{compensate_gases, gas_to_ppm_all, Climate};
use crate::constants::time::{
    DEFAULT_GAS_CALIBRATION_HOUR, DEFAULT_GAS_WARMUP_HOURS, MIN_WARMUP_BEFORE_DAILY_HOURS,
};
use crate::profile::{GasDriftFactors, GasTriple};
use crate::time::{hours_between, local_hour, Timestamp};

/// Scheduling knobs for R0 sampling
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasCalibrationSettings {
    /// Hours after start before the first baseline is sampled
    pub warmup_hours: f64,
    /// Local hour (0-23) at which the baseline is re-sampled each day
    pub daily_calibration_hour: u8,
    /// Station offset from UTC, used to find the local hour
    pub utc_offset_minutes: i32,
    /// Discard any restored baseline and start from scratch
    pub reset_calibration: bool,
}

impl Default for GasCalibrationSettings {
    fn default() -> Self {
        Self {
            warmup_hours: DEFAULT_GAS_WARMUP_HOURS,
            daily_calibration_hour: DEFAULT_GAS_CALIBRATION_HOUR,
            utc_offset_minutes: 0,
            reset_calibration: false,
        }
    }
}

/// A sampled baseline and the conditions it was sampled in
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasCalibrationState {
    pub r0: GasTriple<f64>,
    pub calibrated_at: Timestamp,
    pub climate: Climate,
}

/// Where the calibrator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationPhase {
    Uninitialized,
    Warming {
        since: Timestamp,
        /// First reading after start; `None` until one arrives
        provisional_r0: Option<GasTriple<f64>>,
    },
    Calibrated(GasCalibrationState),
}

/// One gas observation after calibration gating
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasReading {
    /// Resistances as reported by the sensor (ohms)
    pub raw: GasTriple<f64>,
    /// Drift-corrected resistances, equal to `raw` until calibrated
    pub compensated: GasTriple<f64>,
    /// Concentrations (ppm)
    pub ppm: GasTriple<f64>,
    /// Whether `ppm` is relative to a sampled baseline
    pub calibrated: bool,
}

/// Owner of the R0 baselines
#[derive(Debug, Clone)]
pub struct GasCalibrator {
    settings: GasCalibrationSettings,
    factors: GasTriple<GasDriftFactors>,
    phase: CalibrationPhase,
    /// Set once the current daily-hour window has sampled a baseline
    in_daily_window: bool,
}

impl GasCalibrator {
    pub fn new(settings: GasCalibrationSettings, factors: GasTriple<GasDriftFactors>) -> Self {
        Self {
            settings,
            factors,
            phase: CalibrationPhase::Uninitialized,
            in_daily_window: false,
        }
    }

    /// Resume from a previously exported baseline
    ///
    /// Honours `reset_calibration`: when set, the saved baseline is dropped
    /// and the calibrator starts uninitialised.
    pub fn with_state(
        settings: GasCalibrationSettings,
        factors: GasTriple<GasDriftFactors>,
        saved: Option<GasCalibrationState>,
    ) -> Self {
        let mut calibrator = Self::new(settings, factors);
        match saved {
            Some(_) if settings.reset_calibration => {
                log_info!("Gas calibration reset requested, discarding saved baseline");
            }
            Some(state) => calibrator.restore(state),
            None => {}
        }
        calibrator
    }

    pub fn settings(&self) -> &GasCalibrationSettings {
        &self.settings
    }

    pub fn phase(&self) -> &CalibrationPhase {
        &self.phase
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self.phase, CalibrationPhase::Calibrated(_))
    }

    /// Current baseline, if one has been sampled or restored
    pub fn state(&self) -> Option<GasCalibrationState> {
        match self.phase {
            CalibrationPhase::Calibrated(state) => Some(state),
            _ => None,
        }
    }

    /// Enter warm-up; no effect unless uninitialised
    pub fn start(&mut self, now: Timestamp) {
        if let CalibrationPhase::Uninitialized = self.phase {
            log_info!("Gas sensor warm-up started");
            self.phase = CalibrationPhase::Warming { since: now, provisional_r0: None };
        }
    }

    /// Drop any baseline and return to `Uninitialized`
    pub fn reset(&mut self) {
        log_info!("Gas calibration reset");
        self.phase = CalibrationPhase::Uninitialized;
        self.in_daily_window = false;
    }

    /// Adopt a baseline sampled elsewhere (e.g. before a restart)
    pub fn restore(&mut self, state: GasCalibrationState) {
        log_info!("Gas calibration restored from t={}", state.calibrated_at);
        self.phase = CalibrationPhase::Calibrated(state);
    }

    /// Feed one set of raw resistances with the raw climate they were read in
    pub fn observe(&mut self, raw: GasTriple<f64>, climate: Climate, now: Timestamp) -> GasReading {
        self.start(now);
        if let CalibrationPhase::Warming { provisional_r0: slot @ None, .. } = &mut self.phase {
            *slot = Some(raw);
        }
        self.run_schedule(raw, climate, now);

        match self.phase {
            CalibrationPhase::Calibrated(state) => {
                let compensated = compensate_gases(raw, state.climate, climate, &self.factors);
                GasReading {
                    raw,
                    compensated,
                    ppm: gas_to_ppm_all(compensated, state.r0),
                    calibrated: true,
                }
            }
            CalibrationPhase::Warming { provisional_r0, .. } => GasReading {
                raw,
                compensated: raw,
                ppm: gas_to_ppm_all(raw, provisional_r0.unwrap_or(raw)),
                calibrated: false,
            },
            CalibrationPhase::Uninitialized => GasReading {
                raw,
                compensated: raw,
                ppm: gas_to_ppm_all(raw, raw),
                calibrated: false,
            },
        }
    }

    fn run_schedule(&mut self, raw: GasTriple<f64>, climate: Climate, now: Timestamp) {
        let at_daily_hour = local_hour(now, self.settings.utc_offset_minutes) == self.settings.daily_calibration_hour;
        if !at_daily_hour {
            self.in_daily_window = false;
        }
        let daily_due = at_daily_hour && !self.in_daily_window;

        let due = match self.phase {
            CalibrationPhase::Warming { since, .. } => {
                let warmed = hours_between(since, now);
                let min_for_daily = self.settings.warmup_hours.min(MIN_WARMUP_BEFORE_DAILY_HOURS);
                warmed >= self.settings.warmup_hours || (daily_due && warmed >= min_for_daily)
            }
            CalibrationPhase::Calibrated(_) => daily_due,
            CalibrationPhase::Uninitialized => false,
        };

        if due {
            self.in_daily_window = at_daily_hour;
            log_info!(
                "Gas R0 sampled: red {:.0} oxi {:.0} nh3 {:.0}",
                raw.reducing,
                raw.oxidising,
                raw.nh3
            );
            self.phase = CalibrationPhase::Calibrated(GasCalibrationState {
                r0: raw,
                calibrated_at: now,
                climate,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::time::MS_PER_HOUR;

    // 2024-01-01T00:00:00Z
    const MIDNIGHT: Timestamp = 1_704_067_200_000;

    fn calibrator() -> GasCalibrator {
        GasCalibrator::new(GasCalibrationSettings::default(), GasTriple::default())
    }

    fn climate() -> Climate {
        Climate::new(22.0, 40.0, 1005.0)
    }

    #[test]
    fn first_observe_starts_warmup_with_provisional_baseline() {
        let mut cal = calibrator();
        assert_eq!(*cal.phase(), CalibrationPhase::Uninitialized);

        let reading = cal.observe(GasTriple::splat(20_000.0), climate(), MIDNIGHT);
        assert!(!reading.calibrated);
        assert_eq!(reading.compensated, reading.raw);
        assert!(matches!(
            cal.phase(),
            CalibrationPhase::Warming { since: MIDNIGHT, provisional_r0: Some(_) }
        ));

        // Later warm-up readings are still relative to the first one
        let later = cal.observe(GasTriple::splat(40_000.0), climate(), MIDNIGHT + 60_000);
        let expected = gas_to_ppm_all(GasTriple::splat(40_000.0), GasTriple::splat(20_000.0));
        assert_eq!(later.ppm, expected);
    }

    #[test]
    fn calibrates_after_warmup() {
        let mut cal = calibrator();
        cal.observe(GasTriple::splat(20_000.0), climate(), MIDNIGHT);
        cal.observe(GasTriple::splat(25_000.0), climate(), MIDNIGHT + MS_PER_HOUR - 1);
        assert!(!cal.is_calibrated());

        let reading = cal.observe(GasTriple::splat(30_000.0), climate(), MIDNIGHT + MS_PER_HOUR);
        assert!(reading.calibrated);
        let state = cal.state().unwrap();
        assert_eq!(state.r0, GasTriple::splat(30_000.0));
        assert_eq!(state.climate, climate());
        assert_eq!(state.calibrated_at, MIDNIGHT + MS_PER_HOUR);
    }

    #[test]
    fn daily_hour_recalibrates_once() {
        let mut cal = calibrator();
        cal.observe(GasTriple::splat(20_000.0), climate(), MIDNIGHT);
        cal.observe(GasTriple::splat(21_000.0), climate(), MIDNIGHT + MS_PER_HOUR);
        assert_eq!(cal.state().unwrap().r0, GasTriple::splat(21_000.0));

        let three_am = MIDNIGHT + 3 * MS_PER_HOUR;
        cal.observe(GasTriple::splat(35_000.0), climate(), three_am);
        assert_eq!(cal.state().unwrap().r0, GasTriple::splat(35_000.0));

        // Still 3 AM: no second sample
        cal.observe(GasTriple::splat(50_000.0), climate(), three_am + 30 * 60_000);
        assert_eq!(cal.state().unwrap().r0, GasTriple::splat(35_000.0));

        // Next day at 3 AM
        cal.observe(GasTriple::splat(45_000.0), climate(), three_am + 12 * MS_PER_HOUR);
        cal.observe(GasTriple::splat(44_000.0), climate(), three_am + 24 * MS_PER_HOUR);
        assert_eq!(cal.state().unwrap().r0, GasTriple::splat(44_000.0));
    }

    #[test]
    fn daily_hour_respects_utc_offset() {
        let settings = GasCalibrationSettings { utc_offset_minutes: 3 * 60, ..Default::default() };
        let mut cal = GasCalibrator::new(settings, GasTriple::default());
        // Midnight UTC is 3 AM local; warming began at 2:30 local
        cal.observe(GasTriple::splat(18_000.0), climate(), MIDNIGHT - 30 * 60_000);
        assert!(!cal.is_calibrated());
        let reading = cal.observe(GasTriple::splat(20_000.0), climate(), MIDNIGHT);
        assert!(reading.calibrated);
    }

    #[test]
    fn boot_inside_daily_hour_waits_for_minimum_warmup() {
        let settings = GasCalibrationSettings { utc_offset_minutes: 3 * 60, ..Default::default() };
        let mut cal = GasCalibrator::new(settings, GasTriple::default());
        let minute = 60_000;

        // Powered on at 3:00 local: cold heater, no baseline yet
        assert!(!cal.observe(GasTriple::splat(5_000.0), climate(), MIDNIGHT).calibrated);
        assert!(!cal.observe(GasTriple::splat(9_000.0), climate(), MIDNIGHT + 10 * minute).calibrated);

        // 3:15 local, still inside the daily hour
        let reading = cal.observe(GasTriple::splat(20_000.0), climate(), MIDNIGHT + 15 * minute);
        assert!(reading.calibrated);
        assert_eq!(cal.state().unwrap().r0, GasTriple::splat(20_000.0));

        // Same window does not sample again
        cal.observe(GasTriple::splat(30_000.0), climate(), MIDNIGHT + 40 * minute);
        assert_eq!(cal.state().unwrap().r0, GasTriple::splat(20_000.0));
    }

    #[test]
    fn calibrated_readings_are_drift_corrected() {
        let factors = GasTriple::splat(GasDriftFactors { temperature: 0.01, humidity: 0.0, pressure: 0.0 });
        let mut cal = GasCalibrator::new(GasCalibrationSettings::default(), factors);
        cal.restore(GasCalibrationState {
            r0: GasTriple::splat(1000.0),
            calibrated_at: MIDNIGHT,
            climate: Climate::new(20.0, 40.0, 1005.0),
        });

        let warmer = Climate::new(25.0, 40.0, 1005.0);
        let reading = cal.observe(GasTriple::splat(1000.0), warmer, MIDNIGHT + MS_PER_HOUR);
        assert!(reading.calibrated);
        assert!((reading.compensated.reducing - 950.0).abs() < 1e-9);
        assert_eq!(reading.raw.reducing, 1000.0);
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut cal = calibrator();
        cal.observe(GasTriple::splat(20_000.0), climate(), MIDNIGHT);
        cal.observe(GasTriple::splat(20_000.0), climate(), MIDNIGHT + 2 * MS_PER_HOUR);
        assert!(cal.is_calibrated());

        cal.reset();
        assert_eq!(*cal.phase(), CalibrationPhase::Uninitialized);
        assert!(cal.state().is_none());
    }

    #[test]
    fn reset_flag_discards_saved_state() {
        let saved = GasCalibrationState {
            r0: GasTriple::splat(1000.0),
            calibrated_at: MIDNIGHT,
            climate: climate(),
        };

        let kept = GasCalibrator::with_state(GasCalibrationSettings::default(), GasTriple::default(), Some(saved));
        assert!(kept.is_calibrated());

        let settings = GasCalibrationSettings { reset_calibration: true, ..Default::default() };
        let dropped = GasCalibrator::with_state(settings, GasTriple::default(), Some(saved));
        assert_eq!(*dropped.phase(), CalibrationPhase::Uninitialized);
    }
}
