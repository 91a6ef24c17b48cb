//! Ingest Pipeline
//!
//! ## Overview
//!
//! The pipeline is the one place where the core's pieces meet. A device
//! adapter hands it a [`RawFrame`] per sampling cycle; the pipeline
//! compensates, derives, stores, and reports back what it did.
//!
//! ```text
//! RawFrame
//!   │
//!   ├─ temp/hum ──► profile (cubic or CPU, quadratic) ──► dew point, AH
//!   ├─ pressure ──► × altitude factor (compensated temp) ──► sea level
//!   ├─ gas Rs   ──► GasCalibrator (raw climate) ──► ppm
//!   ├─ pm, light, noise, co2, voc ──► as reported (light proximity-gated)
//!   │
//!   ▼
//! TelemetryStore ──► snapshot ──► AirQualityAggregator
//! ```
//!
//! ## Raw vs Compensated Climate
//!
//! Gas drift correction is fitted against what the board sensor reads, so
//! it is fed the *raw* temperature, humidity and pressure. Everything
//! reported or stored uses the compensated values.
//!
//! ## External Readings
//!
//! A station may receive better temperature, humidity or sea-level
//! pressure from a nearby reference. Those replace the compensated values
//! in the store, while the raw board readings still drive gas correction.
//! For an external sea-level pressure, the station pressure the barometer
//! should have read is recovered and reported for downstream services that
//! do their own altitude correction.
//!
//! ## Usage
//!
//! ```rust
//! use enviro_core::pipeline::{PipelineBuilder, RawFrame};
//! use enviro_core::profile::CalibrationProfile;
//! use enviro_core::time::FixedTime;
//! use enviro_core::Variable;
//!
//! let mut pipeline = PipelineBuilder::new()
//!     .profile(CalibrationProfile::uncorrected())
//!     .altitude(120.0)
//!     .build(FixedTime::new(0))
//!     .unwrap();
//!
//! let report = pipeline.ingest(&RawFrame::climate(21.0, 45.0, 998.0), 1_000).unwrap();
//! assert!(report.pressure > 998.0);
//! assert_eq!(pipeline.store().get_current(Variable::Temperature).value(), 21.0);
//! ```

use crate::air_quality::{AirQualityAggregator, AirQualityLevel, AirQualityThresholds};
use crate::calibration::{GasCalibrationSettings, GasCalibrationState, GasCalibrator, GasReading};
use crate::compensation::{
    absolute_humidity, compensate_pressure, dew_point, mixing_ratio, proximity_gated_lux,
    sea_level_to_station_pressure, voc_humidity_compensation, Climate,
};
use crate::errors::EnviroResult;
use crate::measurement::Measurement;
use crate::profile::{CalibrationProfile, GasTriple};
use crate::store::{RetentionPolicy, TelemetryStore};
use crate::time::{TimeSource, Timestamp};
use crate::units::{Derived, TemperatureScale, Variable};

/// PM1, PM2.5 and PM10 mass concentrations (ug/m3)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particulates {
    pub pm1: f64,
    pub pm25: f64,
    pub pm10: f64,
}

/// Ambient light with the proximity count from the same window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightReading {
    pub lux: f64,
    pub proximity: u16,
}

/// Readings from a trusted nearby reference station
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExternalClimate {
    /// Temperature (C) and humidity (%) together
    pub temperature_humidity: Option<(f64, f64)>,
    /// Sea-level pressure (hPa)
    pub sea_level_pressure: Option<f64>,
}

/// Everything an adapter read in one sampling cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFrame {
    pub temperature: f64,
    pub humidity: f64,
    /// Station pressure (hPa)
    pub pressure: f64,
    pub cpu_temperature: Option<f64>,
    /// Gas channel resistances (ohms)
    pub gas: Option<GasTriple<f64>>,
    pub particulates: Option<Particulates>,
    pub light: Option<LightReading>,
    /// dBA
    pub noise: Option<f64>,
    /// ppm
    pub co2: Option<f64>,
    /// ppb
    pub voc: Option<f64>,
    pub external: ExternalClimate,
}

impl RawFrame {
    /// Frame holding only the board climate sensor
    pub fn climate(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
            cpu_temperature: None,
            gas: None,
            particulates: None,
            light: None,
            noise: None,
            co2: None,
            voc: None,
            external: ExternalClimate::default(),
        }
    }

    pub fn with_cpu_temperature(mut self, cpu: f64) -> Self {
        self.cpu_temperature = Some(cpu);
        self
    }

    pub fn with_gas(mut self, reducing: f64, oxidising: f64, nh3: f64) -> Self {
        self.gas = Some(GasTriple { reducing, oxidising, nh3 });
        self
    }

    pub fn with_particulates(mut self, pm1: f64, pm25: f64, pm10: f64) -> Self {
        self.particulates = Some(Particulates { pm1, pm25, pm10 });
        self
    }

    pub fn with_light(mut self, lux: f64, proximity: u16) -> Self {
        self.light = Some(LightReading { lux, proximity });
        self
    }

    pub fn with_noise(mut self, dba: f64) -> Self {
        self.noise = Some(dba);
        self
    }

    pub fn with_eco2_tvoc(mut self, co2_ppm: f64, voc_ppb: f64) -> Self {
        self.co2 = Some(co2_ppm);
        self.voc = Some(voc_ppb);
        self
    }

    pub fn with_external(mut self, external: ExternalClimate) -> Self {
        self.external = external;
        self
    }

    fn raw_climate(&self) -> Climate {
        Climate::new(self.temperature, self.humidity, self.pressure)
    }
}

/// What one ingest produced, raw next to compensated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReport {
    pub timestamp: Timestamp,
    pub raw: Climate,
    /// Stored temperature (C)
    pub temperature: f64,
    /// Stored humidity (%)
    pub humidity: f64,
    /// Stored sea-level pressure (hPa)
    pub pressure: f64,
    /// Pressure without altitude projection (hPa)
    pub station_pressure: f64,
    /// `None` when humidity is not positive
    pub dew_point: Option<Measurement>,
    pub absolute_humidity: Measurement,
    /// Against station pressure, `None` at the vapour-pressure singularity
    pub mixing_ratio: Option<Measurement>,
    /// Scale the station displays temperatures in
    pub temperature_scale: TemperatureScale,
    /// Humidity value for the eCO2/TVOC sensor (mg/m3)
    pub voc_humidity: u32,
    pub gas: Option<GasReading>,
    pub used_external_climate: bool,
    pub used_external_pressure: bool,
}

impl ClimateReport {
    /// Stored temperature converted to the display scale
    pub fn display_temperature(&self) -> f64 {
        self.temperature_scale.from_celsius(self.temperature)
    }
}

/// Running totals since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: u64,
    pub gas_frames: u64,
    /// Frames whose humidity could not produce a dew point
    pub dew_point_skipped: u64,
}

/// Raw frames in, stored measurements out
#[derive(Debug)]
pub struct EnvironmentPipeline<C: TimeSource> {
    profile: CalibrationProfile,
    altitude_m: f64,
    temperature_scale: TemperatureScale,
    store: TelemetryStore<C>,
    calibrator: GasCalibrator,
    aggregator: AirQualityAggregator,
    stats: PipelineStats,
}

impl<C: TimeSource> EnvironmentPipeline<C> {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Ingest a frame stamped by the store's clock
    pub fn ingest_now(&mut self, frame: &RawFrame) -> EnviroResult<ClimateReport> {
        let now = self.store.clock().now();
        self.ingest(frame, now)
    }

    /// Compensate a frame and write every value it carries into the store
    ///
    /// Fails only when the profile uses CPU-proximity correction and the
    /// frame has no CPU temperature; nothing is stored in that case.
    pub fn ingest(&mut self, frame: &RawFrame, now: Timestamp) -> EnviroResult<ClimateReport> {
        let compensated_temp = self.profile.adjust_temperature(frame.temperature, frame.cpu_temperature)?;
        let compensated_hum = self.profile.adjust_humidity(frame.humidity);

        let (temperature, humidity, used_external_climate) = match frame.external.temperature_humidity {
            Some((t, h)) => (t, h, true),
            None => (compensated_temp, compensated_hum, false),
        };

        let dew = match dew_point(temperature, humidity) {
            Ok(dp) => Some(Measurement::derived(Derived::DewPoint, dp, now)),
            Err(e) => {
                log_warn!("Skipping dew point: {}", e);
                self.stats.dew_point_skipped += 1;
                None
            }
        };
        let absolute = Measurement::derived(Derived::AbsoluteHumidity, absolute_humidity(temperature, humidity), now);

        let (pressure, station_pressure, used_external_pressure) = match frame.external.sea_level_pressure {
            Some(sea_level) => (
                sea_level,
                sea_level_to_station_pressure(sea_level, self.altitude_m, temperature),
                true,
            ),
            None => (
                compensate_pressure(frame.pressure, self.altitude_m, temperature),
                frame.pressure,
                false,
            ),
        };

        let mixing = mixing_ratio(temperature, humidity, station_pressure)
            .ok()
            .map(|ratio| Measurement::derived(Derived::MixingRatio, ratio, now));

        let store = &mut self.store;
        store.add_at(Variable::Temperature, temperature, now);
        store.add_at(Variable::Humidity, humidity, now);
        store.add_at(Variable::Pressure, pressure, now);

        let gas = frame.gas.map(|resistance| {
            let reading = self.calibrator.observe(resistance, frame.raw_climate(), now);
            for (variable, ppm) in reading.ppm.entries() {
                store.add_at(variable, ppm, now);
            }
            self.stats.gas_frames += 1;
            reading
        });

        if let Some(pm) = frame.particulates {
            store.add_at(Variable::Pm1, pm.pm1, now);
            store.add_at(Variable::Pm25, pm.pm25, now);
            store.add_at(Variable::Pm10, pm.pm10, now);
        }
        if let Some(light) = frame.light {
            store.add_at(Variable::Light, proximity_gated_lux(light.lux, light.proximity), now);
        }
        if let Some(noise) = frame.noise {
            store.add_at(Variable::Noise, noise, now);
        }
        if let Some(co2) = frame.co2 {
            store.add_at(Variable::Co2, co2, now);
        }
        if let Some(voc) = frame.voc {
            store.add_at(Variable::Voc, voc, now);
        }

        self.stats.frames += 1;

        Ok(ClimateReport {
            timestamp: now,
            raw: frame.raw_climate(),
            temperature,
            humidity,
            pressure,
            station_pressure,
            dew_point: dew,
            absolute_humidity: absolute,
            mixing_ratio: mixing,
            temperature_scale: self.temperature_scale,
            voc_humidity: voc_humidity_compensation(frame.temperature, frame.humidity),
            gas,
            used_external_climate,
            used_external_pressure,
        })
    }

    /// Overall air quality from the store's current values
    pub fn air_quality(&self) -> AirQualityLevel {
        self.aggregator.evaluate(&self.store.snapshot(), self.calibrator.is_calibrated())
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    pub fn altitude(&self) -> f64 {
        self.altitude_m
    }

    pub fn temperature_scale(&self) -> TemperatureScale {
        self.temperature_scale
    }

    pub fn store(&self) -> &TelemetryStore<C> {
        &self.store
    }

    pub fn calibrator(&self) -> &GasCalibrator {
        &self.calibrator
    }

    /// For reset and restore requests from the adapter
    pub fn calibrator_mut(&mut self) -> &mut GasCalibrator {
        &mut self.calibrator
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Hand the store to another owner (e.g. a [`crate::store`] shared wrapper)
    pub fn into_store(self) -> TelemetryStore<C> {
        self.store
    }
}

/// Builder for [`EnvironmentPipeline`]
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    profile: CalibrationProfile,
    altitude_m: f64,
    temperature_scale: TemperatureScale,
    retention: RetentionPolicy,
    gas: GasCalibrationSettings,
    saved_calibration: Option<GasCalibrationState>,
    thresholds: AirQualityThresholds,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            profile: CalibrationProfile::uncorrected(),
            altitude_m: 0.0,
            temperature_scale: TemperatureScale::Celsius,
            retention: RetentionPolicy::default(),
            gas: GasCalibrationSettings::default(),
            saved_calibration: None,
            thresholds: AirQualityThresholds::default(),
        }
    }

    pub fn profile(mut self, profile: CalibrationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Station altitude in metres
    pub fn altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = altitude_m;
        self
    }

    /// Scale used by [`ClimateReport::display_temperature`]; storage stays in C
    pub fn temperature_scale(mut self, scale: TemperatureScale) -> Self {
        self.temperature_scale = scale;
        self
    }

    pub fn retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn gas_calibration(mut self, settings: GasCalibrationSettings) -> Self {
        self.gas = settings;
        self
    }

    /// Baseline exported before the last shutdown
    ///
    /// Dropped at build time when the gas settings ask for a reset.
    pub fn saved_calibration(mut self, state: Option<GasCalibrationState>) -> Self {
        self.saved_calibration = state;
        self
    }

    pub fn thresholds(mut self, thresholds: AirQualityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Validate settings and assemble the pipeline around `clock`
    pub fn build<C: TimeSource>(self, clock: C) -> EnviroResult<EnvironmentPipeline<C>> {
        self.retention.validate()?;
        log_info!(
            "Pipeline ready: altitude {} m, variant {:?}, strategy {:?}",
            self.altitude_m,
            self.profile.variant(),
            self.profile.temperature()
        );
        Ok(EnvironmentPipeline {
            calibrator: GasCalibrator::with_state(self.gas, *self.profile.gas(), self.saved_calibration),
            profile: self.profile,
            altitude_m: self.altitude_m,
            temperature_scale: self.temperature_scale,
            store: TelemetryStore::with_clock(self.retention, clock),
            aggregator: AirQualityAggregator::new(self.thresholds),
            stats: PipelineStats::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EnviroError;
    use crate::time::FixedTime;

    fn pipeline() -> EnvironmentPipeline<FixedTime> {
        EnvironmentPipeline::<FixedTime>::builder().build(FixedTime::new(0)).unwrap()
    }

    #[test]
    fn climate_only_frame_writes_climate() {
        let mut p = pipeline();
        let report = p.ingest(&RawFrame::climate(20.0, 50.0, 1013.0), 10).unwrap();

        assert_eq!(report.temperature, 20.0);
        assert_eq!(report.pressure, 1013.0);
        let dew = report.dew_point.unwrap();
        assert!((dew.value() - 9.26).abs() < 0.1);
        assert_eq!((dew.name(), dew.unit(), dew.timestamp()), ("dew point", "C", 10));
        assert_eq!(report.absolute_humidity.unit(), "g/m3");
        assert_eq!(report.mixing_ratio.unwrap().unit(), "g/kg");
        assert!(report.gas.is_none());

        let store = p.store();
        assert_eq!(store.get_current(Variable::Humidity).value(), 50.0);
        assert!(store.get_current(Variable::Reducing).is_sentinel());
        assert!(store.get_current(Variable::Pm25).is_sentinel());
    }

    #[test]
    fn cpu_strategy_without_cpu_stores_nothing() {
        let profile = CalibrationProfile::uncorrected().with_cpu_compensation(2.25);
        let mut p = EnvironmentPipeline::<FixedTime>::builder()
            .profile(profile)
            .build(FixedTime::new(0))
            .unwrap();

        let err = p.ingest(&RawFrame::climate(20.0, 50.0, 1013.0), 0);
        assert_eq!(err, Err(EnviroError::MissingCpuTemperature));
        assert!(p.store().get_current(Variable::Temperature).is_sentinel());

        let ok = p.ingest(&RawFrame::climate(30.0, 50.0, 1013.0).with_cpu_temperature(52.5), 0);
        assert!((ok.unwrap().temperature - 20.0).abs() < 1e-9);
    }

    #[test]
    fn zero_humidity_skips_dew_point_only() {
        let mut p = pipeline();
        let report = p.ingest(&RawFrame::climate(20.0, 0.0, 1013.0), 0).unwrap();
        assert!(report.dew_point.is_none());
        assert_eq!(p.stats().dew_point_skipped, 1);
        assert_eq!(p.store().get_current(Variable::Humidity).value(), 0.0);
    }

    #[test]
    fn covered_light_sensor_reports_one_lux() {
        let mut p = pipeline();
        p.ingest(&RawFrame::climate(20.0, 50.0, 1013.0).with_light(250.0, 900), 0).unwrap();
        assert_eq!(p.store().get_current(Variable::Light).value(), 1.0);
    }

    #[test]
    fn external_sea_level_pressure_recovers_station_pressure() {
        let mut p = EnvironmentPipeline::<FixedTime>::builder()
            .altitude(300.0)
            .build(FixedTime::new(0))
            .unwrap();
        let frame = RawFrame::climate(15.0, 50.0, 978.0).with_external(ExternalClimate {
            temperature_humidity: None,
            sea_level_pressure: Some(1013.0),
        });
        let report = p.ingest(&frame, 0).unwrap();

        assert!(report.used_external_pressure);
        assert_eq!(report.pressure, 1013.0);
        assert!(report.station_pressure < 1013.0);
        assert!((compensate_pressure(report.station_pressure, 300.0, 15.0) - 1013.0).abs() < 1e-9);
    }

    #[test]
    fn display_scale_leaves_storage_in_celsius() {
        let mut p = EnvironmentPipeline::<FixedTime>::builder()
            .temperature_scale(TemperatureScale::Fahrenheit)
            .build(FixedTime::new(0))
            .unwrap();
        let report = p.ingest(&RawFrame::climate(25.0, 50.0, 1013.0), 0).unwrap();
        assert!((report.display_temperature() - 77.0).abs() < 1e-9);
        assert_eq!(p.store().get_current(Variable::Temperature).value(), 25.0);
        assert_eq!(p.temperature_scale(), TemperatureScale::Fahrenheit);
    }

    #[test]
    fn invalid_retention_rejected_at_build() {
        let result = EnvironmentPipeline::<FixedTime>::builder()
            .retention(RetentionPolicy { limit_history: 0, history_check: 1, chunk: 1 })
            .build(FixedTime::new(0));
        assert!(result.is_err());
    }
}
