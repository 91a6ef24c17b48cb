//! Integration tests for the ingest pipeline
//!
//! Tests the complete data flow from raw frames through compensation, gas
//! calibration, storage and air-quality aggregation.

mod common;

use enviro_core::{
    air_quality::AirQualityLevel,
    calibration::{CalibrationPhase, GasCalibrationSettings, GasCalibrationState},
    compensation::{self, Climate},
    pipeline::{ExternalClimate, PipelineBuilder, RawFrame},
    profile::GasTriple,
    time::FixedTime,
    Variable,
};

use common::{
    assert_close, fixed_pipeline, indoor_profile, StationSimulator, MIDNIGHT_UTC, MS_PER_HOUR, MS_PER_MINUTE,
};

#[test]
fn full_frame_writes_every_variable() {
    let mut pipeline = fixed_pipeline();
    let frame = RawFrame::climate(22.0, 40.0, 1002.0)
        .with_gas(150_000.0, 20_000.0, 90_000.0)
        .with_particulates(2.0, 4.0, 6.0)
        .with_light(300.0, 10)
        .with_noise(41.0)
        .with_eco2_tvoc(420.0, 35.0);

    pipeline.ingest(&frame, MIDNIGHT_UTC).unwrap();

    let snapshot = pipeline.store().snapshot();
    for (variable, measurement) in snapshot.iter() {
        assert!(!measurement.is_sentinel(), "{variable} was not written");
        assert_eq!(measurement.unit(), variable.unit());
        assert_eq!(measurement.timestamp(), MIDNIGHT_UTC);
    }
    assert_eq!(pipeline.stats().frames, 1);
    assert_eq!(pipeline.stats().gas_frames, 1);
}

#[test]
fn profile_corrections_reach_the_store() {
    let profile = indoor_profile(0.5);
    let mut pipeline = PipelineBuilder::new()
        .profile(profile)
        .altitude(250.0)
        .build(FixedTime::new(MIDNIGHT_UTC))
        .unwrap();

    let report = pipeline.ingest(&RawFrame::climate(28.0, 35.0, 980.0), MIDNIGHT_UTC).unwrap();

    let expected_temp = -0.0001 * 28f64.powi(3) + 0.0037 * 28f64.powi(2) + 1.00568 * 28.0 - 6.78291 + 0.5;
    assert_close(report.temperature, expected_temp, 1e-9);
    let expected_hum = (-0.0032 * 35f64.powi(2) + 1.6931 * 35.0 + 0.9391).min(100.0);
    assert_close(report.humidity, expected_hum, 1e-9);

    let factor = compensation::barometer_altitude_compensation(250.0, expected_temp);
    assert_close(report.pressure, 980.0 * factor, 1e-9);
    assert_eq!(report.station_pressure, 980.0);

    let store = pipeline.store();
    assert_close(store.get_current(Variable::Temperature).value(), expected_temp, 1e-9);
    assert_close(
        report.dew_point.unwrap().value(),
        compensation::dew_point(expected_temp, expected_hum).unwrap(),
        1e-12,
    );
}

#[test]
fn gas_warmup_then_calibration() {
    let mut pipeline = fixed_pipeline();
    let mut sim = StationSimulator::new(MIDNIGHT_UTC, 5 * MS_PER_MINUTE);

    // First 55 minutes: warming, ppm relative to the first reading
    for (timestamp, frame) in sim.frames(12) {
        let report = pipeline.ingest(&frame, timestamp).unwrap();
        let gas = report.gas.unwrap();
        assert!(!gas.calibrated);
        assert_eq!(gas.compensated, gas.raw);
    }
    assert!(matches!(pipeline.calibrator().phase(), CalibrationPhase::Warming { .. }));

    // 60 minutes: baseline sampled from this frame and its raw climate
    let (timestamp, frame) = sim.next_frame();
    let report = pipeline.ingest(&frame, timestamp).unwrap();
    let state = pipeline.calibrator().state().unwrap();
    assert_eq!(state.r0, frame.gas.unwrap());
    assert_eq!(state.climate, Climate::new(frame.temperature, frame.humidity, frame.pressure));
    assert!(report.gas.unwrap().calibrated);

    // Stored gas values are the ppm conversion of the compensated resistances
    let (timestamp, frame) = sim.next_frame();
    let report = pipeline.ingest(&frame, timestamp).unwrap();
    let gas = report.gas.unwrap();
    let expected = compensation::gas_to_ppm_all(gas.compensated, state.r0);
    assert_eq!(gas.ppm, expected);
    assert_eq!(pipeline.store().get_current(Variable::Reducing).value(), expected.reducing);
}

#[test]
fn air_quality_excludes_gas_until_calibrated() {
    let mut pipeline = fixed_pipeline();

    // Very low reducing resistance reads as high CO once calibrated
    let frame = RawFrame::climate(22.0, 40.0, 1002.0)
        .with_gas(150_000.0, 20_000.0, 90_000.0)
        .with_particulates(2.0, 12.0, 6.0);
    pipeline.ingest(&frame, MIDNIGHT_UTC).unwrap();

    let polluted = RawFrame::climate(22.0, 40.0, 1002.0)
        .with_gas(5_000.0, 20_000.0, 90_000.0)
        .with_particulates(2.0, 12.0, 6.0);
    pipeline.ingest(&polluted, MIDNIGHT_UTC + MS_PER_MINUTE).unwrap();

    assert_eq!(
        pipeline.air_quality(),
        AirQualityLevel { factor: Some(Variable::Pm25), level: 1 }
    );

    pipeline.calibrator_mut().restore(GasCalibrationState {
        r0: GasTriple { reducing: 150_000.0, oxidising: 20_000.0, nh3: 90_000.0 },
        calibrated_at: MIDNIGHT_UTC,
        climate: Climate::new(22.0, 40.0, 1002.0),
    });
    pipeline.ingest(&polluted, MIDNIGHT_UTC + 2 * MS_PER_MINUTE).unwrap();

    let level = pipeline.air_quality();
    assert_eq!(level.factor, Some(Variable::Reducing));
    assert_eq!(level.level, 4);
}

#[test]
fn saved_baseline_resumes_unless_reset_requested() {
    let saved = GasCalibrationState {
        r0: GasTriple { reducing: 150_000.0, oxidising: 20_000.0, nh3: 90_000.0 },
        calibrated_at: MIDNIGHT_UTC - MS_PER_HOUR,
        climate: Climate::new(22.0, 40.0, 1002.0),
    };
    let frame = RawFrame::climate(22.0, 40.0, 1002.0).with_gas(75_000.0, 20_000.0, 90_000.0);

    let mut resumed = PipelineBuilder::new()
        .saved_calibration(Some(saved))
        .build(FixedTime::new(MIDNIGHT_UTC))
        .unwrap();
    assert_eq!(resumed.calibrator().state(), Some(saved));
    let gas = resumed.ingest(&frame, MIDNIGHT_UTC).unwrap().gas.unwrap();
    assert!(gas.calibrated);
    assert_eq!(gas.ppm, compensation::gas_to_ppm_all(gas.compensated, saved.r0));

    let settings = GasCalibrationSettings { reset_calibration: true, ..Default::default() };
    let mut fresh = PipelineBuilder::new()
        .gas_calibration(settings)
        .saved_calibration(Some(saved))
        .build(FixedTime::new(MIDNIGHT_UTC))
        .unwrap();
    assert_eq!(*fresh.calibrator().phase(), CalibrationPhase::Uninitialized);
    let gas = fresh.ingest(&frame, MIDNIGHT_UTC).unwrap().gas.unwrap();
    assert!(!gas.calibrated);
    assert_eq!(fresh.air_quality().factor, None);
}

#[test]
fn daily_recalibration_uses_local_time() {
    let settings = GasCalibrationSettings {
        utc_offset_minutes: -5 * 60,
        daily_calibration_hour: 3,
        ..Default::default()
    };
    let mut pipeline = PipelineBuilder::new()
        .gas_calibration(settings)
        .build(FixedTime::new(MIDNIGHT_UTC))
        .unwrap();

    let frame = |r: f64| RawFrame::climate(20.0, 50.0, 1010.0).with_gas(r, 20_000.0, 90_000.0);

    // 00:00 UTC is 19:00 local
    pipeline.ingest(&frame(100_000.0), MIDNIGHT_UTC).unwrap();
    pipeline.ingest(&frame(110_000.0), MIDNIGHT_UTC + MS_PER_HOUR).unwrap();
    assert_eq!(pipeline.calibrator().state().unwrap().r0.reducing, 110_000.0);

    // 08:00 UTC is 03:00 local
    pipeline.ingest(&frame(120_000.0), MIDNIGHT_UTC + 8 * MS_PER_HOUR).unwrap();
    assert_eq!(pipeline.calibrator().state().unwrap().r0.reducing, 120_000.0);
}

#[test]
fn external_climate_replaces_board_values() {
    let mut pipeline = fixed_pipeline();
    let frame = RawFrame::climate(31.0, 25.0, 1000.0)
        .with_gas(150_000.0, 20_000.0, 90_000.0)
        .with_external(ExternalClimate {
            temperature_humidity: Some((21.5, 48.0)),
            sea_level_pressure: None,
        });

    let report = pipeline.ingest(&frame, MIDNIGHT_UTC).unwrap();
    assert!(report.used_external_climate);
    assert_eq!(pipeline.store().get_current(Variable::Temperature).value(), 21.5);
    assert_eq!(pipeline.store().get_current(Variable::Humidity).value(), 48.0);
    // Gas calibration still sees the board climate
    assert_eq!(report.raw, Climate::new(31.0, 25.0, 1000.0));
    assert_eq!(report.voc_humidity, compensation::voc_humidity_compensation(31.0, 25.0));
}

#[test]
fn long_run_tracks_extremes() {
    let mut pipeline = fixed_pipeline();
    let mut sim = StationSimulator::new(MIDNIGHT_UTC, 10 * MS_PER_MINUTE);

    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for (timestamp, frame) in sim.frames(6 * 48) {
        let report = pipeline.ingest(&frame, timestamp).unwrap();
        min = min.min(report.temperature);
        max = max.max(report.temperature);
    }

    let extremes = pipeline.store().extremes(Variable::Temperature).unwrap();
    assert_eq!(extremes.min.value(), min);
    assert_eq!(extremes.max.value(), max);
    assert!(max - min > 4.0, "diurnal swing missing: {min}..{max}");
    assert!(pipeline.calibrator().is_calibrated());
}
