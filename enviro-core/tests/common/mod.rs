//! Common test utilities and data generators for integration tests
//!
//! This module provides:
//! - A deterministic station simulator producing realistic raw frames
//! - Fixed timestamps and profiles shared across test files
//! - Assertion helpers for compensated values

#![allow(dead_code)]

use enviro_core::{
    pipeline::{EnvironmentPipeline, PipelineBuilder, RawFrame},
    profile::{
        CalibrationProfile, ClimateCoefficients, CubicCoefficients, GasDriftFactors, GasTriple, ProfileVariant,
        QuadraticCoefficients,
    },
    time::{FixedTime, Timestamp},
};

/// 2024-01-01T00:00:00Z
pub const MIDNIGHT_UTC: Timestamp = 1_704_067_200_000;

pub const MS_PER_MINUTE: u64 = 60_000;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Indoor, no eCO2 sensor, fitted coefficients from a deployed station
pub fn indoor_profile(temp_offset: f64) -> CalibrationProfile {
    CalibrationProfile::new(
        ProfileVariant::Indoor { eco2_tvoc: false },
        ClimateCoefficients {
            temperature: CubicCoefficients { a: -0.0001, b: 0.0037, c: 1.00568, d: -6.78291 },
            humidity: QuadraticCoefficients { a: -0.0032, b: 1.6931, c: 0.9391 },
        },
        deployed_gas_factors(),
        temp_offset,
    )
}

pub fn deployed_gas_factors() -> GasTriple<GasDriftFactors> {
    GasTriple {
        reducing: GasDriftFactors { temperature: -0.015, humidity: 0.0125, pressure: -0.0053 },
        oxidising: GasDriftFactors { temperature: -0.017, humidity: 0.0115, pressure: -0.0072 },
        nh3: GasDriftFactors { temperature: -0.02, humidity: 0.0175, pressure: -0.0051 },
    }
}

/// Pipeline with defaults and a fixed clock at [`MIDNIGHT_UTC`]
pub fn fixed_pipeline() -> EnvironmentPipeline<FixedTime> {
    PipelineBuilder::new()
        .build(FixedTime::new(MIDNIGHT_UTC))
        .expect("default settings are valid")
}

/// Deterministic station simulator
///
/// Simulates:
/// - Diurnal temperature swing with humidity moving the other way
/// - Slow pressure drift
/// - Gas resistances loosely following humidity
/// - Small pseudo-random noise on every channel
pub struct StationSimulator {
    start: Timestamp,
    interval_ms: u64,
    step: u64,
    seed: u32,
}

impl StationSimulator {
    pub fn new(start: Timestamp, interval_ms: u64) -> Self {
        Self { start, interval_ms, step: 0, seed: 42 }
    }

    /// Next frame and its timestamp
    pub fn next_frame(&mut self) -> (Timestamp, RawFrame) {
        let timestamp = self.start + self.step * self.interval_ms;
        let hours = (self.step * self.interval_ms) as f64 / MS_PER_HOUR as f64;
        self.step += 1;

        let angle = 2.0 * std::f64::consts::PI * hours / 24.0;
        let temperature = 24.0 + 3.0 * angle.sin() + self.noise(0.2);
        let humidity = (45.0 - 6.0 * angle.sin() + self.noise(1.0)).clamp(5.0, 95.0);
        let pressure = 1005.0 + 0.1 * hours + self.noise(0.3);

        let gas_scale = 1.0 + (humidity - 45.0) * 0.005;
        let frame = RawFrame::climate(temperature, humidity, pressure)
            .with_gas(
                180_000.0 * gas_scale + self.noise(500.0),
                22_000.0 * gas_scale + self.noise(100.0),
                95_000.0 * gas_scale + self.noise(300.0),
            )
            .with_particulates(
                3.0 + self.noise(1.0).abs(),
                5.0 + self.noise(1.5).abs(),
                7.0 + self.noise(2.0).abs(),
            )
            .with_light(180.0 + self.noise(10.0), 20)
            .with_noise(38.0 + self.noise(2.0));

        (timestamp, frame)
    }

    pub fn frames(&mut self, count: usize) -> Vec<(Timestamp, RawFrame)> {
        (0..count).map(|_| self.next_frame()).collect()
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        let uniform = self.seed as f64 / u32::MAX as f64;
        (uniform - 0.5) * 2.0 * amplitude
    }
}

/// Assert two floats agree within `tolerance`
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +- {tolerance}, got {actual}"
    );
}
