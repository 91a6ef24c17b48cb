//! Telemetry store and compensation engine for environmental sensor stations
//!
//! Turns raw board readings (temperature, humidity, pressure, metal-oxide
//! gas resistances, particulates, light, noise) into calibrated,
//! unit-labelled, time-stamped measurements, and keeps a bounded history of
//! them for display and alerting.
//!
//! Key constraints:
//! - Runs for months on a single-board computer without growing unbounded
//! - `no_std` capable (needs `alloc` for history)
//! - Configuration is passed in, never read from globals
//!
//! ```no_run
//! use enviro_core::pipeline::{PipelineBuilder, RawFrame};
//! use enviro_core::time::SystemTime;
//!
//! let mut pipeline = PipelineBuilder::new().altitude(85.0).build(SystemTime).unwrap();
//!
//! let frame = RawFrame::climate(23.1, 41.0, 1003.2)
//!     .with_gas(180_000.0, 21_000.0, 95_000.0)
//!     .with_particulates(3.0, 5.0, 6.0);
//!
//! match pipeline.ingest_now(&frame) {
//!     Ok(report) => println!("dew point {:?}", report.dew_point),
//!     Err(e) => eprintln!("frame rejected: {e}"),
//! }
//! println!("{}", pipeline.air_quality());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod logging;

pub mod air_quality;
pub mod buffer;
pub mod calibration;
pub mod compensation;
pub mod constants;
pub mod errors;
pub mod measurement;
pub mod pipeline;
pub mod profile;
pub mod store;
pub mod time;
pub mod units;

// Public API
pub use air_quality::{AirQualityAggregator, AirQualityLevel, AirQualityThresholds, Thresholds};
pub use calibration::{GasCalibrationSettings, GasCalibrationState, GasCalibrator};
pub use errors::{EnviroError, EnviroResult};
pub use measurement::Measurement;
pub use pipeline::{ClimateReport, EnvironmentPipeline, PipelineBuilder, RawFrame};
pub use profile::{CalibrationProfile, ProfileVariant, TemperatureStrategy};
pub use store::{RetentionPolicy, Snapshot, TelemetryStore};
pub use units::{Derived, Variable};

#[cfg(feature = "std")]
pub use store::SharedTelemetryStore;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
