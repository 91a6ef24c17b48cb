//! Station configuration for the Enviro engine
//!
//! Reads the station's `config.json` and its compensation document, picks
//! the calibration-profile variant for the hardware, and turns the lot into
//! a ready [`PipelineBuilder`]. Both documents ship embedded in the crate,
//! so a station with no files on disk still starts with sensible defaults.
//!
//! ```no_run
//! use enviro_config::{load_config, load_station_compensation, pipeline_builder};
//! use enviro_core::time::SystemTime;
//!
//! let config = load_config("/etc/enviro/config.json")?;
//! let document = load_station_compensation(&config)?;
//! let mut pipeline = pipeline_builder(&config, &document)?.build(SystemTime)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::path::Path;

use enviro_core::PipelineBuilder;

pub mod compensation;
pub mod errors;
pub mod registry;
pub mod settings;

pub use compensation::{build_profile, CompensationDocument};
pub use errors::{ConfigError, ConfigResult};
pub use registry::{ProfileRegistry, DEFAULT_PROFILE, GLOBAL_REGISTRY};
pub use settings::{EngineSettings, SensorConfig, TemperatureCompensation};

/// Packaged station configuration
pub fn default_config() -> ConfigResult<SensorConfig> {
    let json = registry::PROFILES
        .get_file("config.json")
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| ConfigError::NotFound("packaged config.json".to_string()))?;
    SensorConfig::from_json(json)
}

/// Read the station configuration, falling back to the packaged one when
/// `path` does not exist
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<SensorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("{} not found, using packaged configuration", path.display());
        return default_config();
    }
    let json = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    SensorConfig::from_json(&json)
}

/// Read a compensation document, falling back to the packaged default when
/// `path` does not exist
pub fn load_compensation(path: impl AsRef<Path>) -> ConfigResult<CompensationDocument> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("{} not found, using packaged compensation profile", path.display());
        return GLOBAL_REGISTRY.get(DEFAULT_PROFILE).map(|doc| *doc);
    }
    let json = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    CompensationDocument::from_json(&json)
}

/// Compensation document named by `config.compensation_path`
pub fn load_station_compensation(config: &SensorConfig) -> ConfigResult<CompensationDocument> {
    load_compensation(&config.compensation_path)
}

/// Pipeline builder carrying everything the configuration specifies
pub fn pipeline_builder(config: &SensorConfig, document: &CompensationDocument) -> ConfigResult<PipelineBuilder> {
    let settings = config.engine_settings()?;
    let profile = build_profile(config, document)?;

    Ok(PipelineBuilder::new()
        .profile(profile)
        .altitude(config.altitude)
        .temperature_scale(config.celsius_or_fahrenheit)
        .retention(settings.retention)
        .gas_calibration(settings.gas_calibration)
        .thresholds(settings.thresholds))
}
