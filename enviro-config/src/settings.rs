//! Station configuration document
//!
//! Field names match the JSON document written by the station setup tool,
//! so existing `config.json` files load unchanged. Everything the engine
//! needs is turned into the core's plain settings structs by
//! [`SensorConfig::engine_settings`].

use std::collections::BTreeMap;

use enviro_core::{
    constants::physics::DEFAULT_CPU_FACTOR,
    constants::time::{DEFAULT_GAS_CALIBRATION_HOUR, DEFAULT_GAS_WARMUP_HOURS},
    units::TemperatureScale,
    AirQualityThresholds, GasCalibrationSettings, RetentionPolicy, Thresholds, Variable,
};
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// How raw board temperature is corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureCompensation {
    /// Cubic fit from the compensation document
    #[default]
    Polynomial,
    /// Subtract CPU heat using `cpu_factor`
    Cpu,
}

/// Partial retention override, unset fields keep the engine defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetentionOverride {
    #[serde(default)]
    pub limit_history: Option<usize>,
    #[serde(default)]
    pub history_check: Option<u32>,
    #[serde(default)]
    pub chunk: Option<usize>,
}

/// Station configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default)]
    pub celsius_or_fahrenheit: TemperatureScale,
    #[serde(default)]
    pub temp_offset: f64,
    /// Metres above sea level
    #[serde(default)]
    pub altitude: f64,
    #[serde(default = "enabled")]
    pub enable_display: bool,
    #[serde(default)]
    pub enable_proxy_sensor: bool,
    #[serde(default)]
    pub enable_climate_and_gas_logging: bool,
    #[serde(default = "enabled")]
    pub enable_particle_sensor: bool,
    #[serde(default = "enabled")]
    pub enable_oxi_redux_nh3: bool,
    #[serde(default)]
    pub enable_eco2_tvoc: bool,
    #[serde(default)]
    pub enable_noise: bool,
    #[serde(default = "default_calibration_hour")]
    pub gas_daily_r0_calibration_hour: u8,
    #[serde(default)]
    pub reset_gas_sensor_calibration: bool,
    /// Compensation document path, empty selects the embedded default
    #[serde(default)]
    pub compensation_path: String,
    #[serde(default)]
    pub has_weather_cover: bool,
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub time_zone: String,
    /// Local offset used for the daily calibration hour
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_warmup_hours")]
    pub gas_warmup_hours: f64,
    #[serde(default)]
    pub temperature_compensation: TemperatureCompensation,
    #[serde(default = "default_cpu_factor")]
    pub cpu_factor: f64,
    #[serde(default)]
    pub retention: RetentionOverride,
    /// Per-variable threshold lists replacing the built-in ones
    #[serde(default)]
    pub air_quality_thresholds: BTreeMap<String, Vec<f64>>,
}

fn enabled() -> bool {
    true
}

fn default_calibration_hour() -> u8 {
    DEFAULT_GAS_CALIBRATION_HOUR
}

fn default_warmup_hours() -> f64 {
    DEFAULT_GAS_WARMUP_HOURS
}

fn default_cpu_factor() -> f64 {
    DEFAULT_CPU_FACTOR
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            celsius_or_fahrenheit: TemperatureScale::Celsius,
            temp_offset: 0.0,
            altitude: 0.0,
            enable_display: true,
            enable_proxy_sensor: false,
            enable_climate_and_gas_logging: false,
            enable_particle_sensor: true,
            enable_oxi_redux_nh3: true,
            enable_eco2_tvoc: false,
            enable_noise: false,
            gas_daily_r0_calibration_hour: DEFAULT_GAS_CALIBRATION_HOUR,
            reset_gas_sensor_calibration: false,
            compensation_path: String::new(),
            has_weather_cover: false,
            city_name: String::new(),
            time_zone: String::new(),
            utc_offset_minutes: 0,
            gas_warmup_hours: DEFAULT_GAS_WARMUP_HOURS,
            temperature_compensation: TemperatureCompensation::Polynomial,
            cpu_factor: DEFAULT_CPU_FACTOR,
            retention: RetentionOverride::default(),
            air_quality_thresholds: BTreeMap::new(),
        }
    }
}

/// Engine-side settings derived from a [`SensorConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub retention: RetentionPolicy,
    pub gas_calibration: GasCalibrationSettings,
    pub thresholds: AirQualityThresholds,
}

impl SensorConfig {
    /// Parse a configuration document
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.gas_daily_r0_calibration_hour > 23 {
            return Err(ConfigError::Invalid(format!(
                "gas_daily_r0_calibration_hour {} is not an hour of the day",
                self.gas_daily_r0_calibration_hour
            )));
        }
        if !self.gas_warmup_hours.is_finite() || self.gas_warmup_hours < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "gas_warmup_hours {} must be a non-negative number",
                self.gas_warmup_hours
            )));
        }
        if self.utc_offset_minutes.abs() > 14 * 60 {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_minutes {} is outside +-14h",
                self.utc_offset_minutes
            )));
        }
        if !self.altitude.is_finite() || !self.temp_offset.is_finite() || !self.cpu_factor.is_finite() {
            return Err(ConfigError::Invalid("altitude, temp_offset and cpu_factor must be finite".to_string()));
        }
        if self.temperature_compensation == TemperatureCompensation::Cpu && self.cpu_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!("cpu_factor {} must be positive", self.cpu_factor)));
        }
        Ok(())
    }

    /// Retention policy with any overrides applied
    pub fn retention_policy(&self) -> ConfigResult<RetentionPolicy> {
        let defaults = RetentionPolicy::default();
        let policy = RetentionPolicy::new(
            self.retention.limit_history.unwrap_or(defaults.limit_history),
            self.retention.history_check.unwrap_or(defaults.history_check),
            self.retention.chunk.unwrap_or(defaults.chunk),
        )?;
        Ok(policy)
    }

    pub fn gas_calibration(&self) -> GasCalibrationSettings {
        GasCalibrationSettings {
            warmup_hours: self.gas_warmup_hours,
            daily_calibration_hour: self.gas_daily_r0_calibration_hour,
            utc_offset_minutes: self.utc_offset_minutes,
            reset_calibration: self.reset_gas_sensor_calibration,
        }
    }

    /// Built-in thresholds with configured lists swapped in
    pub fn air_quality_thresholds(&self) -> ConfigResult<AirQualityThresholds> {
        let mut thresholds = AirQualityThresholds::default();
        for (name, values) in &self.air_quality_thresholds {
            let variable = Variable::from_name(name)
                .map_err(|_| ConfigError::Invalid(format!("unknown air-quality factor '{name}'")))?;
            thresholds.set(variable, Thresholds::new(values)?);
        }
        Ok(thresholds)
    }

    pub fn engine_settings(&self) -> ConfigResult<EngineSettings> {
        self.validate()?;
        Ok(EngineSettings {
            retention: self.retention_policy()?,
            gas_calibration: self.gas_calibration(),
            thresholds: self.air_quality_thresholds()?,
        })
    }
}
