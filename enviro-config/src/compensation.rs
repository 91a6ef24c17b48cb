//! Compensation document and calibration-profile selection
//!
//! The document holds one temperature/humidity fit per hardware variant and
//! a single set of gas drift factors:
//!
//! ```json
//! {
//!   "weather": {
//!     "true":  { "comp_temp_cub_a": ..., "comp_hum_quad_c": ... },
//!     "false": { "enable_eco2_tvoc": { "true": { ... }, "false": { ... } } }
//!   },
//!   "red_temp_comp_factor": ..., "nh3_bar_comp_factor": ...
//! }
//! ```

use enviro_core::{
    profile::{ClimateCoefficients, CubicCoefficients, GasDriftFactors, GasTriple, QuadraticCoefficients},
    CalibrationProfile, ProfileVariant,
};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ConfigError, ConfigResult},
    settings::{SensorConfig, TemperatureCompensation},
};

/// Climate fit for one variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateFit {
    pub comp_temp_cub_a: f64,
    pub comp_temp_cub_b: f64,
    pub comp_temp_cub_c: f64,
    pub comp_temp_cub_d: f64,
    pub comp_hum_quad_a: f64,
    pub comp_hum_quad_b: f64,
    pub comp_hum_quad_c: f64,
}

impl From<ClimateFit> for ClimateCoefficients {
    fn from(fit: ClimateFit) -> Self {
        ClimateCoefficients {
            temperature: CubicCoefficients {
                a: fit.comp_temp_cub_a,
                b: fit.comp_temp_cub_b,
                c: fit.comp_temp_cub_c,
                d: fit.comp_temp_cub_d,
            },
            humidity: QuadraticCoefficients {
                a: fit.comp_hum_quad_a,
                b: fit.comp_hum_quad_b,
                c: fit.comp_hum_quad_c,
            },
        }
    }
}

/// Fits for boards without a weather cover
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndoorFits {
    #[serde(rename = "true", default)]
    pub with_eco2_tvoc: Option<ClimateFit>,
    #[serde(rename = "false", default)]
    pub without_eco2_tvoc: Option<ClimateFit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoCoverFits {
    pub enable_eco2_tvoc: IndoorFits,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherFits {
    #[serde(rename = "true", default)]
    pub cover: Option<ClimateFit>,
    #[serde(rename = "false", default)]
    pub no_cover: Option<NoCoverFits>,
}

/// Gas drift factors, flat keys per channel and climate quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasFactors {
    pub red_temp_comp_factor: f64,
    pub red_hum_comp_factor: f64,
    pub red_bar_comp_factor: f64,
    pub oxi_temp_comp_factor: f64,
    pub oxi_hum_comp_factor: f64,
    pub oxi_bar_comp_factor: f64,
    pub nh3_temp_comp_factor: f64,
    pub nh3_hum_comp_factor: f64,
    pub nh3_bar_comp_factor: f64,
}

impl From<GasFactors> for GasTriple<GasDriftFactors> {
    fn from(f: GasFactors) -> Self {
        GasTriple {
            reducing: GasDriftFactors {
                temperature: f.red_temp_comp_factor,
                humidity: f.red_hum_comp_factor,
                pressure: f.red_bar_comp_factor,
            },
            oxidising: GasDriftFactors {
                temperature: f.oxi_temp_comp_factor,
                humidity: f.oxi_hum_comp_factor,
                pressure: f.oxi_bar_comp_factor,
            },
            nh3: GasDriftFactors {
                temperature: f.nh3_temp_comp_factor,
                humidity: f.nh3_hum_comp_factor,
                pressure: f.nh3_bar_comp_factor,
            },
        }
    }
}

/// Parsed compensation document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompensationDocument {
    pub weather: WeatherFits,
    #[serde(flatten)]
    pub gas: GasFactors,
}

impl CompensationDocument {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Climate fit for a hardware variant
    pub fn climate_fit(&self, variant: ProfileVariant) -> ConfigResult<ClimateFit> {
        match variant {
            ProfileVariant::WeatherCover => self.weather.cover.ok_or(ConfigError::MissingVariant("weather cover")),
            ProfileVariant::Indoor { eco2_tvoc } => {
                let indoor = self
                    .weather
                    .no_cover
                    .ok_or(ConfigError::MissingVariant("no weather cover"))?
                    .enable_eco2_tvoc;
                if eco2_tvoc {
                    indoor.with_eco2_tvoc.ok_or(ConfigError::MissingVariant("no weather cover with eCO2/TVOC"))
                } else {
                    indoor.without_eco2_tvoc.ok_or(ConfigError::MissingVariant("no weather cover without eCO2/TVOC"))
                }
            }
        }
    }
}

/// Resolve the calibration profile for a station
///
/// `temp_offset` is folded into the cubic constant term only for the
/// no-cover variants; CPU compensation replaces the cubic fit when asked for.
pub fn build_profile(config: &SensorConfig, document: &CompensationDocument) -> ConfigResult<CalibrationProfile> {
    let variant = ProfileVariant::select(config.has_weather_cover, config.enable_eco2_tvoc);
    let fit = document.climate_fit(variant)?;

    let profile = CalibrationProfile::new(variant, fit.into(), document.gas.into(), config.temp_offset);
    log::info!("Selected {:?} compensation profile", variant);

    Ok(match config.temperature_compensation {
        TemperatureCompensation::Polynomial => profile,
        TemperatureCompensation::Cpu => profile.with_cpu_compensation(config.cpu_factor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use enviro_core::TemperatureStrategy;

    const DOC: &str = include_str!("../profiles/compensation/enviro-plus.json");

    #[test]
    fn variant_selection() {
        let doc = CompensationDocument::from_json(DOC).unwrap();

        let mut config = SensorConfig { has_weather_cover: true, temp_offset: 2.0, ..Default::default() };
        let cover = build_profile(&config, &doc).unwrap();
        assert_eq!(cover.variant(), ProfileVariant::WeatherCover);
        // Cover fits already account for the enclosure
        assert_eq!(cover.cubic().d, -14.82131);

        config.has_weather_cover = false;
        let indoor = build_profile(&config, &doc).unwrap();
        assert_eq!(indoor.variant(), ProfileVariant::Indoor { eco2_tvoc: false });
        assert!((indoor.cubic().d - (-6.78291 + 2.0)).abs() < 1e-12);

        config.enable_eco2_tvoc = true;
        let eco2 = build_profile(&config, &doc).unwrap();
        assert_eq!(eco2.variant(), ProfileVariant::Indoor { eco2_tvoc: true });
    }

    #[test]
    fn gas_factors_map_per_channel() {
        let doc = CompensationDocument::from_json(DOC).unwrap();
        let gas: GasTriple<GasDriftFactors> = doc.gas.into();
        assert_eq!(gas.reducing.temperature, -0.015);
        assert_eq!(gas.oxidising.pressure, -0.0072);
        assert_eq!(gas.nh3.humidity, 0.0175);
    }

    #[test]
    fn missing_variant_reported() {
        let mut doc = CompensationDocument::from_json(DOC).unwrap();
        doc.weather.cover = None;
        let config = SensorConfig { has_weather_cover: true, ..Default::default() };
        assert!(matches!(build_profile(&config, &doc), Err(ConfigError::MissingVariant("weather cover"))));
    }

    #[test]
    fn cpu_strategy() {
        let doc = CompensationDocument::from_json(DOC).unwrap();
        let config = SensorConfig {
            temperature_compensation: TemperatureCompensation::Cpu,
            cpu_factor: 1.8,
            ..Default::default()
        };
        let profile = build_profile(&config, &doc).unwrap();
        assert_eq!(*profile.temperature(), TemperatureStrategy::CpuProximity { factor: 1.8 });
    }
}
