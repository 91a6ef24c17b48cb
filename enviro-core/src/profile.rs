//! Calibration Profile
//!
//! ## Overview
//!
//! A [`CalibrationProfile`] is the read-only coefficient set the
//! compensation engine runs with for the life of the process. It is built
//! once at start-up from configuration and handed to the engine; nothing in
//! the core reads configuration on its own.
//!
//! ## Variants
//!
//! Station hardware changes how much self-heating reaches the temperature
//! sensor, so coefficients are fitted per hardware variant:
//!
//! ```text
//!                    has weather cover?
//!                   /                  \
//!                 yes                   no
//!                  |                     |
//!           WeatherCover         has eCO2/TVOC sensor?
//!                               /                     \
//!                            yes                       no
//!                             |                         |
//!               Indoor { eco2_tvoc: true }   Indoor { eco2_tvoc: false }
//! ```
//!
//! The indoor variants also fold the user's `temp_offset` into the cubic
//! constant term. The weather-cover fit already absorbs enclosure effects,
//! so it does not.
//!
//! ## Temperature Strategy
//!
//! Two corrections exist and never run together. Which one applies is
//! decided here, once, and stored as a [`TemperatureStrategy`]:
//!
//! ```rust
//! use enviro_core::profile::{CalibrationProfile, TemperatureStrategy};
//!
//! let profile = CalibrationProfile::uncorrected().with_cpu_compensation(2.25);
//! assert!(matches!(profile.temperature(), TemperatureStrategy::CpuProximity { .. }));
//! ```

use crate::compensation::{adjust_humidity, adjust_temperature};
use crate::errors::EnviroResult;
use crate::units::Variable;

/// `a t^3 + b t^2 + c t + d`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl CubicCoefficients {
    /// Passes the input through unchanged
    pub const IDENTITY: CubicCoefficients = CubicCoefficients { a: 0.0, b: 0.0, c: 1.0, d: 0.0 };

    pub fn evaluate(&self, t: f64) -> f64 {
        ((self.a * t + self.b) * t + self.c) * t + self.d
    }

    /// Same curve shifted by `offset`
    pub fn shifted(self, offset: f64) -> Self {
        Self { d: self.d + offset, ..self }
    }
}

/// `a h^2 + b h + c`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadraticCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuadraticCoefficients {
    pub const IDENTITY: QuadraticCoefficients = QuadraticCoefficients { a: 0.0, b: 1.0, c: 0.0 };

    pub fn evaluate(&self, h: f64) -> f64 {
        (self.a * h + self.b) * h + self.c
    }
}

/// Fractional resistance change per unit of climate change for one gas channel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasDriftFactors {
    /// Per degree Celsius
    pub temperature: f64,
    /// Per percent relative humidity
    pub humidity: f64,
    /// Per hPa
    pub pressure: f64,
}

/// One value per metal-oxide gas channel
///
/// The three channels are always updated together; holding them in one
/// value makes a half-updated baseline unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasTriple<T> {
    pub reducing: T,
    pub oxidising: T,
    pub nh3: T,
}

impl<T: Copy> GasTriple<T> {
    /// Same value for every channel
    pub const fn splat(value: T) -> Self {
        Self { reducing: value, oxidising: value, nh3: value }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> GasTriple<U> {
        GasTriple {
            reducing: f(self.reducing),
            oxidising: f(self.oxidising),
            nh3: f(self.nh3),
        }
    }

    /// Channel value for a gas variable, `None` for anything else
    pub fn get(&self, variable: Variable) -> Option<T> {
        match variable {
            Variable::Reducing => Some(self.reducing),
            Variable::Oxidising => Some(self.oxidising),
            Variable::Nh3 => Some(self.nh3),
            _ => None,
        }
    }

    /// Channels paired with their store variable, in [`Variable::GAS`] order
    pub fn entries(&self) -> [(Variable, T); 3] {
        [
            (Variable::Oxidising, self.oxidising),
            (Variable::Reducing, self.reducing),
            (Variable::Nh3, self.nh3),
        ]
    }
}

/// How raw board temperature is corrected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperatureStrategy {
    /// Subtract the CPU's pull: `raw - (cpu - raw) / factor`
    CpuProximity { factor: f64 },
    /// Fitted cubic in the raw temperature
    Cubic(CubicCoefficients),
}

/// Hardware variant a coefficient set was fitted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileVariant {
    WeatherCover,
    Indoor { eco2_tvoc: bool },
}

impl ProfileVariant {
    /// Pick the variant for a station's hardware
    pub const fn select(has_weather_cover: bool, has_eco2_tvoc: bool) -> Self {
        if has_weather_cover {
            ProfileVariant::WeatherCover
        } else {
            ProfileVariant::Indoor { eco2_tvoc: has_eco2_tvoc }
        }
    }

    /// Whether the user's `temp_offset` is folded into the cubic fit
    pub const fn applies_temp_offset(self) -> bool {
        matches!(self, ProfileVariant::Indoor { .. })
    }
}

/// Temperature and humidity fit for one variant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClimateCoefficients {
    pub temperature: CubicCoefficients,
    pub humidity: QuadraticCoefficients,
}

/// Read-only coefficient set for the compensation engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationProfile {
    variant: ProfileVariant,
    temp_offset: f64,
    cubic: CubicCoefficients,
    temperature: TemperatureStrategy,
    humidity: QuadraticCoefficients,
    gas: GasTriple<GasDriftFactors>,
}

impl CalibrationProfile {
    /// Build a polynomial-corrected profile for a variant
    pub fn new(
        variant: ProfileVariant,
        climate: ClimateCoefficients,
        gas: GasTriple<GasDriftFactors>,
        temp_offset: f64,
    ) -> Self {
        let cubic = if variant.applies_temp_offset() {
            climate.temperature.shifted(temp_offset)
        } else {
            climate.temperature
        };

        Self {
            variant,
            temp_offset,
            cubic,
            temperature: TemperatureStrategy::Cubic(cubic),
            humidity: climate.humidity,
            gas,
        }
    }

    /// Identity corrections and no gas drift
    pub fn uncorrected() -> Self {
        Self::new(
            ProfileVariant::WeatherCover,
            ClimateCoefficients {
                temperature: CubicCoefficients::IDENTITY,
                humidity: QuadraticCoefficients::IDENTITY,
            },
            GasTriple::default(),
            0.0,
        )
    }

    /// Switch temperature correction to the CPU-proximity strategy
    pub fn with_cpu_compensation(mut self, factor: f64) -> Self {
        self.temperature = TemperatureStrategy::CpuProximity { factor };
        self
    }

    pub fn variant(&self) -> ProfileVariant {
        self.variant
    }

    pub fn temp_offset(&self) -> f64 {
        self.temp_offset
    }

    /// Cubic fit, with `temp_offset` already applied where the variant calls for it
    pub fn cubic(&self) -> &CubicCoefficients {
        &self.cubic
    }

    pub fn temperature(&self) -> &TemperatureStrategy {
        &self.temperature
    }

    pub fn humidity(&self) -> &QuadraticCoefficients {
        &self.humidity
    }

    pub fn gas(&self) -> &GasTriple<GasDriftFactors> {
        &self.gas
    }

    /// [`adjust_temperature`] with this profile's strategy
    pub fn adjust_temperature(&self, raw_temp: f64, cpu_temp: Option<f64>) -> EnviroResult<f64> {
        adjust_temperature(raw_temp, cpu_temp, &self.temperature)
    }

    /// [`adjust_humidity`] with this profile's coefficients
    pub fn adjust_humidity(&self, raw_humidity: f64) -> f64 {
        adjust_humidity(raw_humidity, &self.humidity)
    }
}
