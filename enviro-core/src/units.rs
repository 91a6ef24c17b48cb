//! Units Registry
//!
//! Every tracked quantity is a member of the closed [`Variable`] set, and each
//! variable carries exactly one unit for the whole process lifetime. The
//! table is `const`, so there is nothing to load or mutate at runtime and a
//! match over `Variable` is checked for coverage by the compiler.
//!
//! Adapters that only have a string (JSON keys, MQTT topics) go through
//! [`Variable::from_name`], which is the single place an
//! [`EnviroError::UnknownVariable`] can originate.
//!
//! ```rust
//! use enviro_core::units::Variable;
//!
//! let v = Variable::from_name("pm2.5").unwrap();
//! assert_eq!(v.unit(), "ug/m3");
//! assert!(Variable::from_name("radon").is_err());
//! ```

use core::fmt;
use core::str::FromStr;

use crate::errors::{EnviroError, EnviroResult};

/// Sentinel unit for a variable that has never been written
pub const UNKNOWN_UNIT: &str = "unknown";

/// Sentinel name for a variable that has never been written
pub const NO_DATA_NAME: &str = "no data available";

/// Tracked environmental variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Variable {
    Light,
    Temperature,
    Pressure,
    Humidity,
    Oxidising,
    Reducing,
    Nh3,
    Pm1,
    #[cfg_attr(feature = "serde", serde(rename = "pm2.5"))]
    Pm25,
    Pm10,
    Noise,
    Co2,
    Voc,
}

impl Variable {
    /// Number of registered variables
    pub const COUNT: usize = 13;

    /// Every variable in enumeration order
    pub const ALL: [Variable; Self::COUNT] = [
        Variable::Light,
        Variable::Temperature,
        Variable::Pressure,
        Variable::Humidity,
        Variable::Oxidising,
        Variable::Reducing,
        Variable::Nh3,
        Variable::Pm1,
        Variable::Pm25,
        Variable::Pm10,
        Variable::Noise,
        Variable::Co2,
        Variable::Voc,
    ];

    /// Gas-derived variables, unusable for air quality until the gas sensor is calibrated
    pub const GAS: [Variable; 3] = [Variable::Oxidising, Variable::Reducing, Variable::Nh3];

    /// Registry name
    pub const fn name(self) -> &'static str {
        match self {
            Variable::Light => "light",
            Variable::Temperature => "temperature",
            Variable::Pressure => "pressure",
            Variable::Humidity => "humidity",
            Variable::Oxidising => "oxidising",
            Variable::Reducing => "reducing",
            Variable::Nh3 => "nh3",
            Variable::Pm1 => "pm1",
            Variable::Pm25 => "pm2.5",
            Variable::Pm10 => "pm10",
            Variable::Noise => "noise",
            Variable::Co2 => "co2",
            Variable::Voc => "voc",
        }
    }

    /// Registered unit
    pub const fn unit(self) -> &'static str {
        match self {
            Variable::Light => "Lux",
            Variable::Temperature => "C",
            Variable::Pressure => "hPa",
            Variable::Humidity => "%",
            Variable::Oxidising | Variable::Reducing | Variable::Nh3 => "ppm",
            Variable::Pm1 | Variable::Pm25 | Variable::Pm10 => "ug/m3",
            Variable::Noise => "dBA",
            Variable::Co2 => "ppm",
            Variable::Voc => "ppb",
        }
    }

    /// Human-facing label used by display and logging adapters
    pub const fn label(self) -> &'static str {
        match self {
            Variable::Light => "Light",
            Variable::Temperature => "Temperature",
            Variable::Pressure => "Pressure",
            Variable::Humidity => "Humidity",
            Variable::Oxidising => "Oxidising",
            Variable::Reducing => "Reducing",
            Variable::Nh3 => "NH3",
            Variable::Pm1 => "PM1",
            Variable::Pm25 => "PM2.5",
            Variable::Pm10 => "PM10",
            Variable::Noise => "Noise",
            Variable::Co2 => "eCO2",
            Variable::Voc => "TVOC",
        }
    }

    /// Position in [`Variable::ALL`]; used to index fixed-shape storage
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this variable comes from the metal-oxide gas sensor
    pub const fn is_gas(self) -> bool {
        matches!(self, Variable::Oxidising | Variable::Reducing | Variable::Nh3)
    }

    /// Look up a variable by registry name.
    ///
    /// Also accepts the short names used by the older station firmware
    /// (`temp`, `press`, `oxi`, `redu`, `pm25`, ...).
    pub fn from_name(name: &str) -> EnviroResult<Self> {
        let variable = match name {
            "light" | "lux" => Variable::Light,
            "temperature" | "temp" => Variable::Temperature,
            "pressure" | "press" => Variable::Pressure,
            "humidity" | "hum" => Variable::Humidity,
            "oxidising" | "oxi" => Variable::Oxidising,
            "reducing" | "redu" | "redux" => Variable::Reducing,
            "nh3" => Variable::Nh3,
            "pm1" => Variable::Pm1,
            "pm2.5" | "pm25" => Variable::Pm25,
            "pm10" => Variable::Pm10,
            "noise" => Variable::Noise,
            "co2" => Variable::Co2,
            "voc" => Variable::Voc,
            _ => return Err(EnviroError::UnknownVariable),
        };
        Ok(variable)
    }
}

impl FromStr for Variable {
    type Err = EnviroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quantities the compensation engine derives but the store does not track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Derived {
    DewPoint,
    AbsoluteHumidity,
    MixingRatio,
}

impl Derived {
    pub const fn name(self) -> &'static str {
        match self {
            Derived::DewPoint => "dew point",
            Derived::AbsoluteHumidity => "absolute humidity",
            Derived::MixingRatio => "mixing ratio",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Derived::DewPoint => "C",
            Derived::AbsoluteHumidity => "g/m3",
            Derived::MixingRatio => "g/kg",
        }
    }
}

/// Display scale for temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemperatureScale {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "C"))]
    Celsius,
    #[cfg_attr(feature = "serde", serde(rename = "F"))]
    Fahrenheit,
}

impl TemperatureScale {
    /// Convert a Celsius value into this scale
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "C",
            TemperatureScale::Fahrenheit => "F",
        }
    }
}
