//! Air-Quality Aggregation
//!
//! ## Levels
//!
//! Each tracked factor has an ascending list of severity thresholds. A
//! factor's level is the number of thresholds its current value strictly
//! exceeds:
//!
//! ```text
//! pm2.5 thresholds: [11, 35, 53, 70]
//!
//!   value  9.0 -> level 0     (at or below the first)
//!   value 11.0 -> level 0     (equal is not exceeding)
//!   value 40.0 -> level 2
//!   value 90.0 -> level 4
//! ```
//!
//! The overall level is the worst factor. On a tie the factor earliest in
//! [`Variable`] order is reported, so the answer is deterministic. A level
//! of 0 is reported against no particular factor ("all").
//!
//! ## Gas Gating
//!
//! Until the gas sensor has a sampled baseline its ppm values are relative
//! to an arbitrary first reading and cannot be compared with ppm
//! thresholds. The aggregator is told whether gas is calibrated and drops
//! the gas factors when it is not.

use core::fmt;

use heapless::Vec as BoundedVec;

use crate::constants::air_quality::{
    MAX_THRESHOLDS, NH3_THRESHOLDS, OXIDISING_THRESHOLDS, PM10_THRESHOLDS, PM1_THRESHOLDS, PM25_THRESHOLDS,
    REDUCING_THRESHOLDS,
};
use crate::errors::{EnviroError, EnviroResult};
use crate::store::Snapshot;
use crate::units::Variable;

/// Ascending severity thresholds for one factor
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    values: BoundedVec<f64, MAX_THRESHOLDS>,
}

impl Thresholds {
    /// Validate and copy a threshold list
    pub fn new(values: &[f64]) -> EnviroResult<Self> {
        if values.is_empty() {
            return Err(EnviroError::InvalidThresholds { reason: "threshold list is empty" });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EnviroError::InvalidThresholds { reason: "thresholds must be finite" });
        }
        if values.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(EnviroError::InvalidThresholds { reason: "thresholds must be strictly ascending" });
        }
        let values = BoundedVec::from_slice(values)
            .map_err(|_| EnviroError::InvalidThresholds { reason: "too many thresholds" })?;
        Ok(Self { values })
    }

    /// Number of thresholds `value` strictly exceeds
    pub fn level(&self, value: f64) -> u8 {
        self.values.iter().take_while(|t| value > **t).count() as u8
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Threshold lists per tracked factor
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityThresholds {
    factors: [Option<Thresholds>; Variable::COUNT],
}

impl AirQualityThresholds {
    /// No tracked factors
    pub fn empty() -> Self {
        const NONE: Option<Thresholds> = None;
        Self { factors: [NONE; Variable::COUNT] }
    }

    /// Track `variable` against `thresholds`, replacing any previous list
    pub fn with(mut self, variable: Variable, thresholds: Thresholds) -> Self {
        self.set(variable, thresholds);
        self
    }

    pub fn set(&mut self, variable: Variable, thresholds: Thresholds) {
        self.factors[variable.index()] = Some(thresholds);
    }

    pub fn get(&self, variable: Variable) -> Option<&Thresholds> {
        self.factors[variable.index()].as_ref()
    }

    /// Tracked factors in [`Variable`] order
    pub fn tracked(&self) -> impl Iterator<Item = (Variable, &Thresholds)> + '_ {
        Variable::ALL
            .iter()
            .filter_map(move |v| self.factors[v.index()].as_ref().map(|t| (*v, t)))
    }
}

impl Default for AirQualityThresholds {
    fn default() -> Self {
        let defaults: [(Variable, &[f64]); 6] = [
            (Variable::Pm1, &PM1_THRESHOLDS),
            (Variable::Pm25, &PM25_THRESHOLDS),
            (Variable::Pm10, &PM10_THRESHOLDS),
            (Variable::Oxidising, &OXIDISING_THRESHOLDS),
            (Variable::Reducing, &REDUCING_THRESHOLDS),
            (Variable::Nh3, &NH3_THRESHOLDS),
        ];
        let mut thresholds = Self::empty();
        for (variable, values) in defaults {
            // Built-in lists are ascending and short
            if let Ok(t) = Thresholds::new(values) {
                thresholds.set(variable, t);
            }
        }
        thresholds
    }
}

/// Worst factor and its severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AirQualityLevel {
    /// `None` when every factor is at level 0
    pub factor: Option<Variable>,
    pub level: u8,
}

impl AirQualityLevel {
    pub const GOOD: AirQualityLevel = AirQualityLevel { factor: None, level: 0 };

    /// Factor name for display, "all" at level 0
    pub fn factor_name(&self) -> &'static str {
        self.factor.map_or("all", Variable::name)
    }
}

impl fmt::Display for AirQualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} level {}", self.factor_name(), self.level)
    }
}

/// Maps current measurements to one overall severity
#[derive(Debug, Clone, Default)]
pub struct AirQualityAggregator {
    thresholds: AirQualityThresholds,
}

impl AirQualityAggregator {
    pub fn new(thresholds: AirQualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AirQualityThresholds {
        &self.thresholds
    }

    /// Level of one factor, `None` if untracked
    pub fn factor_level(&self, variable: Variable, value: f64) -> Option<u8> {
        self.thresholds.get(variable).map(|t| t.level(value))
    }

    /// Overall level from a snapshot of current values
    ///
    /// Variables that have never been written are skipped. Gas factors are
    /// skipped unless `gas_calibrated`.
    pub fn evaluate(&self, snapshot: &Snapshot, gas_calibrated: bool) -> AirQualityLevel {
        let mut worst = AirQualityLevel::GOOD;

        for (variable, thresholds) in self.thresholds.tracked() {
            if variable.is_gas() && !gas_calibrated {
                continue;
            }
            let current = snapshot.get(variable);
            if current.is_sentinel() {
                continue;
            }
            let level = thresholds.level(current.value());
            // Strictly greater keeps the earliest factor on ties
            if level > worst.level {
                worst = AirQualityLevel { factor: Some(variable), level };
            }
        }

        worst
    }
}
