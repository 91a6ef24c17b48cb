//! Measurement value type
//!
//! A `Measurement` is the unit of exchange between the engine and its
//! adapters: one value, when it was taken, and how to label it. It is `Copy`
//! and holds only `&'static str` labels from the units registry, so pushing
//! one into history never allocates beyond the history slot itself.
//!
//! Measurements are never mutated. A new reading is a new `Measurement`.

use core::fmt;

use crate::time::Timestamp;
use crate::units::{Derived, Variable, NO_DATA_NAME, UNKNOWN_UNIT};

/// Calibrated, labelled, time-stamped value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Measurement {
    value: f64,
    timestamp: Timestamp,
    unit: &'static str,
    name: &'static str,
}

impl Measurement {
    /// Placeholder for a variable that has never been written
    pub const SENTINEL: Measurement = Measurement {
        value: 0.0,
        timestamp: 0,
        unit: UNKNOWN_UNIT,
        name: NO_DATA_NAME,
    };

    /// Build a measurement labelled from the units registry
    pub const fn new(variable: Variable, value: f64, timestamp: Timestamp) -> Self {
        Self {
            value,
            timestamp,
            unit: variable.unit(),
            name: variable.name(),
        }
    }

    /// Build a measurement for a derived quantity
    pub const fn derived(quantity: Derived, value: f64, timestamp: Timestamp) -> Self {
        Self {
            value,
            timestamp,
            unit: quantity.unit(),
            name: quantity.name(),
        }
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub const fn unit(&self) -> &'static str {
        self.unit
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// True for the "no data available" placeholder
    pub fn is_sentinel(&self) -> bool {
        self.name == NO_DATA_NAME && self.unit == UNKNOWN_UNIT
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            return f.write_str(self.name);
        }
        write!(f, "{}: {:.2} {}", self.name, self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_come_from_registry() {
        let m = Measurement::new(Variable::Pressure, 1009.4, 42);
        assert_eq!(m.unit(), "hPa");
        assert_eq!(m.name(), "pressure");
        assert_eq!(m.timestamp(), 42);
        assert!(!m.is_sentinel());
    }

    #[test]
    fn sentinel_shape() {
        let s = Measurement::SENTINEL;
        assert_eq!(s.value(), 0.0);
        assert_eq!(s.unit(), "unknown");
        assert_eq!(s.name(), "no data available");
        assert!(s.is_sentinel());
    }

    #[test]
    fn display_formats_value_and_unit() {
        let m = Measurement::derived(Derived::DewPoint, 9.2612, 0);
        assert_eq!(m.to_string(), "dew point: 9.26 C");
        assert_eq!(Measurement::SENTINEL.to_string(), "no data available");
    }
}
