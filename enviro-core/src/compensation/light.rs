use crate::constants::physics::{COVERED_LUX, PROXIMITY_COVERED_THRESHOLD};

/// Ambient light, or a fixed 1 lux while something covers the sensor
///
/// The light and proximity sensors share a window; a hand or lid over it
/// produces a misleadingly dark reading.
pub fn proximity_gated_lux(lux: f64, proximity: u16) -> f64 {
    if proximity < PROXIMITY_COVERED_THRESHOLD {
        lux
    } else {
        COVERED_LUX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_at_threshold() {
        assert_eq!(proximity_gated_lux(320.0, 0), 320.0);
        assert_eq!(proximity_gated_lux(320.0, 499), 320.0);
        assert_eq!(proximity_gated_lux(320.0, 500), 1.0);
    }
}
