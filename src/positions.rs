//! Calibrated pulse widths for named servo angles.

use crate::{Error, Result};

/// The three angles the demonstration holds.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    /// 0°, one travel limit.
    Deg0,
    /// 90°, center.
    Deg90,
    /// 180°, the other travel limit.
    Deg180,
}

impl Position {
    /// The angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
        }
    }
}

/// Pulse widths (µs) that put the servo horn at 0°, 90° and 180°.
///
/// Servos are rarely symmetric, so the center is calibrated on its own rather than
/// derived from the limits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoPositionTable {
    deg_0_us: u16,
    deg_90_us: u16,
    deg_180_us: u16,
}

impl ServoPositionTable {
    /// SG90 calibration: 500 µs, 1470 µs, 2400 µs (2.5 %, 7.35 %, 12 % of 20 ms).
    pub const SG90: Self = Self {
        deg_0_us: 500,
        deg_90_us: 1_470,
        deg_180_us: 2_400,
    };

    /// Build a table from measured pulse widths.
    ///
    /// # Errors
    ///
    /// [`Error::PositionsNotIncreasing`] unless `deg_0_us < deg_90_us < deg_180_us`.
    pub const fn new(deg_0_us: u16, deg_90_us: u16, deg_180_us: u16) -> Result<Self> {
        if deg_0_us >= deg_90_us || deg_90_us >= deg_180_us {
            return Err(Error::PositionsNotIncreasing);
        }
        Ok(Self {
            deg_0_us,
            deg_90_us,
            deg_180_us,
        })
    }

    /// Pulse width for a named position.
    #[must_use]
    pub const fn pulse_for(&self, position: Position) -> u16 {
        match position {
            Position::Deg0 => self.deg_0_us,
            Position::Deg90 => self.deg_90_us,
            Position::Deg180 => self.deg_180_us,
        }
    }

    /// Shortest pulse in the table (0°).
    #[must_use]
    pub const fn min_us(&self) -> u16 {
        self.deg_0_us
    }

    /// Longest pulse in the table (180°).
    #[must_use]
    pub const fn max_us(&self) -> u16 {
        self.deg_180_us
    }

    /// Pulse width for any angle, interpolated linearly between the neighbouring
    /// calibration points.
    ///
    /// # Errors
    ///
    /// [`Error::DegreesOutOfRange`] above 180°.
    pub const fn degrees_to_pulse_us(&self, degrees: u16) -> Result<u16> {
        let (low_us, high_us, offset) = match degrees {
            0..=90 => (self.deg_0_us, self.deg_90_us, degrees),
            91..=180 => (self.deg_90_us, self.deg_180_us, degrees - 90),
            _ => return Err(Error::DegreesOutOfRange { degrees }),
        };
        let span = (high_us - low_us) as u32;
        Ok(low_us + (span * offset as u32 / 90) as u16)
    }
}

impl Default for ServoPositionTable {
    fn default() -> Self {
        Self::SG90
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sg90_named_positions() {
        let table = ServoPositionTable::SG90;
        assert_eq!(table.pulse_for(Position::Deg0), 500);
        assert_eq!(table.pulse_for(Position::Deg90), 1_470);
        assert_eq!(table.pulse_for(Position::Deg180), 2_400);
        assert_eq!(table.min_us(), 500);
        assert_eq!(table.max_us(), 2_400);
    }

    #[test]
    fn new_requires_increasing_pulses() {
        assert_eq!(
            ServoPositionTable::new(500, 1_470, 2_400),
            Ok(ServoPositionTable::SG90)
        );
        assert_eq!(
            ServoPositionTable::new(1_470, 1_470, 2_400),
            Err(Error::PositionsNotIncreasing)
        );
        assert_eq!(
            ServoPositionTable::new(2_400, 1_470, 500),
            Err(Error::PositionsNotIncreasing)
        );
    }

    #[test]
    fn degrees_hit_calibration_points() {
        let table = ServoPositionTable::SG90;
        for position in [Position::Deg0, Position::Deg90, Position::Deg180] {
            assert_eq!(
                table.degrees_to_pulse_us(position.degrees()),
                Ok(table.pulse_for(position))
            );
        }
    }

    #[test]
    fn degrees_interpolate_per_half() {
        let table = ServoPositionTable::SG90;
        assert_eq!(table.degrees_to_pulse_us(45), Ok(985));
        assert_eq!(table.degrees_to_pulse_us(135), Ok(1_935));
        assert_eq!(
            table.degrees_to_pulse_us(181),
            Err(Error::DegreesOutOfRange { degrees: 181 })
        );
    }

    #[test]
    fn degrees_are_monotonic() {
        let table = ServoPositionTable::SG90;
        let mut previous = 0;
        for degrees in 0..=180 {
            let pulse_us = table.degrees_to_pulse_us(degrees).unwrap();
            assert!(pulse_us >= previous);
            previous = pulse_us;
        }
    }
}
