//! Fixed-step motion between two pulse widths.
//!
//! A [`SweepState`] is an iterator over the pulse widths *after* its start value. Every
//! item is one step closer to the target; the last item is the target itself. When the
//! distance is not a multiple of the step the final step is shortened, so the sweep
//! never overshoots.
//!
//! Going down compares the remaining distance with the step before subtracting, so the
//! pulse never wraps below the target even when the target is 0.

use core::iter::FusedIterator;

use crate::{Error, Result};

/// Which way a sweep moves the pulse width.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepDirection {
    /// Increasing pulse width.
    Up,
    /// Decreasing pulse width.
    Down,
}

/// Position and direction of a sweep in progress.
///
/// # Example
///
/// ```
/// use servo_pulse::sweep::SweepState;
///
/// let up = SweepState::up(500, 2_400, 5).unwrap();
/// assert_eq!(up.len(), 380);
/// assert_eq!(up.last(), Some(2_400));
///
/// let down: Vec<u16> = SweepState::down(12, 0, 5).unwrap().collect();
/// assert_eq!(down, [7, 2, 0]);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepState {
    direction: SweepDirection,
    pulse_us: u16,
    target_us: u16,
    step_us: u16,
}

impl SweepState {
    /// Sweep upward from `from_us` to `to_us`.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroStep`] for a zero step, [`Error::SweepDirection`] if `to_us < from_us`.
    pub const fn up(from_us: u16, to_us: u16, step_us: u16) -> Result<Self> {
        if from_us > to_us {
            return Err(Error::SweepDirection { from_us, to_us });
        }
        Self::new(SweepDirection::Up, from_us, to_us, step_us)
    }

    /// Sweep downward from `from_us` to `to_us`, inclusive of `to_us`.
    ///
    /// # Errors
    ///
    /// [`Error::ZeroStep`] for a zero step, [`Error::SweepDirection`] if `to_us > from_us`.
    pub const fn down(from_us: u16, to_us: u16, step_us: u16) -> Result<Self> {
        if from_us < to_us {
            return Err(Error::SweepDirection { from_us, to_us });
        }
        Self::new(SweepDirection::Down, from_us, to_us, step_us)
    }

    const fn new(
        direction: SweepDirection,
        from_us: u16,
        to_us: u16,
        step_us: u16,
    ) -> Result<Self> {
        if step_us == 0 {
            return Err(Error::ZeroStep);
        }
        Ok(Self {
            direction,
            pulse_us: from_us,
            target_us: to_us,
            step_us,
        })
    }

    /// Direction of travel.
    #[must_use]
    pub const fn direction(&self) -> SweepDirection {
        self.direction
    }

    /// Most recent pulse width (the start value before the first step).
    #[must_use]
    pub const fn pulse_us(&self) -> u16 {
        self.pulse_us
    }

    /// Pulse width the sweep ends on.
    #[must_use]
    pub const fn target_us(&self) -> u16 {
        self.target_us
    }

    /// Whether the target has been reached.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.pulse_us == self.target_us
    }

    /// Steps left until the target, counting a shortened final step as one.
    #[must_use]
    pub const fn remaining_steps(&self) -> usize {
        let distance = self.distance() as usize;
        let step = self.step_us as usize;
        distance.div_ceil(step)
    }

    const fn distance(&self) -> u16 {
        match self.direction {
            SweepDirection::Up => self.target_us - self.pulse_us,
            SweepDirection::Down => self.pulse_us - self.target_us,
        }
    }
}

impl Iterator for SweepState {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.is_done() {
            return None;
        }
        let stride = self.distance().min(self.step_us);
        self.pulse_us = match self.direction {
            SweepDirection::Up => self.pulse_us + stride,
            SweepDirection::Down => self.pulse_us - stride,
        };
        Some(self.pulse_us)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_steps();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SweepState {}

impl FusedIterator for SweepState {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_up_ends_exactly_on_target() {
        let pulses: Vec<u16> = SweepState::up(500, 2_400, 5).unwrap().collect();
        assert_eq!(pulses.len(), 380);
        assert_eq!(pulses.first(), Some(&505));
        assert_eq!(pulses.last(), Some(&2_400));
        assert!(
            pulses
                .windows(2)
                .all(|pair| matches!(pair, &[low, high] if high == low + 5))
        );
        assert_eq!(500 + 5 * 380, 2_400);
    }

    #[test]
    fn sweep_down_ends_exactly_on_target() {
        let pulses: Vec<u16> = SweepState::down(2_400, 500, 5).unwrap().collect();
        assert_eq!(pulses.len(), 380);
        assert_eq!(pulses.first(), Some(&2_395));
        assert_eq!(pulses.last(), Some(&500));
        assert!(pulses.iter().all(|&pulse| pulse >= 500));
    }

    #[test]
    fn sweep_down_to_zero_does_not_underflow() {
        let mut sweep = SweepState::down(13, 0, 5).unwrap();
        assert_eq!(sweep.len(), 3);
        assert_eq!(sweep.next(), Some(8));
        assert_eq!(sweep.next(), Some(3));
        assert_eq!(sweep.next(), Some(0));
        assert_eq!(sweep.next(), None);
        assert_eq!(sweep.next(), None);
        assert!(sweep.is_done());
    }

    #[test]
    fn uneven_span_shortens_final_step() {
        let pulses: Vec<u16> = SweepState::up(500, 512, 5).unwrap().collect();
        assert_eq!(pulses, [505, 510, 512]);
    }

    #[test]
    fn step_larger_than_span_jumps_to_target() {
        let pulses: Vec<u16> = SweepState::up(u16::MAX - 3, u16::MAX, 100).unwrap().collect();
        assert_eq!(pulses, [u16::MAX]);
    }

    #[test]
    fn empty_sweep_yields_nothing() {
        let sweep = SweepState::up(1_470, 1_470, 5).unwrap();
        assert!(sweep.is_done());
        assert_eq!(sweep.count(), 0);
    }

    #[test]
    fn rejects_zero_step_and_wrong_direction() {
        assert_eq!(SweepState::up(500, 2_400, 0), Err(Error::ZeroStep));
        assert_eq!(
            SweepState::up(2_400, 500, 5),
            Err(Error::SweepDirection {
                from_us: 2_400,
                to_us: 500
            })
        );
        assert_eq!(
            SweepState::down(500, 2_400, 5),
            Err(Error::SweepDirection {
                from_us: 500,
                to_us: 2_400
            })
        );
    }

    #[test]
    fn len_tracks_progress() {
        let mut sweep = SweepState::down(2_400, 500, 5).unwrap();
        assert_eq!(sweep.direction(), SweepDirection::Down);
        sweep.nth(99);
        assert_eq!(sweep.pulse_us(), 1_900);
        assert_eq!(sweep.len(), 280);
        assert_eq!(sweep.target_us(), 500);
    }
}
