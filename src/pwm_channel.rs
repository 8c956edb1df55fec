//! A PWM output with a fixed period and a pulse width set in microseconds.
//!
//! [`PwmChannel`] owns one side (A or B) of a PWM slice through the [`PwmSlice`] backend
//! trait. On the Pico the backend is [`RpSlice`](crate::rp_pwm::RpSlice); host tests use
//! [`SimSlice`](crate::sim::SimSlice).

use crate::pwm_timing::PwmTiming;
use crate::Result;

/// Which compare output of a slice drives the pin.
///
/// On the RP2040 even GPIOs sit on side A and odd GPIOs on side B.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmSide {
    /// Compare register A (even pins).
    A,
    /// Compare register B (odd pins).
    B,
}

/// Hardware counter/compare unit that a [`PwmChannel`] programs.
///
/// Implementations write registers and nothing else; range checks and idempotence live
/// in [`PwmChannel`].
pub trait PwmSlice {
    /// Program the clock divider and wrap, edge-aligned counting.
    fn configure(&mut self, timing: &PwmTiming);

    /// Program the compare level of one side. Takes effect at the next period boundary.
    fn set_compare(&mut self, side: PwmSide, level: u16);

    /// Start or stop the counter.
    fn set_enabled(&mut self, enabled: bool);
}

/// One PWM output: a slice side with fixed timing and a live pulse width.
///
/// # Example
///
/// ```
/// use servo_pulse::pwm_channel::{PwmChannel, PwmSide};
/// use servo_pulse::pwm_timing::PwmTiming;
/// use servo_pulse::sim::SimSlice;
///
/// let mut servo = PwmChannel::new(SimSlice::new(), PwmSide::A, PwmTiming::SERVO_50HZ);
/// servo.set_pulse_us(1_470).unwrap();
/// assert_eq!(servo.pulse_us(), 1_470);
/// assert_eq!(servo.duty_basis_points(), 735);
/// assert!(servo.set_pulse_us(20_000).is_err());
/// ```
pub struct PwmChannel<S> {
    slice: S,
    side: PwmSide,
    timing: PwmTiming,
    pulse_us: u16,
    enabled: bool,
}

impl<S: PwmSlice> PwmChannel<S> {
    /// Bind `side` of `slice` to `timing`, start with a zero-width pulse and enable it.
    ///
    /// The timing is fixed for the life of the channel.
    pub fn new(mut slice: S, side: PwmSide, timing: PwmTiming) -> Self {
        slice.configure(&timing);
        slice.set_compare(side, 0);
        slice.set_enabled(true);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "pwm side={} clk={}Hz div={}/16 top={} period={}µs",
            side,
            timing.clk_sys_hz(),
            timing.divider().to_bits(),
            timing.wrap(),
            timing.period_us()
        );

        Self {
            slice,
            side,
            timing,
            pulse_us: 0,
            enabled: true,
        }
    }

    /// Derive timing from the clock, period and tick, then bind the channel.
    ///
    /// # Errors
    ///
    /// Any error from [`PwmTiming::new`]; nothing is written to the slice in that case.
    pub fn configure(
        slice: S,
        side: PwmSide,
        clk_sys_hz: u32,
        period_us: u32,
        tick_us: u32,
    ) -> Result<Self> {
        let timing = PwmTiming::new(clk_sys_hz, period_us, tick_us)?;
        Ok(Self::new(slice, side, timing))
    }

    /// Set the high time of every period, in microseconds.
    ///
    /// Writing the value already programmed touches no hardware.
    ///
    /// # Errors
    ///
    /// [`PulseOutOfRange`](crate::Error::PulseOutOfRange) if the pulse is longer than
    /// `wrap` ticks, [`PulseNotTickAligned`](crate::Error::PulseNotTickAligned) if it is
    /// not a whole number of ticks. The channel keeps its previous pulse.
    pub fn set_pulse_us(&mut self, pulse_us: u16) -> Result<()> {
        let level = self.timing.pulse_level(pulse_us)?;
        if pulse_us == self.pulse_us {
            return Ok(());
        }
        self.slice.set_compare(self.side, level);
        self.pulse_us = pulse_us;

        #[cfg(feature = "defmt")]
        defmt::trace!("pwm side={} pulse={}µs", self.side, pulse_us);
        Ok(())
    }

    /// Pulse width currently programmed (µs).
    #[must_use]
    pub const fn pulse_us(&self) -> u16 {
        self.pulse_us
    }

    /// Programmed duty cycle in basis points (1200 = 12.00 %).
    #[must_use]
    pub const fn duty_basis_points(&self) -> u32 {
        self.timing.duty_basis_points(self.pulse_us)
    }

    /// Stop the waveform. The pulse width is kept for [`enable`](Self::enable).
    pub fn disable(&mut self) {
        self.enabled = false;
        self.slice.set_enabled(false);
    }

    /// Resume the waveform at the last programmed pulse width.
    pub fn enable(&mut self) {
        self.enabled = true;
        self.slice.set_enabled(true);
    }

    /// Whether the counter is running.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Highest pulse width, in ticks, the channel accepts.
    #[must_use]
    pub const fn wrap(&self) -> u16 {
        self.timing.wrap()
    }

    /// Timing fixed at construction.
    #[must_use]
    pub const fn timing(&self) -> &PwmTiming {
        &self.timing
    }

    /// Slice side this channel drives.
    #[must_use]
    pub const fn side(&self) -> PwmSide {
        self.side
    }

    /// Backend, for inspection.
    #[must_use]
    pub const fn slice(&self) -> &S {
        &self.slice
    }

    /// Give the backend back.
    #[must_use]
    pub fn into_slice(self) -> S {
        self.slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::sim::{SimSlice, SimWrite};

    fn servo() -> PwmChannel<SimSlice> {
        PwmChannel::new(SimSlice::new(), PwmSide::A, PwmTiming::SERVO_50HZ)
    }

    #[test]
    fn new_configures_then_enables() {
        let channel = servo();
        let slice = channel.slice();
        assert_eq!(slice.wrap(), 19_999);
        assert_eq!(slice.divider().to_num::<u32>(), 125);
        assert!(slice.is_enabled());
        assert_eq!(slice.compare(PwmSide::A), 0);
        assert_eq!(channel.pulse_us(), 0);
        assert_eq!(
            slice.history().copied().collect::<Vec<_>>(),
            [
                SimWrite::Configure {
                    divider_bits: 125 * 16,
                    wrap: 19_999
                },
                SimWrite::Compare {
                    side: PwmSide::A,
                    level: 0
                },
                SimWrite::Enabled(true),
            ]
        );
    }

    #[test]
    fn configure_rejects_unaligned_period() {
        let result = PwmChannel::configure(SimSlice::new(), PwmSide::A, 125_000_000, 20_001, 2);
        assert!(matches!(result, Err(Error::PeriodNotTickAligned { .. })));
    }

    #[test]
    fn programmed_pulse_reads_back_over_whole_range() {
        let mut channel = servo();
        for pulse_us in 0..=channel.wrap() {
            channel.set_pulse_us(pulse_us).unwrap();
            assert_eq!(channel.pulse_us(), pulse_us);
            assert_eq!(channel.slice().compare(PwmSide::A), pulse_us);
        }
    }

    #[test]
    fn out_of_range_pulse_is_rejected_and_keeps_value() {
        let mut channel = servo();
        channel.set_pulse_us(1_500).unwrap();
        let writes = channel.slice().write_count();

        assert_eq!(
            channel.set_pulse_us(20_000),
            Err(Error::PulseOutOfRange {
                pulse_us: 20_000,
                wrap: 19_999
            })
        );
        assert_eq!(channel.pulse_us(), 1_500);
        assert_eq!(channel.slice().compare(PwmSide::A), 1_500);
        assert_eq!(channel.slice().write_count(), writes);
    }

    #[test]
    fn pulse_between_ticks_is_rejected_and_keeps_value() {
        let mut channel =
            PwmChannel::configure(SimSlice::new(), PwmSide::A, 125_000_000, 20_000, 2).unwrap();
        channel.set_pulse_us(500).unwrap();
        let writes = channel.slice().write_count();

        assert_eq!(
            channel.set_pulse_us(505),
            Err(Error::PulseNotTickAligned {
                pulse_us: 505,
                tick_us: 2
            })
        );
        assert_eq!(channel.pulse_us(), 500);
        assert_eq!(channel.slice().compare(PwmSide::A), 250);
        assert_eq!(channel.slice().write_count(), writes);
    }

    #[test]
    fn repeated_pulse_is_idempotent() {
        let mut channel = servo();
        channel.set_pulse_us(2_400).unwrap();
        let writes = channel.slice().write_count();
        for _ in 0..5 {
            channel.set_pulse_us(2_400).unwrap();
        }
        assert_eq!(channel.slice().write_count(), writes);
        assert_eq!(channel.pulse_us(), 2_400);
    }

    #[test]
    fn side_b_leaves_side_a_alone() {
        let mut channel = PwmChannel::new(SimSlice::new(), PwmSide::B, PwmTiming::SERVO_50HZ);
        channel.set_pulse_us(900).unwrap();
        assert_eq!(channel.slice().compare(PwmSide::B), 900);
        assert_eq!(channel.slice().compare(PwmSide::A), 0);
    }

    #[test]
    fn disable_keeps_pulse_for_enable() {
        let mut channel = servo();
        channel.set_pulse_us(1_470).unwrap();
        channel.disable();
        assert!(!channel.is_enabled());
        assert!(!channel.slice().is_enabled());
        channel.enable();
        assert!(channel.slice().is_enabled());
        assert_eq!(channel.slice().compare(PwmSide::A), 1_470);
    }
}
