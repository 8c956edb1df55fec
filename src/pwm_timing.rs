//! Counter parameters for a fixed-period PWM signal.
//!
//! A PWM slice counts from 0 to `wrap` and starts over, one count per tick. The tick is
//! the system clock divided by an 8.4 fixed-point divider. [`PwmTiming`] picks the
//! divider and wrap so that:
//!
//! - one tick is exactly `tick_us` microseconds (`divider × tick_hz == clk_sys_hz`), and
//! - `wrap + 1` ticks are exactly one period.
//!
//! With a 1 µs tick the compare value *is* the pulse width in microseconds, which is
//! what every other module in this crate relies on.

use fixed::types::U12F4;

use crate::{Error, Result};

const MICROS_PER_SECOND: u64 = 1_000_000;

// The divider register holds 8 integer and 4 fractional bits.
const DIVIDER_FRACTION: u64 = 16;
const DIVIDER_MIN_SIXTEENTHS: u64 = DIVIDER_FRACTION; // 1.0
const DIVIDER_MAX_SIXTEENTHS: u64 = 255 * DIVIDER_FRACTION + (DIVIDER_FRACTION - 1); // 255.9375

/// Default Pico 1 system clock (Hz).
pub const CLK_SYS_HZ_DEFAULT: u32 = 125_000_000;

/// Standard hobby-servo frame: 20 ms (50 Hz).
pub const SERVO_PERIOD_US: u32 = 20_000;

/// Counter resolution used for servo signals: one tick per microsecond.
pub const SERVO_TICK_US: u32 = 1;

/// Divider and wrap for a PWM slice, validated to reproduce the requested period exactly.
///
/// # Example
///
/// ```
/// use servo_pulse::pwm_timing::PwmTiming;
///
/// let timing = PwmTiming::new(125_000_000, 20_000, 1).unwrap();
/// assert_eq!(timing.wrap(), 19_999);
/// assert_eq!(timing.divider().to_num::<u32>(), 125);
/// assert_eq!(timing.duty_basis_points(1_470), 735); // 7.35 %
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PwmTiming {
    clk_sys_hz: u32,
    period_us: u32,
    tick_us: u32,
    divider: U12F4,
    wrap: u16,
}

impl PwmTiming {
    /// 50 Hz servo timing at 1 µs resolution for the default 125 MHz clock.
    pub const SERVO_50HZ: Self = match Self::new(CLK_SYS_HZ_DEFAULT, SERVO_PERIOD_US, SERVO_TICK_US)
    {
        Ok(timing) => timing,
        Err(_) => panic!("125 MHz must divide exactly to a 1 µs tick"),
    };

    /// Derive divider and wrap for `period_us` at a resolution of `tick_us`.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroDuration`] if either duration is zero.
    /// - [`Error::PeriodNotTickAligned`] if the period is not a whole number of ticks.
    /// - [`Error::WrapOutOfRange`] if the period needs more than 65 536 ticks.
    /// - [`Error::InexactDivider`] if no 8.4 divider turns `clk_sys_hz` into the tick exactly.
    /// - [`Error::DividerOutOfRange`] if the exact divider is below 1 or above 255.9375.
    pub const fn new(clk_sys_hz: u32, period_us: u32, tick_us: u32) -> Result<Self> {
        if period_us == 0 || tick_us == 0 {
            return Err(Error::ZeroDuration);
        }
        if period_us % tick_us != 0 {
            return Err(Error::PeriodNotTickAligned { period_us, tick_us });
        }
        let wrap = period_us / tick_us - 1;
        if wrap > u16::MAX as u32 {
            return Err(Error::WrapOutOfRange { wrap });
        }

        // divider = clk_sys_hz / tick_hz = clk_sys_hz * tick_us / 1e6, kept in sixteenths.
        let scaled = clk_sys_hz as u64 * tick_us as u64 * DIVIDER_FRACTION;
        if scaled % MICROS_PER_SECOND != 0 {
            return Err(Error::InexactDivider {
                clk_sys_hz,
                tick_us,
            });
        }
        let sixteenths = scaled / MICROS_PER_SECOND;
        if sixteenths < DIVIDER_MIN_SIXTEENTHS || sixteenths > DIVIDER_MAX_SIXTEENTHS {
            return Err(Error::DividerOutOfRange { sixteenths });
        }

        Ok(Self {
            clk_sys_hz,
            period_us,
            tick_us,
            divider: U12F4::from_bits(sixteenths as u16),
            wrap: wrap as u16,
        })
    }

    /// System clock the divider was derived from (Hz).
    #[must_use]
    pub const fn clk_sys_hz(&self) -> u32 {
        self.clk_sys_hz
    }

    /// Full PWM period (µs).
    #[must_use]
    pub const fn period_us(&self) -> u32 {
        self.period_us
    }

    /// Duration of one counter tick (µs).
    #[must_use]
    pub const fn tick_us(&self) -> u32 {
        self.tick_us
    }

    /// Clock divider in the PWM divider register's 8.4 format.
    #[must_use]
    pub const fn divider(&self) -> U12F4 {
        self.divider
    }

    /// Highest counter value before wraparound; `wrap + 1` ticks make one period.
    #[must_use]
    pub const fn wrap(&self) -> u16 {
        self.wrap
    }

    /// Signal frequency (Hz), rounded down.
    #[must_use]
    pub const fn frequency_hz(&self) -> u32 {
        (MICROS_PER_SECOND / self.period_us as u64) as u32
    }

    /// Compare level that holds the output high for `pulse_us`.
    ///
    /// # Errors
    ///
    /// [`Error::PulseNotTickAligned`] if the pulse is not a whole number of ticks,
    /// [`Error::PulseOutOfRange`] if it is longer than `wrap` ticks.
    pub const fn pulse_level(&self, pulse_us: u16) -> Result<u16> {
        let pulse = pulse_us as u32;
        if pulse % self.tick_us != 0 {
            return Err(Error::PulseNotTickAligned {
                pulse_us,
                tick_us: self.tick_us,
            });
        }
        let level = pulse / self.tick_us;
        if level > self.wrap as u32 {
            return Err(Error::PulseOutOfRange {
                pulse_us,
                wrap: self.wrap,
            });
        }
        Ok(level as u16)
    }

    /// [`pulse_level`](Self::pulse_level) without the reason.
    #[must_use]
    pub const fn compare_for_pulse_us(&self, pulse_us: u16) -> Option<u16> {
        match self.pulse_level(pulse_us) {
            Ok(level) => Some(level),
            Err(_) => None,
        }
    }

    /// High time as a fraction of the period, in basis points (1 bp = 0.01 %).
    ///
    /// `duty_basis_points(2_400)` on a 20 ms frame is `1_200`, i.e. 12.00 %.
    #[must_use]
    pub const fn duty_basis_points(&self, pulse_us: u16) -> u32 {
        (pulse_us as u64 * 10_000 / self.period_us as u64) as u32
    }
}

impl Default for PwmTiming {
    fn default() -> Self {
        Self::SERVO_50HZ
    }
}
