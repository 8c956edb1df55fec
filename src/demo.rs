//! The hold-and-sweep demonstration.
//!
//! The servo holds 180°, 90° and 0° for a dwell each, then sweeps between the limits
//! forever. An optional second channel (the LED on the BitDogLab board) receives every
//! pulse the servo receives, so its brightness tracks the servo's duty cycle.
//!
//! ```text
//! Hold180 ─▶ Hold90 ─▶ Hold0 ─▶ SweepUp ─▶ SweepDown
//!                                  ▲            │
//!                                  └────────────┘
//! ```
//!
//! Waits go through an injected [`DelayNs`]: `embassy_time::Delay` on the board,
//! [`VirtualClock`](crate::sim::VirtualClock) in tests.

use core::convert::Infallible;

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::positions::{Position, ServoPositionTable};
use crate::pwm_channel::{PwmChannel, PwmSlice};
use crate::sweep::SweepState;
use crate::{Error, Result};

/// Constants of the demonstration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DemoConfig {
    /// Pulse widths of the held positions and the sweep limits.
    pub positions: ServoPositionTable,
    /// How long each named position is held.
    pub dwell: Duration,
    /// Pulse change per sweep step (µs).
    pub step_us: u16,
    /// Wait after each sweep step.
    pub step_delay: Duration,
}

impl DemoConfig {
    /// SG90 positions, 5 s dwell, 5 µs every 10 ms.
    pub const DEFAULT: Self = Self {
        positions: ServoPositionTable::SG90,
        dwell: Duration::from_millis(5_000),
        step_us: 5,
        step_delay: Duration::from_millis(10),
    };

    /// Simulated time of one sweep from one limit to the other.
    #[must_use]
    pub fn sweep_duration(&self) -> Duration {
        let steps = SweepState::up(self.positions.min_us(), self.positions.max_us(), self.step_us)
            .map_or(0, |sweep| sweep.len());
        self.step_delay * u32::try_from(steps).unwrap_or(u32::MAX)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// State of the demonstration.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoState {
    /// Hold 180° for the dwell.
    Hold180,
    /// Hold 90° for the dwell.
    Hold90,
    /// Hold 0° for the dwell.
    Hold0,
    /// Step from 0° to 180°.
    SweepUp,
    /// Step from 180° back to 0°.
    SweepDown,
}

impl DemoState {
    /// The state the demonstration starts in.
    pub const INITIAL: Self = Self::Hold180;

    /// The state that follows this one. There is no terminal state.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Hold180 => Self::Hold90,
            Self::Hold90 => Self::Hold0,
            Self::Hold0 | Self::SweepDown => Self::SweepUp,
            Self::SweepUp => Self::SweepDown,
        }
    }
}

/// Drives a servo channel, and optionally a mirror channel, through the demonstration.
///
/// # Example
///
/// ```
/// use embassy_futures::block_on;
/// use servo_pulse::demo::{DemoConfig, DemoState, HoldAndSweep};
/// use servo_pulse::pwm_channel::{PwmChannel, PwmSide};
/// use servo_pulse::pwm_timing::PwmTiming;
/// use servo_pulse::sim::{SimSlice, VirtualClock};
///
/// let servo = PwmChannel::new(SimSlice::new(), PwmSide::A, PwmTiming::SERVO_50HZ);
/// let led = PwmChannel::new(SimSlice::new(), PwmSide::A, PwmTiming::SERVO_50HZ);
/// let mut demo =
///     HoldAndSweep::new(servo, Some(led), VirtualClock::new(), DemoConfig::DEFAULT).unwrap();
///
/// let next = block_on(demo.run_state(DemoState::Hold180)).unwrap();
/// assert_eq!(next, DemoState::Hold90);
/// assert_eq!(demo.servo().pulse_us(), 2_400);
/// assert_eq!(demo.mirror().map(PwmChannel::pulse_us), Some(2_400));
/// ```
pub struct HoldAndSweep<S, D> {
    servo: PwmChannel<S>,
    mirror: Option<PwmChannel<S>>,
    delay: D,
    positions: ServoPositionTable,
    step_us: u16,
    dwell_us: u32,
    step_delay_us: u32,
}

impl<S: PwmSlice, D: DelayNs> HoldAndSweep<S, D> {
    /// Check `config` against the channels and take ownership of everything.
    ///
    /// # Errors
    ///
    /// Every pulse the demonstration can produce is checked here, on every channel:
    /// the three positions and the sweep step must be whole numbers of ticks, and the
    /// 180° pulse must fit the frame. Sweep values are then `min + k·step` or the 180°
    /// pulse itself, so none of them can be rejected later.
    ///
    /// # Errors
    ///
    /// - [`Error::PulseOutOfRange`] if the 180° pulse does not fit a channel's frame.
    /// - [`Error::PulseNotTickAligned`] if a position falls between a channel's ticks.
    /// - [`Error::ZeroStep`] for a zero sweep step.
    /// - [`Error::StepNotTickAligned`] if the step falls between a channel's ticks.
    /// - [`Error::DelayOutOfRange`] if a delay exceeds `u32::MAX` microseconds.
    pub fn new(
        servo: PwmChannel<S>,
        mirror: Option<PwmChannel<S>>,
        delay: D,
        config: DemoConfig,
    ) -> Result<Self> {
        if config.step_us == 0 {
            return Err(Error::ZeroStep);
        }
        for channel in core::iter::once(&servo).chain(mirror.as_ref()) {
            let timing = channel.timing();
            for position in [Position::Deg0, Position::Deg90, Position::Deg180] {
                timing.pulse_level(config.positions.pulse_for(position))?;
            }
            if u32::from(config.step_us) % timing.tick_us() != 0 {
                return Err(Error::StepNotTickAligned {
                    step_us: config.step_us,
                    tick_us: timing.tick_us(),
                });
            }
        }

        Ok(Self {
            servo,
            mirror,
            delay,
            positions: config.positions,
            step_us: config.step_us,
            dwell_us: duration_us(config.dwell)?,
            step_delay_us: duration_us(config.step_delay)?,
        })
    }

    /// Run the demonstration from [`DemoState::INITIAL`] until an error occurs.
    ///
    /// # Errors
    ///
    /// Whatever error stops a state; with a validated configuration there is none.
    pub async fn run(&mut self) -> Result<Infallible> {
        let mut state = DemoState::INITIAL;
        loop {
            state = self.run_state(state).await?;
        }
    }

    /// Execute one state to completion and return the next one.
    ///
    /// Sweeps start from their limit position regardless of where the servo is.
    ///
    /// # Errors
    ///
    /// [`Error::PulseOutOfRange`] or [`Error::PulseNotTickAligned`] if a channel rejects
    /// a pulse; neither channel is written in that case.
    pub async fn run_state(&mut self, state: DemoState) -> Result<DemoState> {
        #[cfg(feature = "defmt")]
        defmt::info!("demo state {}", state);

        match state {
            DemoState::Hold180 => self.hold(Position::Deg180).await?,
            DemoState::Hold90 => self.hold(Position::Deg90).await?,
            DemoState::Hold0 => self.hold(Position::Deg0).await?,
            DemoState::SweepUp => {
                let sweep = SweepState::up(
                    self.positions.min_us(),
                    self.positions.max_us(),
                    self.step_us,
                )?;
                self.sweep(sweep).await?;
            }
            DemoState::SweepDown => {
                let sweep = SweepState::down(
                    self.positions.max_us(),
                    self.positions.min_us(),
                    self.step_us,
                )?;
                self.sweep(sweep).await?;
            }
        }
        Ok(state.next())
    }

    async fn hold(&mut self, position: Position) -> Result<()> {
        let pulse_us = self.positions.pulse_for(position);
        self.apply(pulse_us)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "hold {}° at {}µs for {}ms",
            position.degrees(),
            pulse_us,
            self.dwell_us / 1_000
        );

        self.delay.delay_us(self.dwell_us).await;
        Ok(())
    }

    async fn sweep(&mut self, sweep: SweepState) -> Result<()> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "sweep {} {}µs -> {}µs in {} steps",
            sweep.direction(),
            sweep.pulse_us(),
            sweep.target_us(),
            sweep.len()
        );

        for pulse_us in sweep {
            self.apply(pulse_us)?;
            self.delay.delay_us(self.step_delay_us).await;
        }
        Ok(())
    }

    // Both channels accept the pulse or neither is written.
    fn apply(&mut self, pulse_us: u16) -> Result<()> {
        self.servo.timing().pulse_level(pulse_us)?;
        if let Some(mirror) = self.mirror.as_ref() {
            mirror.timing().pulse_level(pulse_us)?;
        }
        self.servo.set_pulse_us(pulse_us)?;
        if let Some(mirror) = self.mirror.as_mut() {
            mirror.set_pulse_us(pulse_us)?;
        }
        Ok(())
    }

    /// The servo channel.
    #[must_use]
    pub const fn servo(&self) -> &PwmChannel<S> {
        &self.servo
    }

    /// The mirror channel, if one was given.
    #[must_use]
    pub const fn mirror(&self) -> Option<&PwmChannel<S>> {
        self.mirror.as_ref()
    }

    /// The delay provider.
    #[must_use]
    pub const fn delay(&self) -> &D {
        &self.delay
    }

    /// Take the channels and the delay provider back.
    #[must_use]
    pub fn into_parts(self) -> (PwmChannel<S>, Option<PwmChannel<S>>, D) {
        (self.servo, self.mirror, self.delay)
    }
}

fn duration_us(duration: Duration) -> Result<u32> {
    u32::try_from(duration.as_micros()).map_err(|_| Error::DelayOutOfRange)
}
