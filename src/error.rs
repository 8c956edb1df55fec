//! Error type shared by every module of the crate.

/// A specialized [`Result`](core::result::Result) whose error type is [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong while deriving PWM timing, programming a channel,
/// or planning a sweep.
#[derive(Clone, Copy, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The PWM period or the counter tick was zero.
    #[display("PWM period and tick must both be non-zero")]
    ZeroDuration,

    /// The period is not a whole number of counter ticks.
    #[display("period of {period_us} µs is not a whole number of {tick_us} µs ticks")]
    PeriodNotTickAligned {
        /// Requested period (µs).
        period_us: u32,
        /// Requested tick (µs).
        tick_us: u32,
    },

    /// The derived wrap value does not fit the 16-bit counter.
    #[display("wrap {wrap} does not fit the 16-bit PWM counter")]
    WrapOutOfRange {
        /// `period_us / tick_us - 1`.
        wrap: u32,
    },

    /// The system clock cannot be divided down to the tick with the 8.4 divider.
    #[display("clk_sys of {clk_sys_hz} Hz has no exact 8.4 divider for a {tick_us} µs tick")]
    InexactDivider {
        /// System clock (Hz).
        clk_sys_hz: u32,
        /// Requested tick (µs).
        tick_us: u32,
    },

    /// The exact divider exists but is outside `1.0..=255.9375`.
    #[display("clock divider of {sixteenths}/16 is outside 1.0..=255.9375")]
    DividerOutOfRange {
        /// Divider in units of 1/16.
        sixteenths: u64,
    },

    /// A pulse width larger than the channel's wrap value.
    #[display("pulse of {pulse_us} µs exceeds wrap {wrap}")]
    PulseOutOfRange {
        /// Rejected pulse (µs).
        pulse_us: u16,
        /// Channel wrap.
        wrap: u16,
    },

    /// A pulse width the channel's counter cannot represent in whole ticks.
    #[display("pulse of {pulse_us} µs is not a whole number of {tick_us} µs ticks")]
    PulseNotTickAligned {
        /// Rejected pulse (µs).
        pulse_us: u16,
        /// Channel tick (µs).
        tick_us: u32,
    },

    /// The 0°/90°/180° calibration pulses are not strictly increasing.
    #[display("servo position pulses must be strictly increasing")]
    PositionsNotIncreasing,

    /// An angle above 180°.
    #[display("{degrees}° is outside 0..=180")]
    DegreesOutOfRange {
        /// Rejected angle.
        degrees: u16,
    },

    /// A sweep with a zero step would never reach its target.
    #[display("sweep step must be non-zero")]
    ZeroStep,

    /// A sweep step that is not a whole number of a channel's ticks.
    #[display("sweep step of {step_us} µs is not a whole number of {tick_us} µs ticks")]
    StepNotTickAligned {
        /// Sweep step (µs).
        step_us: u16,
        /// Channel tick (µs).
        tick_us: u32,
    },

    /// The sweep endpoints run against the requested direction.
    #[display("cannot sweep from {from_us} µs to {to_us} µs in that direction")]
    SweepDirection {
        /// Start pulse (µs).
        from_us: u16,
        /// End pulse (µs).
        to_us: u16,
    },

    /// A dwell or step delay longer than the delay provider accepts.
    #[display("delay does not fit in 32-bit microseconds")]
    DelayOutOfRange,
}
