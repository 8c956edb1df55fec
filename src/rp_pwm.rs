//! RP2040/RP2350 PWM slices as [`PwmSlice`] backends.
//!
//! Use the [`pwm_channel!`] macro to bind a GPIO to its slice and get a ready
//! [`PwmChannel`] with servo timing derived from the live system clock.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};

use crate::pwm_channel::{PwmChannel, PwmSide, PwmSlice};
use crate::pwm_timing::PwmTiming;
use crate::Result;

/// Create a [`PwmChannel`] from a pin and its PWM slice.
///
/// Required fields: `pin`, `slice`. Optional: `period_us` and `tick_us` (defaults
/// 20 000 µs and 1 µs). The side (A or B) follows from the pin. Evaluates to
/// [`Result<PwmChannel<RpSlice>>`](crate::Result).
///
/// A pin paired with the wrong slice does not compile.
///
/// # Example
/// ```rust,no_run
/// # #![no_std]
/// # #![no_main]
/// # use core::panic::PanicInfo;
/// # #[panic_handler]
/// # fn panic(_info: &PanicInfo) -> ! { loop {} }
/// use servo_pulse::pwm_channel;
///
/// fn example(p: embassy_rp::Peripherals) -> servo_pulse::Result<()> {
///     // GPIO 22 is side A of slice 3 (22 / 2 = 11, 11 % 8 = 3).
///     let mut servo = pwm_channel! { pin: p.PIN_22, slice: p.PWM_SLICE3 }?;
///     servo.set_pulse_us(1_470)?;
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! pwm_channel {
    (pin: $pin:expr, slice: $slice:expr $(,)?) => {
        $crate::rp_pwm::channel_from_pin_slice(
            $pin,
            $slice,
            $crate::pwm_timing::SERVO_PERIOD_US,
            $crate::pwm_timing::SERVO_TICK_US,
        )
    };
    (pin: $pin:expr, slice: $slice:expr, period_us: $period_us:expr $(,)?) => {
        $crate::rp_pwm::channel_from_pin_slice(
            $pin,
            $slice,
            $period_us,
            $crate::pwm_timing::SERVO_TICK_US,
        )
    };
    (pin: $pin:expr, slice: $slice:expr, period_us: $period_us:expr, tick_us: $tick_us:expr $(,)?) => {
        $crate::rp_pwm::channel_from_pin_slice($pin, $slice, $period_us, $tick_us)
    };
}
#[doc(inline)]
pub use pwm_channel;

/// A pin that can be driven by PWM slice `S`.
// Public for macro expansion in downstream crates.
#[doc(hidden)]
pub trait PwmPin<S: embassy_rp::PeripheralType>: embassy_rp::PeripheralType {
    /// Compare output the pin is wired to.
    const SIDE: PwmSide;
    /// Bind the pin to the slice's output.
    fn new_pwm<'d>(slice: embassy_rp::Peri<'d, S>, pin: embassy_rp::Peri<'d, Self>) -> Pwm<'d>;
}

/// Build a [`PwmChannel`] for `pin` on `slice` with timing from the live system clock.
// Public for macro expansion in downstream crates.
#[doc(hidden)]
pub fn channel_from_pin_slice<'d, P, S>(
    pin: embassy_rp::Peri<'d, P>,
    slice: embassy_rp::Peri<'d, S>,
    period_us: u32,
    tick_us: u32,
) -> Result<PwmChannel<RpSlice<'d>>>
where
    P: PwmPin<S>,
    S: embassy_rp::PeripheralType,
{
    let timing = PwmTiming::new(clk_sys_freq(), period_us, tick_us)?;
    let slice = RpSlice::new(P::new_pwm(slice, pin));
    Ok(PwmChannel::new(slice, P::SIDE, timing))
}

macro_rules! pwm_pin_map {
    ($pin:ident, $slice:ident, A) => {
        impl PwmPin<embassy_rp::peripherals::$slice> for embassy_rp::peripherals::$pin {
            const SIDE: PwmSide = PwmSide::A;
            fn new_pwm<'d>(
                slice: embassy_rp::Peri<'d, embassy_rp::peripherals::$slice>,
                pin: embassy_rp::Peri<'d, Self>,
            ) -> Pwm<'d> {
                Pwm::new_output_a(slice, pin, Config::default())
            }
        }
    };
    ($pin:ident, $slice:ident, B) => {
        impl PwmPin<embassy_rp::peripherals::$slice> for embassy_rp::peripherals::$pin {
            const SIDE: PwmSide = PwmSide::B;
            fn new_pwm<'d>(
                slice: embassy_rp::Peri<'d, embassy_rp::peripherals::$slice>,
                pin: embassy_rp::Peri<'d, Self>,
            ) -> Pwm<'d> {
                Pwm::new_output_b(slice, pin, Config::default())
            }
        }
    };
}

pwm_pin_map!(PIN_0, PWM_SLICE0, A);
pwm_pin_map!(PIN_1, PWM_SLICE0, B);
pwm_pin_map!(PIN_2, PWM_SLICE1, A);
pwm_pin_map!(PIN_3, PWM_SLICE1, B);
pwm_pin_map!(PIN_4, PWM_SLICE2, A);
pwm_pin_map!(PIN_5, PWM_SLICE2, B);
pwm_pin_map!(PIN_6, PWM_SLICE3, A);
pwm_pin_map!(PIN_7, PWM_SLICE3, B);
pwm_pin_map!(PIN_8, PWM_SLICE4, A);
pwm_pin_map!(PIN_9, PWM_SLICE4, B);
pwm_pin_map!(PIN_10, PWM_SLICE5, A);
pwm_pin_map!(PIN_11, PWM_SLICE5, B);
pwm_pin_map!(PIN_12, PWM_SLICE6, A);
pwm_pin_map!(PIN_13, PWM_SLICE6, B);
pwm_pin_map!(PIN_14, PWM_SLICE7, A);
pwm_pin_map!(PIN_15, PWM_SLICE7, B);
pwm_pin_map!(PIN_16, PWM_SLICE0, A);
pwm_pin_map!(PIN_17, PWM_SLICE0, B);
pwm_pin_map!(PIN_18, PWM_SLICE1, A);
pwm_pin_map!(PIN_19, PWM_SLICE1, B);
pwm_pin_map!(PIN_20, PWM_SLICE2, A);
pwm_pin_map!(PIN_21, PWM_SLICE2, B);
pwm_pin_map!(PIN_22, PWM_SLICE3, A);
pwm_pin_map!(PIN_23, PWM_SLICE3, B);
pwm_pin_map!(PIN_24, PWM_SLICE4, A);
pwm_pin_map!(PIN_25, PWM_SLICE4, B);
pwm_pin_map!(PIN_26, PWM_SLICE5, A);
pwm_pin_map!(PIN_27, PWM_SLICE5, B);
pwm_pin_map!(PIN_28, PWM_SLICE6, A);
pwm_pin_map!(PIN_29, PWM_SLICE6, B);

#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_30, PWM_SLICE7, A);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_31, PWM_SLICE7, B);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_32, PWM_SLICE8, A);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_33, PWM_SLICE8, B);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_34, PWM_SLICE9, A);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_35, PWM_SLICE9, B);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_36, PWM_SLICE10, A);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_37, PWM_SLICE10, B);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_38, PWM_SLICE11, A);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_39, PWM_SLICE11, B);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_40, PWM_SLICE8, A);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_41, PWM_SLICE8, B);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_42, PWM_SLICE9, A);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_43, PWM_SLICE9, B);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_44, PWM_SLICE10, A);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_45, PWM_SLICE10, B);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_46, PWM_SLICE11, A);
#[cfg(feature = "pico2")]
pwm_pin_map!(PIN_47, PWM_SLICE11, B);

/// An embassy-rp PWM slice driving one output.
///
/// Keeps the whole slice [`Config`] and rewrites it on every change: `set_config` takes
/// a complete configuration, and rebuilding it from `Config::default()` would reset the
/// divider to 1.
pub struct RpSlice<'d> {
    pwm: Pwm<'d>,
    cfg: Config,
}

impl<'d> RpSlice<'d> {
    /// Wrap a slice that has already been bound to its pin.
    #[must_use]
    pub fn new(pwm: Pwm<'d>) -> Self {
        let mut cfg = Config::default();
        cfg.enable = false;
        Self { pwm, cfg }
    }
}

impl PwmSlice for RpSlice<'_> {
    fn configure(&mut self, timing: &PwmTiming) {
        self.cfg.divider = timing.divider();
        self.cfg.top = timing.wrap();
        self.cfg.phase_correct = false; // edge-aligned => exact 1 tick steps
        self.pwm.set_config(&self.cfg);
    }

    fn set_compare(&mut self, side: PwmSide, level: u16) {
        match side {
            PwmSide::A => self.cfg.compare_a = level,
            PwmSide::B => self.cfg.compare_b = level,
        }
        self.pwm.set_config(&self.cfg);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.cfg.enable = enabled;
        self.pwm.set_config(&self.cfg);
    }
}
