//! Every `pwm_channel!` form, on both slice sides.
#![no_std]
#![no_main]
#![allow(dead_code, reason = "Compile-time verification only")]

use core::convert::Infallible;
use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use panic_probe as _;
use servo_pulse::Result;
use servo_pulse::pwm_channel;
use servo_pulse::pwm_channel::PwmSide;

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    let err = inner_main().unwrap_err();
    core::panic!("{err}");
}

fn inner_main() -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // Even pin, side A, default servo frame.
    let mut even = pwm_channel! { pin: p.PIN_0, slice: p.PWM_SLICE0 }?;
    // Odd pin, side B, 10 ms frame.
    let mut odd = pwm_channel! { pin: p.PIN_3, slice: p.PWM_SLICE1, period_us: 10_000 }?;
    // 2 µs ticks, 40 ms frame.
    let mut coarse = pwm_channel! {
        pin: p.PIN_28,
        slice: p.PWM_SLICE6,
        period_us: 40_000,
        tick_us: 2,
    }?;

    assert!(even.side() == PwmSide::A);
    assert!(odd.side() == PwmSide::B);
    even.set_pulse_us(1_500)?;
    odd.set_pulse_us(9_999)?;
    coarse.set_pulse_us(3_000)?;
    info!("wraps {} {} {}", even.wrap(), odd.wrap(), coarse.wrap());

    loop {
        cortex_m::asm::wfi();
    }
}
