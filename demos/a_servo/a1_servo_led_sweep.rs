//! Hold 180°, 90° and 0° for 5 s each, then sweep forever.
//!
//! Servo signal on GPIO 22. The BitDogLab RGB LED on GPIO 12 receives the same pulses,
//! so its brightness follows the servo's duty cycle (2.5 % to 12 %).
#![no_std]
#![no_main]

use core::{convert::Infallible, panic};
use defmt::info;
use embassy_executor::Spawner;
use embassy_time::Delay;
use servo_pulse::{
    Result,
    demo::{DemoConfig, HoldAndSweep},
    pwm_channel,
};
use {defmt_rtt as _, panic_probe as _};

// RP2350 boot ROM looks for an image definition in the first flash block.
#[cfg(feature = "pico2")]
#[allow(unsafe_code, reason = "link_section is an unsafe attribute in edition 2024")]
#[unsafe(link_section = ".start_block")]
#[used]
pub static IMAGE_DEF: embassy_rp::block::ImageDef = embassy_rp::block::ImageDef::secure_exe();

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    let err = inner_main().await.unwrap_err();
    panic!("{err}");
}

async fn inner_main() -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // GPIO 22 → (22/2) % 8 = slice 3, side A
    let servo = pwm_channel! { pin: p.PIN_22, slice: p.PWM_SLICE3 }?;
    // GPIO 12 → (12/2) % 8 = slice 6, side A
    let led = pwm_channel! { pin: p.PIN_12, slice: p.PWM_SLICE6 }?;
    info!("servo on GPIO 22, LED mirror on GPIO 12");

    let mut demo = HoldAndSweep::new(servo, Some(led), Delay, DemoConfig::DEFAULT)?;
    demo.run().await
}
