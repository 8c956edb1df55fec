#![allow(missing_docs, reason = "integration test crate")]
//! Host-level checks that programmed pulses produce the intended duty cycles.

use servo_pulse::Error;
use servo_pulse::positions::{Position, ServoPositionTable};
use servo_pulse::pwm_channel::{PwmChannel, PwmSide};
use servo_pulse::pwm_timing::PwmTiming;
use servo_pulse::sim::SimSlice;

fn servo_channel() -> PwmChannel<SimSlice> {
    PwmChannel::configure(SimSlice::new(), PwmSide::A, 125_000_000, 20_000, 1).unwrap()
}

#[test]
fn twenty_ms_frame_at_one_us_resolution() {
    let channel = servo_channel();
    assert_eq!(channel.wrap(), 19_999);
    assert_eq!(channel.timing().frequency_hz(), 50);
    assert_eq!(channel.slice().wrap(), 19_999);
    assert_eq!(channel.slice().divider().to_num::<u32>(), 125);
}

#[test]
fn hold_180_is_twelve_percent() {
    let mut channel = servo_channel();
    channel.set_pulse_us(2_400).unwrap();
    assert_eq!(channel.duty_basis_points(), 1_200);
}

#[test]
fn hold_90_is_seven_point_three_five_percent() {
    let mut channel = servo_channel();
    channel.set_pulse_us(1_470).unwrap();
    assert_eq!(channel.duty_basis_points(), 735);
}

#[test]
fn hold_0_is_two_point_five_percent() {
    let mut channel = servo_channel();
    channel.set_pulse_us(500).unwrap();
    assert_eq!(channel.duty_basis_points(), 250);
}

#[test]
fn every_position_fits_the_frame() {
    let table = ServoPositionTable::SG90;
    let mut channel = servo_channel();
    for position in [Position::Deg180, Position::Deg90, Position::Deg0] {
        let pulse_us = table.pulse_for(position);
        channel.set_pulse_us(pulse_us).unwrap();
        assert_eq!(channel.slice().compare(PwmSide::A), pulse_us);
    }
}

#[test]
fn last_tick_of_frame_is_accepted_and_next_is_rejected() {
    let mut channel = servo_channel();
    channel.set_pulse_us(19_999).unwrap();
    assert_eq!(channel.duty_basis_points(), 9_999);
    assert_eq!(
        channel.set_pulse_us(20_000),
        Err(Error::PulseOutOfRange {
            pulse_us: 20_000,
            wrap: 19_999
        })
    );
    assert_eq!(channel.pulse_us(), 19_999);
}

#[test]
fn servo_and_led_channels_are_independent() {
    let mut servo = PwmChannel::new(SimSlice::new(), PwmSide::A, PwmTiming::SERVO_50HZ);
    let mut led = PwmChannel::new(SimSlice::new(), PwmSide::A, PwmTiming::SERVO_50HZ);
    servo.set_pulse_us(2_400).unwrap();
    led.set_pulse_us(500).unwrap();
    assert_eq!(servo.slice().compare(PwmSide::A), 2_400);
    assert_eq!(led.slice().compare(PwmSide::A), 500);
}

#[test]
fn error_messages_name_the_values() {
    let err = PwmTiming::new(125_000_000, 20_000, 3).unwrap_err();
    assert_eq!(
        err.to_string(),
        "period of 20000 µs is not a whole number of 3 µs ticks"
    );
}
