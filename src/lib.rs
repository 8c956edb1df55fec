//! Servo and LED pulse-width control for the Raspberry Pi Pico 1 and 2.
//!
//! A hobby servo reads the *width* of a pulse repeated every 20 ms: about 500 µs for
//! one travel limit, 2400 µs for the other. This crate turns a pulse width in
//! microseconds into PWM slice settings and drives a hold-and-sweep demonstration
//! with it.
//!
//! - [`pwm_timing`] derives the clock divider and wrap for an exact 1 µs tick.
//! - [`pwm_channel`] programs one output and checks every pulse against the frame.
//! - [`sweep`] steps between two pulse widths without overshoot or underflow.
//! - [`demo`] holds 180°, 90°, 0°, then sweeps forever, optionally mirroring every pulse
//!   onto a second output (an LED).
//! - [`sim`] provides a simulated slice and clock so all of the above runs on the host.
//!
//! # Glossary
//!
//! - **PWM ([Pulse Width Modulation](https://en.wikipedia.org/wiki/Pulse-width_modulation)) Slices:**
//!   Pico 1 has 8 slices (& 16 channels), Pico 2 has 12. Each slice has one counter and
//!   two compare outputs, A and B. These "slices" are unrelated to Rust slices.
//! - **Wrap:** the last counter value before it starts over; `wrap + 1` ticks make one period.
//! - **Duty cycle:** high time divided by period.
//! - **Dwell:** how long a position is held before moving on.
#![cfg_attr(not(test), no_std)]

// Compile-time checks: at most one board, and a board whenever building for the chip.
#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

#[cfg(all(feature = "arm", not(any(feature = "pico1", feature = "pico2"))))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

pub mod demo;
mod error;
pub mod positions;
pub mod pwm_channel;
pub mod pwm_timing;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod rp_pwm;
pub mod sim;
pub mod sweep;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
