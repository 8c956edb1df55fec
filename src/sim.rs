//! Simulated hardware for running channels and the demonstration on the host.
//!
//! - [`SimSlice`] is a [`PwmSlice`] that keeps the register values and a bounded log of
//!   every write.
//! - [`VirtualClock`] is a [`DelayNs`] that returns immediately and adds the requested
//!   wait to a running total.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use heapless::Deque;

use crate::pwm_channel::{PwmSide, PwmSlice};
use crate::pwm_timing::PwmTiming;

/// Number of most recent writes a [`SimSlice`] remembers.
///
/// Large enough for one full up-and-down sweep of a servo (2 × 380 steps).
pub const SIM_HISTORY: usize = 1024;

/// One register write seen by a [`SimSlice`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SimWrite {
    /// Divider (raw 8.4 bits) and wrap programmed.
    Configure {
        /// Raw divider register bits.
        divider_bits: u16,
        /// Counter wrap.
        wrap: u16,
    },
    /// Compare level programmed on one side.
    Compare {
        /// Side written.
        side: PwmSide,
        /// Compare level in ticks.
        level: u16,
    },
    /// Counter started or stopped.
    Enabled(bool),
}

/// A PWM slice that only remembers what was written to it.
#[derive(Debug)]
pub struct SimSlice {
    divider_bits: u16,
    wrap: u16,
    compare_a: u16,
    compare_b: u16,
    enabled: bool,
    write_count: u32,
    history: Deque<SimWrite, SIM_HISTORY>,
}

impl SimSlice {
    /// A slice in its reset state: divider 1, wrap 0xffff, compare 0, disabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            divider_bits: 16,
            wrap: u16::MAX,
            compare_a: 0,
            compare_b: 0,
            enabled: false,
            write_count: 0,
            history: Deque::new(),
        }
    }

    /// Programmed divider.
    #[must_use]
    pub const fn divider(&self) -> fixed::types::U12F4 {
        fixed::types::U12F4::from_bits(self.divider_bits)
    }

    /// Programmed wrap.
    #[must_use]
    pub const fn wrap(&self) -> u16 {
        self.wrap
    }

    /// Programmed compare level of `side`.
    #[must_use]
    pub const fn compare(&self, side: PwmSide) -> u16 {
        match side {
            PwmSide::A => self.compare_a,
            PwmSide::B => self.compare_b,
        }
    }

    /// Whether the counter is running.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Total register writes, including those that fell out of the history.
    #[must_use]
    pub const fn write_count(&self) -> u32 {
        self.write_count
    }

    /// The last [`SIM_HISTORY`] writes, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &SimWrite> {
        self.history.iter()
    }

    /// Compare levels written to `side`, oldest first.
    pub fn compare_history(&self, side: PwmSide) -> impl Iterator<Item = u16> + '_ {
        self.history.iter().filter_map(move |write| match *write {
            SimWrite::Compare {
                side: written_side,
                level,
            } if written_side == side => Some(level),
            _ => None,
        })
    }

    /// Forget the write history; register values are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn record(&mut self, write: SimWrite) {
        self.write_count = self.write_count.saturating_add(1);
        if self.history.is_full() {
            self.history.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.history.push_back(write);
    }
}

impl Default for SimSlice {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmSlice for SimSlice {
    fn configure(&mut self, timing: &PwmTiming) {
        self.divider_bits = timing.divider().to_bits();
        self.wrap = timing.wrap();
        self.record(SimWrite::Configure {
            divider_bits: self.divider_bits,
            wrap: self.wrap,
        });
    }

    fn set_compare(&mut self, side: PwmSide, level: u16) {
        match side {
            PwmSide::A => self.compare_a = level,
            PwmSide::B => self.compare_b = level,
        }
        self.record(SimWrite::Compare { side, level });
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.record(SimWrite::Enabled(enabled));
    }
}

/// A delay provider that never sleeps; it adds up how long it was asked to wait.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VirtualClock {
    elapsed_ns: u64,
    waits: u32,
}

impl VirtualClock {
    /// A clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed_ns: 0,
            waits: 0,
        }
    }

    /// Total simulated time waited.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_ns / 1_000)
    }

    /// Total simulated time waited, in nanoseconds.
    #[must_use]
    pub const fn elapsed_ns(&self) -> u64 {
        self.elapsed_ns
    }

    /// Number of delay calls.
    #[must_use]
    pub const fn waits(&self) -> u32 {
        self.waits
    }

    fn advance(&mut self, ns: u64) {
        self.elapsed_ns = self.elapsed_ns.saturating_add(ns);
        self.waits = self.waits.saturating_add(1);
    }
}

impl DelayNs for VirtualClock {
    async fn delay_ns(&mut self, ns: u32) {
        self.advance(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.advance(u64::from(us) * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.advance(u64::from(ms) * 1_000_000);
    }
}
