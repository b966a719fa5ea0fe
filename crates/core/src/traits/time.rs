//! Monotonic time for the control loops
//!
//! The follow loop measures the time between cycles for its PID controllers
//! and paces itself to a fixed period; the line search polls the arrays
//! against a time budget. Both only see time through [`TimeSource`], so the
//! same code runs on a hardware timer, the simulation clock or [`MockTime`].

use core::cell::Cell;

/// Microsecond clock with a blocking wait
///
/// ```
/// use line_follower_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// let cycle_start = time.now_us();
/// time.advance(5_000);
/// time.sleep_until(cycle_start + 20_000);
/// assert_eq!(time.now_us(), 20_000);
/// ```
pub trait TimeSource: Clone + Send + Sync {
    /// Microseconds since an arbitrary fixed origin
    fn now_us(&self) -> u64;

    /// Block the control thread for `us` microseconds
    fn delay_us(&self, us: u64);

    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Block until `deadline_us`; returns at once if it has passed
    fn sleep_until(&self, deadline_us: u64) {
        let now_us = self.now_us();
        if deadline_us > now_us {
            self.delay_us(deadline_us - now_us);
        }
    }

    /// Microseconds since `reference_us`, zero if it lies in the future
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }

    /// Seconds since `reference_us`, the `dt` fed to the PID loops
    fn elapsed_secs_since(&self, reference_us: u64) -> f32 {
        self.elapsed_since(reference_us) as f32 / 1_000_000.0
    }
}

/// Manually driven clock for host tests
///
/// Waiting advances the counter instead of sleeping, so polling loops
/// finish immediately and deterministically. Clones copy the current time
/// and then run independently.
#[derive(Debug, Clone, Default)]
pub struct MockTime {
    now_us: Cell<u64>,
}

// Safety: MockTime never crosses threads; the bounds exist for the firmware
// timer and the simulation clock.
unsafe impl Send for MockTime {}
unsafe impl Sync for MockTime {}

impl MockTime {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(us: u64) -> Self {
        Self {
            now_us: Cell::new(us),
        }
    }

    pub fn set(&self, us: u64) {
        self.now_us.set(us);
    }

    pub fn advance(&self, us: u64) {
        self.now_us.set(self.now_us.get().saturating_add(us));
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }

    fn delay_us(&self, us: u64) {
        self.advance(us);
    }
}
