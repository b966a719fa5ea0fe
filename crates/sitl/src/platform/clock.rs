//! Simulation clock
//!
//! One counter shared by the follower, the world and the harness. The world
//! integrates chassis motion up to the clock's current reading whenever it
//! is touched, so waiting on this clock is what moves the robot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use line_follower_core::traits::TimeSource;

/// Shared simulated microsecond counter
///
/// Clones read and advance the same counter. Waiting never sleeps; it just
/// moves simulated time forward.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_us: Arc<AtomicU64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_us(&self, us: u64) {
        self.now_us.fetch_add(us, Ordering::Relaxed);
    }

    pub fn set_us(&self, us: u64) {
        self.now_us.store(us, Ordering::Relaxed);
    }
}

impl TimeSource for SimClock {
    fn now_us(&self) -> u64 {
        self.now_us.load(Ordering::Relaxed)
    }

    fn delay_us(&self, us: u64) {
        self.advance_us(us);
    }
}
