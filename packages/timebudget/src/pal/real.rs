//! Real clock implementation backed by the operating system monotonic clock.

use std::time::{Duration, Instant};

use crate::pal::abstractions::Clock;

/// Real implementation of the clock abstraction.
///
/// The epoch is captured when the clock is created; readings are the time
/// elapsed since then.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RealClock {
    epoch: Instant,
}

impl RealClock {
    pub(crate) fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for RealClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}
