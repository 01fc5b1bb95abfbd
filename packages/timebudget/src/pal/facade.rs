//! Facade that dispatches clock calls to the real or fake implementation.

use std::time::Duration;

use crate::pal::abstractions::Clock;
#[cfg(test)]
use crate::pal::fake::FakeClock;
use crate::pal::real::RealClock;

/// Dispatches clock reads to either the real monotonic clock or, in tests, a
/// fake whose reading the test controls.
#[derive(Clone, Debug)]
pub(crate) enum ClockFacade {
    Real(RealClock),

    #[cfg(test)]
    Fake(FakeClock),
}

impl ClockFacade {
    pub(crate) fn real() -> Self {
        Self::Real(RealClock::new())
    }

    #[cfg(test)]
    pub(crate) fn fake(clock: FakeClock) -> Self {
        Self::Fake(clock)
    }
}

impl Clock for ClockFacade {
    fn now(&self) -> Duration {
        match self {
            Self::Real(clock) => clock.now(),
            #[cfg(test)]
            Self::Fake(clock) => clock.now(),
        }
    }
}
