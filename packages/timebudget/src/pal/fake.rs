//! Fake clock implementation for testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ERR_POISONED_LOCK;
use crate::pal::abstractions::Clock;

/// Fake implementation of the clock abstraction for testing.
///
/// This implementation allows tests to control the clock reading instead of
/// relying on the operating system. Multiple clones of the same `FakeClock`
/// share the same underlying reading, allowing tests to advance time after
/// the clock has been handed to a recorder.
#[derive(Clone, Debug)]
pub(crate) struct FakeClock {
    now: Arc<Mutex<Duration>>,
}

impl FakeClock {
    /// Creates a new fake clock with a zero reading.
    pub(crate) fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Advances the clock reading by the given amount.
    ///
    /// This affects all clones of this clock, allowing tests to simulate time
    /// passing while a timer is open.
    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect(ERR_POISONED_LOCK);
        *now = now.checked_add(by).expect("fake clock reading overflows Duration");
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        *self.now.lock().expect(ERR_POISONED_LOCK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initializes_with_zero_reading() {
        let clock = FakeClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn advance_moves_the_reading() {
        let clock = FakeClock::new();

        clock.advance(Duration::from_millis(150));
        assert_eq!(clock.now(), Duration::from_millis(150));

        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.now(), Duration::from_millis(200));
    }

    #[test]
    fn shared_state_between_clones() {
        let clock1 = FakeClock::new();
        let clock2 = clock1.clone();

        // Advancing one clone affects the other.
        clock1.advance(Duration::from_millis(100));
        assert_eq!(clock2.now(), Duration::from_millis(100));
    }
}
